use crate::cli::params::DownloadParams;
use crate::download::{BatchReport, download_all};
use crate::error::VsixPrepError;
use crate::signals::cancel_on_signal;
use itertools::Itertools;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn run_download(params: DownloadParams) -> Result<BatchReport, VsixPrepError> {
    // Plain I/O wrappers around the download core: the directories must
    // exist before any worker writes into them.
    std::fs::create_dir_all(&params.extensions_dir).map_err(|e| {
        VsixPrepError::OutputDirectoryCreation {
            path: params.extensions_dir.clone(),
            reason: e.to_string(),
        }
    })?;
    std::fs::create_dir_all(&params.errors_dir).map_err(|e| {
        VsixPrepError::OutputDirectoryCreation {
            path: params.errors_dir.clone(),
            reason: e.to_string(),
        }
    })?;

    let cancel = CancellationToken::new();
    cancel_on_signal(cancel.clone());

    info!("Processing {} extensions", params.requests.len());
    let report = download_all(
        params.requests,
        &params.registry,
        &params.extensions_dir,
        &params.errors_dir,
        params.options,
        cancel,
    )
    .await?;

    if report.cancelled {
        info!(
            "Run cancelled, {} outcomes collected before interruption",
            report.outcomes.len()
        );
    } else {
        let summary = report
            .outcomes
            .iter()
            .map(|outcome| outcome.status.label())
            .counts()
            .into_iter()
            .sorted()
            .map(|(label, count)| format!("{count} {label}"))
            .join(", ");
        if summary.is_empty() {
            info!("Download run finished: nothing to do");
        } else {
            info!("Download run finished: {}", summary);
        }
    }

    Ok(report)
}
