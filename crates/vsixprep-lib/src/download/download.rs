use super::progress::ProgressReporter;
use super::types::{BatchReport, DownloadOptions, DownloadOutcome, DownloadStatus};
use crate::config::RegistryConfig;
use crate::error::VsixPrepError;
use crate::extension::{ExtensionRequest, ResolvedExtension};
use eyre::WrapErr;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Suffix for in-flight files; a reader never sees one at the final name.
const PARTIAL_SUFFIX: &str = ".downloading";

/// Downloads every extension in `requests` that is not already on disk.
///
/// Extensions whose final file exists before the run never enter the worker
/// pool and are absent from the report. Every per-item failure is converted
/// into a [`DownloadOutcome`]; nothing aborts the batch except cancellation.
///
/// When `cancel` fires, collection stops immediately: queued tasks never
/// start, in-flight tasks are dropped at their next await point, and partial
/// files from interrupted downloads are left behind (cleaning them up is the
/// operator's job). Completed downloads are not rolled back.
pub async fn download_all(
    requests: Vec<ExtensionRequest>,
    registry: &RegistryConfig,
    extensions_dir: &Path,
    errors_dir: &Path,
    options: DownloadOptions,
    cancel: CancellationToken,
) -> Result<BatchReport, VsixPrepError> {
    // Redirect following is reqwest's default policy; the gallery serves
    // vspackage bodies from a CDN behind a redirect.
    let client = reqwest::Client::builder().build()?;
    let progress = ProgressReporter::new(options.show_progress);
    let semaphore = Arc::new(tokio::sync::Semaphore::new(options.parallelism));

    let mut futs = FuturesUnordered::new();
    for request in requests {
        if let Ok(resolved) = request.resolve(registry) {
            if resolved.is_present(extensions_dir) {
                debug!(
                    identifier = %request.identifier,
                    version = %request.version,
                    "Already present, not scheduling"
                );
                continue;
            }
        }

        let client = client.clone();
        let registry = registry.clone();
        let extensions_dir = extensions_dir.to_path_buf();
        let errors_dir = errors_dir.to_path_buf();
        let semaphore = semaphore.clone();
        let cancel = cancel.clone();
        let progress = progress.clone();
        futs.push(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return None;
            };
            if cancel.is_cancelled() {
                return None;
            }
            Some(
                download_one(
                    &client,
                    request,
                    &registry,
                    &extensions_dir,
                    &errors_dir,
                    &cancel,
                    &progress,
                )
                .await,
            )
        });
    }

    info!("Scheduled {} downloads", futs.len());

    let mut report = BatchReport::default();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Cancellation requested, abandoning pending downloads");
                report.cancelled = true;
                break;
            }
            next = futs.next() => match next {
                Some(Some(outcome)) => {
                    log_outcome(&outcome);
                    report.outcomes.push(outcome);
                }
                Some(None) => {}
                None => break,
            }
        }
    }

    // Dropping the pending futures cancels everything not yet finished.
    drop(futs);
    progress.clear();
    Ok(report)
}

fn log_outcome(outcome: &DownloadOutcome) {
    if outcome.status.is_success() {
        info!(
            identifier = %outcome.request.identifier,
            version = %outcome.request.version,
            "{}", outcome.message
        );
    } else {
        warn!(
            identifier = %outcome.request.identifier,
            version = %outcome.request.version,
            "{}", outcome.message
        );
    }
}

/// Runs one download attempt end to end. Every failure becomes an outcome
/// value; this function never unwinds into the orchestrator.
async fn download_one(
    client: &reqwest::Client,
    request: ExtensionRequest,
    registry: &RegistryConfig,
    extensions_dir: &Path,
    errors_dir: &Path,
    cancel: &CancellationToken,
    progress: &ProgressReporter,
) -> DownloadOutcome {
    let resolved = match request.resolve(registry) {
        Ok(resolved) => resolved,
        Err(err) => {
            return DownloadOutcome {
                status: DownloadStatus::InvalidId,
                message: err.to_string(),
                request,
            };
        }
    };

    // The list may name the same extension twice, and another run may have
    // promoted the file since filtering. The guard is best effort; the
    // atomic rename is what actually protects the final name.
    if resolved.is_present(extensions_dir) {
        return DownloadOutcome {
            status: DownloadStatus::Skipped,
            message: format!("Skipped: {} (already exists)", resolved.file_name),
            request,
        };
    }

    match fetch(
        client,
        &request,
        &resolved,
        extensions_dir,
        errors_dir,
        cancel,
        progress,
    )
    .await
    {
        Ok((status, message)) => DownloadOutcome {
            status,
            message,
            request,
        },
        Err(err) => DownloadOutcome {
            status: DownloadStatus::NetworkFailure,
            message: format!("Failed to download {}: {err:#}", request.identifier),
            request,
        },
    }
}

/// Issues the GET and classifies the response. Transport errors bubble up as
/// `Err` and become `NetworkFailure` at the task boundary; they write no
/// diagnostic file since no response body exists.
async fn fetch(
    client: &reqwest::Client,
    request: &ExtensionRequest,
    resolved: &ResolvedExtension,
    extensions_dir: &Path,
    errors_dir: &Path,
    cancel: &CancellationToken,
    progress: &ProgressReporter,
) -> eyre::Result<(DownloadStatus, String)> {
    let response = client
        .get(&resolved.url)
        .send()
        .await
        .wrap_err_with(|| format!("Request to {} failed", resolved.url))?;

    match response.status() {
        StatusCode::OK => {
            stream_to_disk(response, request, resolved, extensions_dir, cancel, progress).await
        }
        // The gallery answers 500 for unknown publisher/extension/version
        // combinations; there is no body worth keeping.
        StatusCode::INTERNAL_SERVER_ERROR => Ok((
            DownloadStatus::NotFound,
            format!("Failed to download {}: resource not found", request.identifier),
        )),
        StatusCode::TOO_MANY_REQUESTS => {
            let diagnostic = persist_diagnostic(errors_dir, request, response).await?;
            Ok((
                DownloadStatus::RateLimited,
                format!(
                    "Failed to download {}: rate limited, retry after a few minutes (response appended to {})",
                    request.identifier,
                    diagnostic.display()
                ),
            ))
        }
        status => {
            let diagnostic = persist_diagnostic(errors_dir, request, response).await?;
            Ok((
                DownloadStatus::HttpError(status.as_u16()),
                format!(
                    "Failed to download {}: HTTP {} (response appended to {})",
                    request.identifier,
                    status.as_u16(),
                    diagnostic.display()
                ),
            ))
        }
    }
}

/// Streams the body to `{final}.downloading`, then promotes it with a single
/// rename so readers either see nothing or the whole file at the final name.
async fn stream_to_disk(
    response: reqwest::Response,
    request: &ExtensionRequest,
    resolved: &ResolvedExtension,
    extensions_dir: &Path,
    cancel: &CancellationToken,
    progress: &ProgressReporter,
) -> eyre::Result<(DownloadStatus, String)> {
    let final_path = resolved.final_path(extensions_dir);
    let partial_path =
        final_path.with_file_name(format!("{}{}", resolved.file_name, PARTIAL_SUFFIX));

    let bar = progress.start(&request.identifier, response.content_length());

    let file = tokio::fs::File::create(&partial_path)
        .await
        .wrap_err_with(|| format!("Failed to create {}", partial_path.display()))?;
    let mut writer = tokio::io::BufWriter::new(file);
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        // Cooperative cancellation between chunks; a chunk already being
        // written is never torn. The partial file stays behind.
        if cancel.is_cancelled() {
            bar.abandon();
            eyre::bail!("download of {} interrupted", resolved.file_name);
        }
        let chunk = chunk
            .wrap_err_with(|| format!("Failed to read response body from {}", resolved.url))?;
        writer
            .write_all(&chunk)
            .await
            .wrap_err_with(|| format!("Failed to write to {}", partial_path.display()))?;
        bar.inc(chunk.len() as u64);
    }

    writer
        .flush()
        .await
        .wrap_err_with(|| format!("Failed to flush {}", partial_path.display()))?;

    tokio::fs::rename(&partial_path, &final_path)
        .await
        .wrap_err_with(|| {
            format!(
                "Failed to promote {} to {}",
                partial_path.display(),
                final_path.display()
            )
        })?;

    bar.finish();
    Ok((
        DownloadStatus::Downloaded,
        format!("Downloaded: {}", final_path.display()),
    ))
}

/// Appends the response body to the per-identifier diagnostic file so that
/// repeated failures accumulate history across runs.
async fn persist_diagnostic(
    errors_dir: &Path,
    request: &ExtensionRequest,
    response: reqwest::Response,
) -> eyre::Result<PathBuf> {
    let body = response
        .text()
        .await
        .wrap_err("Failed to read error response body")?;
    let path = errors_dir.join(format!("{}-error.txt", request.identifier));
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await
        .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    file.write_all(body.as_bytes())
        .await
        .wrap_err_with(|| format!("Failed to append to {}", path.display()))?;
    file.write_all(b"\n")
        .await
        .wrap_err_with(|| format!("Failed to append to {}", path.display()))?;
    Ok(path)
}
