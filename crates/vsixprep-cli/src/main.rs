use vsixprep_lib::cli::{ResolvedCommand, parse_args, resolve_command, run_download};
use vsixprep_lib::error::VsixPrepError;

/// Exit code for interrupt-triggered cancellation, distinct from the generic
/// error exit used for configuration failures. Per-item download failures do
/// not affect the exit status.
const CANCELLED_EXIT_CODE: i32 = 130;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), VsixPrepError> {
    color_eyre::install()?;

    let args = parse_args();
    let command = resolve_command(args.command)?;

    match command {
        ResolvedCommand::Download(params) => {
            let report = run_download(params).await?;
            if report.cancelled {
                std::process::exit(CANCELLED_EXIT_CODE);
            }
        }
    }

    Ok(())
}
