mod download;
mod progress;
mod types;

pub use download::download_all;
pub use types::{BatchReport, DownloadOptions, DownloadOutcome, DownloadStatus, default_parallelism};
