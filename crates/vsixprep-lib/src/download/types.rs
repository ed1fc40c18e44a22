use crate::extension::ExtensionRequest;

/// Classification of one download attempt against the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadStatus {
    /// Body streamed to disk and promoted to its final name.
    Downloaded,
    /// Final file already existed when the worker looked.
    Skipped,
    /// The gallery reports unknown publisher/extension/version combinations
    /// with HTTP 500.
    NotFound,
    /// HTTP 429; the caller must wait before trying again.
    RateLimited,
    /// Any other non-success status code.
    HttpError(u16),
    /// Identifier did not split into `publisher.name`.
    InvalidId,
    /// Transport-level failure: connect, timeout or mid-body error.
    NetworkFailure,
}

impl DownloadStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Downloaded | Self::Skipped)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Downloaded => "downloaded",
            Self::Skipped => "skipped",
            Self::NotFound => "not found",
            Self::RateLimited => "rate limited",
            Self::HttpError(_) => "http error",
            Self::InvalidId => "invalid identifier",
            Self::NetworkFailure => "network failure",
        }
    }
}

/// Per-extension result, reported in completion order.
#[derive(Clone, Debug)]
pub struct DownloadOutcome {
    pub request: ExtensionRequest,
    pub status: DownloadStatus,
    pub message: String,
}

#[derive(Clone, Copy, Debug)]
pub struct DownloadOptions {
    /// Maximum number of simultaneous downloads.
    pub parallelism: usize,
    /// Per-download byte progress bars on stderr.
    pub show_progress: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            show_progress: true,
        }
    }
}

/// Worker pool size when none is configured: one per available CPU.
pub fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Everything the orchestrator observed during one run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DownloadOutcome>,
    /// True when the run was interrupted; items still pending at that point
    /// produced no outcome.
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_statuses() {
        assert!(DownloadStatus::Downloaded.is_success());
        assert!(DownloadStatus::Skipped.is_success());
        assert!(!DownloadStatus::NotFound.is_success());
        assert!(!DownloadStatus::HttpError(403).is_success());
    }

    #[test]
    fn test_default_parallelism_is_positive() {
        assert!(default_parallelism() > 0);
    }
}
