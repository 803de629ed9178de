//! Muninn error types

/// Muninn error types
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    // Network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("upstream returned status {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    // Lifecycle errors
    /// A shell-manifest fetch failed during install. Fatal to that
    /// version: the phase stays `Installing` and nothing is written.
    #[error("install failed for {url}: {reason}")]
    InstallFailed { url: String, reason: String },

    // Data errors
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Store errors
    #[error("cache store error: {0}")]
    Store(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Host runtime errors
    #[error("host view error: {0}")]
    View(String),

    /// A detached background task failed to complete (panicked or was
    /// cancelled). Distinct from the task's own error, which travels
    /// through the task's result.
    #[error("task failed: {0}")]
    Task(String),
}

/// Result type alias for Muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
