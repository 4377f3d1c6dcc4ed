use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("failed to clone {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    #[error("clone of {url} timed out after {secs}s")]
    CloneTimedOut { url: String, secs: u64 },

    #[error("git is not available: {0}")]
    GitUnavailable(String),

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("snapshot is no longer readable: {0}")]
    SnapshotUnavailable(String),

    #[error("report parse error: {0}")]
    ReportParse(String),

    #[error("invalid built-in pattern: {0}")]
    InvalidPattern(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config has invalid values: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReadinessError {
    /// Errors raised while obtaining the repository; the only fatal class for a run.
    pub fn is_source_failure(&self) -> bool {
        matches!(
            self,
            Self::PathNotFound(_)
                | Self::CloneFailed { .. }
                | Self::CloneTimedOut { .. }
                | Self::GitUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReadinessError>;
