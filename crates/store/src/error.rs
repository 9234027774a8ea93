use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while storing an object.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// The remote end rejected or failed the upload.
    #[error("upload failed: {0}")]
    Upload(String),

    /// A network or transport-level error occurred.
    #[error("connection error: {0}")]
    Connection(String),

    /// The upload did not finish in time. Carries the limit when it was
    /// set by the caller rather than the transport.
    #[error("timeout{}", .0.map(|limit| format!(" after {limit:?}")).unwrap_or_default())]
    Timeout(Option<Duration>),

    /// The remote end rejected the request due to rate limiting.
    #[error("upload throttled")]
    Throttled,

    /// Required settings are empty, so no request was attempted.
    #[error("storage settings incomplete, missing: {}", .missing.join(", "))]
    Incomplete {
        /// Names of the empty settings fields.
        missing: Vec<&'static str>,
    },
}

impl StorageError {
    /// Returns `true` if the error is transient and a later attempt may
    /// succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Connection(_) | Self::Throttled
        )
    }
}
