use pasteup_store::StorageError;
use thiserror::Error;

/// Errors specific to S3 upload operations.
#[derive(Debug, Error)]
pub enum S3Error {
    /// The service returned an error (access denied, missing bucket, ...).
    #[error("S3 service error: {0}")]
    ServiceError(String),

    /// The request was throttled by the service.
    #[error("S3 request throttled")]
    Throttled,

    /// A network or connection error occurred.
    #[error("S3 connection error: {0}")]
    Connection(String),

    /// The SDK gave up waiting on the request.
    #[error("S3 request timed out")]
    Timeout,
}

impl From<S3Error> for StorageError {
    fn from(err: S3Error) -> Self {
        match err {
            S3Error::ServiceError(msg) => StorageError::Upload(msg),
            S3Error::Throttled => StorageError::Throttled,
            S3Error::Connection(msg) => StorageError::Connection(msg),
            S3Error::Timeout => StorageError::Timeout(None),
        }
    }
}

/// Classify an SDK error string into the appropriate [`S3Error`].
///
/// Inspects the message for throttling, timeout, and connection patterns.
pub fn classify_sdk_error(error_str: &str) -> S3Error {
    let lower = error_str.to_lowercase();
    if lower.contains("throttl")
        || lower.contains("slowdown")
        || lower.contains("rate exceed")
        || lower.contains("too many")
    {
        S3Error::Throttled
    } else if lower.contains("timeout") || lower.contains("timed out") {
        S3Error::Timeout
    } else if lower.contains("connection")
        || lower.contains("connect")
        || lower.contains("dns")
        || lower.contains("network")
        || lower.contains("dispatch failure")
    {
        S3Error::Connection(error_str.to_owned())
    } else {
        S3Error::ServiceError(error_str.to_owned())
    }
}
