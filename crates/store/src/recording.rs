//! Recording store that captures every upload for verification.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pasteup_core::UploadResult;

use crate::error::StorageError;
use crate::store::DynObjectStore;

/// Type alias for the response function.
type ResponseFn = dyn Fn(&str) -> Result<UploadResult, StorageError> + Send + Sync;

/// A store that records all uploads for later verification.
///
/// Failures, delays, and never-completing uploads can be injected per call
/// number, which makes it the test double for the paste pipeline.
pub struct RecordingObjectStore {
    base_url: String,
    calls: Arc<Mutex<Vec<CapturedPut>>>,
    call_count: AtomicUsize,
    response_fn: Option<Arc<ResponseFn>>,
    delay: Option<Duration>,
    failure_mode: FailureMode,
    stall_on: Vec<usize>,
}

impl std::fmt::Debug for RecordingObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingObjectStore")
            .field("base_url", &self.base_url)
            .field("call_count", &self.call_count.load(Ordering::SeqCst))
            .field("delay", &self.delay)
            .field("failure_mode", &self.failure_mode)
            .finish_non_exhaustive()
    }
}

/// A captured call to [`DynObjectStore::put`].
#[derive(Debug, Clone)]
pub struct CapturedPut {
    /// When the call started.
    pub timestamp: DateTime<Utc>,
    /// Object key passed in.
    pub key: String,
    /// Content type passed in.
    pub content_type: String,
    /// Size of the uploaded data.
    pub size: usize,
    /// Resulting URL or error message.
    pub result: Result<String, String>,
}

/// Mode for simulating failures.
#[derive(Debug, Clone, Default)]
pub enum FailureMode {
    /// Never fail.
    #[default]
    None,
    /// Fail every N calls.
    EveryN(usize),
    /// Fail the first N calls.
    FirstN(usize),
    /// Fail exactly the listed call numbers (1-based).
    Calls(Vec<usize>),
    /// Always fail.
    Always,
}

impl RecordingObjectStore {
    /// Create a recording store whose URLs are `base_url` followed by the key.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            calls: Arc::new(Mutex::new(Vec::new())),
            call_count: AtomicUsize::new(0),
            response_fn: None,
            delay: None,
            failure_mode: FailureMode::None,
            stall_on: Vec::new(),
        }
    }

    /// Set a custom response function, called with the object key.
    #[must_use]
    pub fn with_response_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Result<UploadResult, StorageError> + Send + Sync + 'static,
    {
        self.response_fn = Some(Arc::new(f));
        self
    }

    /// Set a delay before responding.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the failure mode.
    #[must_use]
    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Make the given call number (1-based) never complete.
    #[must_use]
    pub fn with_stall_on(mut self, call_number: usize) -> Self {
        self.stall_on.push(call_number);
        self
    }

    /// Get all captured calls that have completed.
    pub fn calls(&self) -> Vec<CapturedPut> {
        self.calls.lock().clone()
    }

    /// Keys of all completed calls, in call order.
    pub fn keys(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.key.clone()).collect()
    }

    /// Number of calls started, including stalled ones.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Clear all captured calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
        self.call_count.store(0, Ordering::SeqCst);
    }

    /// Assert that the store was called exactly N times.
    ///
    /// # Panics
    ///
    /// Panics if the store was not called exactly N times.
    pub fn assert_called(&self, n: usize) {
        let count = self.call_count();
        assert_eq!(count, n, "expected {n} uploads, got {count}");
    }

    /// Assert that the store was not called.
    ///
    /// # Panics
    ///
    /// Panics if the store was called.
    pub fn assert_not_called(&self) {
        self.assert_called(0);
    }

    fn should_fail(&self, call_number: usize) -> bool {
        match &self.failure_mode {
            FailureMode::None => false,
            FailureMode::EveryN(n) => call_number.is_multiple_of(*n),
            FailureMode::FirstN(n) => call_number <= *n,
            FailureMode::Calls(numbers) => numbers.contains(&call_number),
            FailureMode::Always => true,
        }
    }
}

#[async_trait]
impl DynObjectStore for RecordingObjectStore {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "recording"
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        let timestamp = Utc::now();
        let call_number = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        if self.stall_on.contains(&call_number) {
            std::future::pending::<()>().await;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.should_fail(call_number) {
            Err(StorageError::Upload(format!(
                "simulated failure on call #{call_number}"
            )))
        } else if let Some(ref response_fn) = self.response_fn {
            response_fn(key)
        } else {
            Ok(UploadResult::new(format!("{}{key}", self.base_url)))
        };

        self.calls.lock().push(CapturedPut {
            timestamp,
            key: key.to_owned(),
            content_type: content_type.to_owned(),
            size: data.len(),
            result: match &result {
                Ok(r) => Ok(r.url.clone()),
                Err(e) => Err(e.to_string()),
            },
        });

        result
    }
}
