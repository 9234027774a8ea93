use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use pasteup_core::UploadResult;
use tracing::info;

use crate::error::StorageError;
use crate::store::ObjectStore;

/// Default URL prefix for objects held by [`MemoryObjectStore`].
pub const DEFAULT_MEMORY_BASE_URL: &str = "memory://pasteup/";

/// An object held by [`MemoryObjectStore`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object content.
    pub data: Bytes,
    /// MIME type the object was stored with.
    pub content_type: String,
    /// When the object was stored.
    pub stored_at: DateTime<Utc>,
}

/// An object store that keeps everything in process memory.
///
/// Useful for local development and tests where no bucket is available.
/// Returned URLs are `base_url` followed by the key.
pub struct MemoryObjectStore {
    base_url: String,
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    /// Create an empty store using [`DEFAULT_MEMORY_BASE_URL`].
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_MEMORY_BASE_URL)
    }

    /// Create an empty store whose URLs start with `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a stored object by key.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().get(key).cloned()
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    /// `true` if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryObjectStore")
            .field("base_url", &self.base_url)
            .field("objects", &self.len())
            .finish()
    }
}

impl ObjectStore for MemoryObjectStore {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "memory"
    }

    #[allow(clippy::unused_async)]
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        let size = data.len();
        self.objects.lock().insert(
            key.to_owned(),
            StoredObject {
                data,
                content_type: content_type.to_owned(),
                stored_at: Utc::now(),
            },
        );
        info!(key = %key, size, content_type = %content_type, "object stored in memory");
        Ok(UploadResult::new(format!("{}{key}", self.base_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryObjectStore::new();
        let result = ObjectStore::put(
            &store,
            "img/2026-10-19-abc.png",
            Bytes::from_static(b"png"),
            "image/png",
        )
        .await
        .unwrap();

        assert_eq!(result.url, "memory://pasteup/img/2026-10-19-abc.png");
        let obj = store.get("img/2026-10-19-abc.png").unwrap();
        assert_eq!(obj.data, Bytes::from_static(b"png"));
        assert_eq!(obj.content_type, "image/png");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn custom_base_url() {
        let store = MemoryObjectStore::with_base_url("https://cdn.example.com/");
        let result = ObjectStore::put(&store, "a.gif", Bytes::new(), "image/gif")
            .await
            .unwrap();
        assert_eq!(result.url, "https://cdn.example.com/a.gif");
    }

    #[tokio::test]
    async fn keys_are_sorted() {
        let store = MemoryObjectStore::new();
        for key in ["b", "a", "c"] {
            ObjectStore::put(&store, key, Bytes::new(), "image/png")
                .await
                .unwrap();
        }
        assert_eq!(store.keys(), ["a", "b", "c"]);
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn new_store_is_empty() {
        let store = MemoryObjectStore::default();
        assert!(store.is_empty());
        assert_eq!(ObjectStore::name(&store), "memory");
    }
}
