use async_trait::async_trait;
use bytes::Bytes;
use pasteup_core::UploadResult;

use crate::error::StorageError;

/// Strongly-typed object store trait with native `async fn`.
///
/// This trait is **not** object-safe. Every `ObjectStore` also implements
/// [`DynObjectStore`] through a blanket implementation, which is what the
/// paste pipeline holds behind an `Arc`.
pub trait ObjectStore: Send + Sync {
    /// Returns a short name identifying the backend (e.g. `"s3"`).
    fn name(&self) -> &str;

    /// Store `data` under `key` and return the object's public URL.
    ///
    /// `content_type` is the MIME type the object should be served with.
    /// Implementations must not retry; the caller decides what a failure
    /// means.
    fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<UploadResult, StorageError>> + Send;
}

/// Object-safe store trait for use behind `Arc<dyn DynObjectStore>`.
///
/// Implement [`ObjectStore`] instead and rely on the blanket implementation.
#[async_trait]
pub trait DynObjectStore: Send + Sync {
    /// Returns a short name identifying the backend.
    fn name(&self) -> &str;

    /// Store `data` under `key` and return the object's public URL.
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadResult, StorageError>;
}

#[async_trait]
impl<T: ObjectStore + Sync> DynObjectStore for T {
    fn name(&self) -> &str {
        ObjectStore::name(self)
    }

    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        ObjectStore::put(self, key, data, content_type).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct MockStore {
        should_fail: bool,
    }

    impl ObjectStore for MockStore {
        #[allow(clippy::unnecessary_literal_bound)]
        fn name(&self) -> &str {
            "mock"
        }

        async fn put(
            &self,
            key: &str,
            _data: Bytes,
            _content_type: &str,
        ) -> Result<UploadResult, StorageError> {
            if self.should_fail {
                return Err(StorageError::Upload("mock failure".into()));
            }
            Ok(UploadResult::new(format!("https://mock.example/{key}")))
        }
    }

    #[tokio::test]
    async fn store_put_success() {
        let store = MockStore { should_fail: false };
        let result = ObjectStore::put(&store, "a.png", Bytes::new(), "image/png")
            .await
            .unwrap();
        assert_eq!(result.url, "https://mock.example/a.png");
    }

    #[tokio::test]
    async fn blanket_dyn_store_impl() {
        let store: Arc<dyn DynObjectStore> = Arc::new(MockStore { should_fail: false });
        assert_eq!(store.name(), "mock");
        let result = store
            .put("dir/b.jpg", Bytes::from_static(b"jpg"), "image/jpeg")
            .await
            .unwrap();
        assert_eq!(result.url, "https://mock.example/dir/b.jpg");
    }

    #[tokio::test]
    async fn dyn_store_failure() {
        let store: Arc<dyn DynObjectStore> = Arc::new(MockStore { should_fail: true });
        let err = store.put("c.gif", Bytes::new(), "image/gif").await.unwrap_err();
        assert!(matches!(err, StorageError::Upload(_)));
    }
}
