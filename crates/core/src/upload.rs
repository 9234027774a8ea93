/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// Publicly resolvable URL of the stored object.
    pub url: String,
    /// Key the object was stored under, when the store rewrote the one it
    /// was given.
    pub stored_key: Option<String>,
}

impl UploadResult {
    /// Create a new upload result.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stored_key: None,
        }
    }

    /// Record the key the store actually used.
    #[must_use]
    pub fn with_stored_key(mut self, key: impl Into<String>) -> Self {
        self.stored_key = Some(key.into());
        self
    }
}
