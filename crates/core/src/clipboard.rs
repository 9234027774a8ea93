use bytes::Bytes;

/// MIME type prefix that marks a clipboard file as an image.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// A single file entry carried by a paste event.
///
/// Mirrors what an editor hands over for a pasted file: the raw bytes, the
/// declared MIME type, and the original filename (e.g. `"cat.png"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardFile {
    /// Original filename as reported by the clipboard.
    pub name: String,
    /// Declared MIME type (e.g. `"image/png"`).
    pub mime_type: String,
    /// Raw file content.
    pub data: Bytes,
}

impl ClipboardFile {
    /// Create a new clipboard file entry.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Whether the declared MIME type starts with `image/`.
    ///
    /// The comparison ignores ASCII case so `Image/PNG` is still an image.
    pub fn is_image(&self) -> bool {
        self.mime_type
            .get(..IMAGE_MIME_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(IMAGE_MIME_PREFIX))
    }

    /// Size of the file content in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Everything a single paste event carries: files plus optional plain text.
///
/// Exists only for the duration of one paste event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardPayload {
    /// File entries in clipboard order.
    pub files: Vec<ClipboardFile>,
    /// Plain-text content, if any.
    pub text: Option<String>,
}

impl ClipboardPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text-only payload.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            files: Vec::new(),
            text: Some(text.into()),
        }
    }

    /// Append a file entry.
    #[must_use]
    pub fn with_file(mut self, file: ClipboardFile) -> Self {
        self.files.push(file);
        self
    }

    /// Set the plain-text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// `true` when the payload has no files and no text.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.text.is_none()
    }

    /// Split the payload into image entries, non-image entries, and text.
    ///
    /// Both file lists keep clipboard order.
    pub fn partition(self) -> PartitionedPayload {
        let (images, others): (Vec<_>, Vec<_>) =
            self.files.into_iter().partition(ClipboardFile::is_image);
        PartitionedPayload {
            images,
            others,
            text: self.text,
        }
    }
}

/// A clipboard payload after classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedPayload {
    /// Image entries, in clipboard order.
    pub images: Vec<ClipboardFile>,
    /// Non-image entries. These are not uploaded.
    pub others: Vec<ClipboardFile>,
    /// Plain-text content, if any.
    pub text: Option<String>,
}
