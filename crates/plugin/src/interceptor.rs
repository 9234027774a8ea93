//! Paste interception and the per-event upload pipeline.
//!
//! A paste is handled in two halves. [`PasteInterceptor::on_paste`] runs
//! synchronously inside the host's dispatch: it suppresses the default paste,
//! classifies the payload, and snapshots the current upload target. The
//! returned [`PasteTask`] is then awaited against the editor and does all the
//! I/O:
//!
//! ```text
//! Idle -> Classifying -> UploadingBatch  -> Idle
//!                     -> PassthroughText -> Idle
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use pasteup_core::{ClipboardFile, ObjectKey, UploadResult, image_link};
use pasteup_store::{DynObjectStore, StorageError};
use tracing::{debug, error, info, instrument};

use crate::editor::Editor;
use crate::event::PasteEvent;

/// Text placed between consecutive image links.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Tunables for the paste pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteOptions {
    separator: String,
    upload_timeout: Option<Duration>,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_owned(),
            upload_timeout: None,
        }
    }
}

impl PasteOptions {
    /// Text inserted before every image link except the first.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Give up on a single upload after `timeout`. Without one, an upload
    /// that never resolves holds up the rest of its batch.
    #[must_use]
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    /// The image separator.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// The per-upload timeout, if any.
    pub fn upload_timeout(&self) -> Option<Duration> {
        self.upload_timeout
    }
}

/// Where images go: a storage backend plus the key prefix.
#[derive(Clone)]
pub struct UploadTarget {
    store: Arc<dyn DynObjectStore>,
    directory: String,
}

impl std::fmt::Debug for UploadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadTarget")
            .field("store", &self.store.name())
            .field("directory", &self.directory)
            .finish()
    }
}

impl UploadTarget {
    /// Upload to `store`, prefixing every key with `directory`.
    pub fn new(store: Arc<dyn DynObjectStore>, directory: impl Into<String>) -> Self {
        Self {
            store,
            directory: directory.into(),
        }
    }

    /// The storage backend.
    pub fn store(&self) -> &Arc<dyn DynObjectStore> {
        &self.store
    }

    /// Prefix prepended to every generated key.
    pub fn directory(&self) -> &str {
        &self.directory
    }
}

/// How a paste event was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteKind {
    /// The payload had image entries; each was uploaded in turn.
    UploadedBatch,
    /// No images; the plain text was inserted verbatim.
    PassthroughText,
    /// Neither images nor text; nothing was inserted.
    Nothing,
}

/// Result of one image in a batch.
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    /// Uploaded and its link inserted.
    Inserted {
        /// Original filename, also the link's alt text.
        filename: String,
        /// Key the object was stored under.
        key: ObjectKey,
        /// Public URL of the object.
        url: String,
    },
    /// The upload failed; nothing was inserted for this image.
    Failed {
        /// Original filename.
        filename: String,
        /// Key the upload was attempted under.
        key: ObjectKey,
        /// Why the upload failed.
        error: StorageError,
    },
}

impl ImageOutcome {
    /// Original filename of the image.
    pub fn filename(&self) -> &str {
        match self {
            Self::Inserted { filename, .. } | Self::Failed { filename, .. } => filename,
        }
    }

    /// Key the image was (or would have been) stored under.
    pub fn key(&self) -> &ObjectKey {
        match self {
            Self::Inserted { key, .. } | Self::Failed { key, .. } => key,
        }
    }

    /// Public URL, for inserted images.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Inserted { url, .. } => Some(url),
            Self::Failed { .. } => None,
        }
    }

    /// Upload error, for failed images.
    pub fn error(&self) -> Option<&StorageError> {
        match self {
            Self::Inserted { .. } => None,
            Self::Failed { error, .. } => Some(error),
        }
    }

    /// Whether the image's link was inserted.
    pub fn is_inserted(&self) -> bool {
        matches!(self, Self::Inserted { .. })
    }
}

/// Ordered record of what a paste did.
#[derive(Debug, Clone)]
pub struct PasteReport {
    /// How the event was handled.
    pub kind: PasteKind,
    /// One entry per image, in clipboard order.
    pub outcomes: Vec<ImageOutcome>,
    /// Non-image files that were ignored.
    pub dropped_files: usize,
    /// Everything written to the editor, concatenated.
    pub inserted: String,
}

impl PasteReport {
    fn new(kind: PasteKind, dropped_files: usize) -> Self {
        Self {
            kind,
            outcomes: Vec::new(),
            dropped_files,
            inserted: String::new(),
        }
    }

    /// Number of images whose links were inserted.
    pub fn inserted_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_inserted()).count()
    }

    /// Number of images whose upload failed.
    pub fn failed_count(&self) -> usize {
        self.outcomes.len() - self.inserted_count()
    }

    /// Failed images, in clipboard order.
    pub fn failures(&self) -> impl Iterator<Item = &ImageOutcome> {
        self.outcomes.iter().filter(|o| !o.is_inserted())
    }
}

enum Plan {
    Upload(Vec<ClipboardFile>),
    Passthrough(String),
    Nothing,
}

/// The asynchronous half of a paste, bound to the upload target that was
/// current when the event fired.
pub struct PasteTask {
    plan: Plan,
    dropped_files: usize,
    target: Arc<UploadTarget>,
    options: PasteOptions,
}

impl std::fmt::Debug for PasteTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteTask")
            .field("kind", &self.kind())
            .field("images", &self.image_count())
            .field("dropped_files", &self.dropped_files)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl PasteTask {
    /// What running this task will do.
    pub fn kind(&self) -> PasteKind {
        match self.plan {
            Plan::Upload(_) => PasteKind::UploadedBatch,
            Plan::Passthrough(_) => PasteKind::PassthroughText,
            Plan::Nothing => PasteKind::Nothing,
        }
    }

    /// Number of images queued for upload.
    pub fn image_count(&self) -> usize {
        match &self.plan {
            Plan::Upload(images) => images.len(),
            Plan::Passthrough(_) | Plan::Nothing => 0,
        }
    }

    /// The upload target snapshot this task runs against.
    pub fn target(&self) -> &Arc<UploadTarget> {
        &self.target
    }

    /// Perform the uploads or text insertion against `editor`.
    ///
    /// Never fails: upload errors are logged and recorded in the report,
    /// and the remaining images still proceed.
    #[instrument(skip_all, fields(store = self.target.store.name(), kind = ?self.kind()))]
    pub async fn run<E: Editor + ?Sized>(self, editor: &mut E) -> PasteReport {
        let kind = self.kind();
        let mut report = PasteReport::new(kind, self.dropped_files);
        if self.dropped_files > 0 {
            debug!(count = self.dropped_files, "ignoring non-image clipboard files");
        }

        match self.plan {
            Plan::Upload(images) => {
                info!(images = images.len(), "uploading pasted images");
                for file in images {
                    let outcome = upload_one(&self.target, &self.options, file).await;
                    if let ImageOutcome::Inserted { filename, url, .. } = &outcome {
                        let mut text = String::new();
                        if report.inserted_count() > 0 {
                            text.push_str(&self.options.separator);
                        }
                        text.push_str(&image_link(filename, url));
                        editor.replace_selection(&text);
                        report.inserted.push_str(&text);
                    }
                    report.outcomes.push(outcome);
                }
                info!(
                    inserted = report.inserted_count(),
                    failed = report.failed_count(),
                    "paste batch finished"
                );
            }
            Plan::Passthrough(text) => {
                debug!(len = text.len(), "inserting pasted text");
                editor.replace_selection(&text);
                report.inserted = text;
            }
            Plan::Nothing => debug!("paste carried no images or text"),
        }

        report
    }
}

async fn upload_one(
    target: &UploadTarget,
    options: &PasteOptions,
    file: ClipboardFile,
) -> ImageOutcome {
    let key = ObjectKey::generate(&file.name, &target.directory);
    debug!(file = %file.name, key = %key, size = file.size(), "uploading image");

    let put = target.store.put(key.as_str(), file.data, &file.mime_type);
    let result: Result<UploadResult, StorageError> = match options.upload_timeout {
        Some(limit) => tokio::time::timeout(limit, put)
            .await
            .unwrap_or(Err(StorageError::Timeout(Some(limit)))),
        None => put.await,
    };

    match result {
        Ok(UploadResult { url, stored_key }) => ImageOutcome::Inserted {
            filename: file.name,
            key: stored_key.map_or(key, ObjectKey::from),
            url,
        },
        Err(e) => {
            error!(
                file = %file.name,
                key = %key,
                error = %e,
                retryable = e.is_retryable(),
                "image upload failed"
            );
            ImageOutcome::Failed {
                filename: file.name,
                key,
                error: e,
            }
        }
    }
}

/// Turns paste events into [`PasteTask`]s.
///
/// Holds the current [`UploadTarget`] behind a lock that is only taken long
/// enough to clone the `Arc`, so replacing the target never waits on an
/// upload and never affects a batch already in flight.
pub struct PasteInterceptor {
    target: RwLock<Arc<UploadTarget>>,
    options: PasteOptions,
}

impl std::fmt::Debug for PasteInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasteInterceptor")
            .field("target", &*self.target.read())
            .field("options", &self.options)
            .finish()
    }
}

impl PasteInterceptor {
    /// Create an interceptor uploading to `target`.
    pub fn new(target: UploadTarget, options: PasteOptions) -> Self {
        Self {
            target: RwLock::new(Arc::new(target)),
            options,
        }
    }

    /// Snapshot of the current upload target.
    pub fn target(&self) -> Arc<UploadTarget> {
        Arc::clone(&self.target.read())
    }

    /// Replace the upload target for subsequent paste events and return the
    /// previous one.
    pub fn replace_target(&self, target: UploadTarget) -> Arc<UploadTarget> {
        let next = Arc::new(target);
        debug!(target = ?next, "upload target replaced");
        std::mem::replace(&mut *self.target.write(), next)
    }

    /// The pipeline options.
    pub fn options(&self) -> &PasteOptions {
        &self.options
    }

    /// Handle a paste signal.
    ///
    /// Always suppresses the default paste before returning, then classifies
    /// the payload: image entries are queued for upload, other files are
    /// dropped, and text is only kept when there are no images.
    pub fn on_paste(&self, event: &mut PasteEvent) -> PasteTask {
        event.prevent_default();
        let target = self.target();

        let Some(payload) = event.take_payload() else {
            debug!("paste event carried no clipboard data");
            return PasteTask {
                plan: Plan::Nothing,
                dropped_files: 0,
                target,
                options: self.options.clone(),
            };
        };

        let parts = payload.partition();
        let plan = if !parts.images.is_empty() {
            Plan::Upload(parts.images)
        } else if let Some(text) = parts.text {
            Plan::Passthrough(text)
        } else {
            Plan::Nothing
        };

        PasteTask {
            plan,
            dropped_files: parts.others.len(),
            target,
            options: self.options.clone(),
        }
    }
}
