//! Paste-to-upload pipeline for text editors.
//!
//! The host editor sees this crate through two traits: it implements
//! [`EditorHost`] (paste hook and settings panel registration) and hands an
//! [`Editor`] to each paste task. [`Plugin::start`] wires everything up:
//!
//! ```no_run
//! # async fn demo(host: &mut pasteup_plugin::MemoryHost) -> Result<(), pasteup_plugin::PluginError> {
//! use std::sync::Arc;
//!
//! use pasteup_core::{ClipboardFile, ClipboardPayload};
//! use pasteup_plugin::{Plugin, TextBuffer};
//! use pasteup_settings::JsonFileSettingsStore;
//!
//! let settings = Arc::new(JsonFileSettingsStore::in_dir("/var/lib/pasteup"));
//! let handle = Plugin::s3(settings).start(host)?;
//!
//! let mut doc = TextBuffer::default();
//! let payload = ClipboardPayload::new()
//!     .with_file(ClipboardFile::new("cat.png", "image/png", b"...".as_slice()));
//! host.paste(Some(payload), &mut doc).await;
//!
//! handle.stop(host);
//! # Ok(())
//! # }
//! ```
//!
//! Each paste is suppressed synchronously, then images are uploaded one at a
//! time in clipboard order and replaced by markdown image links. Without
//! images the clipboard text is inserted verbatim. Failures are logged and
//! recorded in the [`PasteReport`]; they never reach the host.

pub mod editor;
pub mod error;
pub mod event;
pub mod host;
pub mod interceptor;
pub mod plugin;

pub use editor::{Editor, TextBuffer};
pub use error::PluginError;
pub use event::PasteEvent;
pub use host::{DispatchedPaste, EditorHost, HookId, MemoryHost, PasteHandler, SettingChangeFn};
pub use interceptor::{
    DEFAULT_SEPARATOR, ImageOutcome, PasteInterceptor, PasteKind, PasteOptions, PasteReport,
    PasteTask, UploadTarget,
};
pub use plugin::{Plugin, PluginHandle, StoreFactory};
