//! Core types for the pasteup paste-and-upload pipeline.
//!
//! - [`clipboard`] models what a paste event carries and splits it into
//!   image entries, other files, and text.
//! - [`key`] derives the destination key of each uploaded image.
//! - [`markdown`] renders the text that replaces the pasted image.

pub mod clipboard;
pub mod key;
pub mod markdown;
pub mod upload;

pub use clipboard::{ClipboardFile, ClipboardPayload, IMAGE_MIME_PREFIX, PartitionedPayload};
pub use key::{ObjectKey, TOKEN_LEN, extension, generate_key, random_token};
pub use markdown::image_link;
pub use upload::UploadResult;
