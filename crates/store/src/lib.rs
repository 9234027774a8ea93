//! Object store abstraction for the pasteup upload pipeline.
//!
//! Backends implement [`ObjectStore`]; the pipeline holds them as
//! `Arc<dyn DynObjectStore>`. This crate also ships two in-process stores:
//! [`MemoryObjectStore`] for development and [`RecordingObjectStore`] for
//! tests that need to inject failures or stalls.

pub mod error;
pub mod memory;
pub mod recording;
pub mod store;

pub use error::StorageError;
pub use memory::{DEFAULT_MEMORY_BASE_URL, MemoryObjectStore, StoredObject};
pub use recording::{CapturedPut, FailureMode, RecordingObjectStore};
pub use store::{DynObjectStore, ObjectStore};
