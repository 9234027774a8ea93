//! S3-compatible object store for pasteup.
//!
//! [`S3ObjectStore`] uploads with a single `PutObject` call signed with the
//! static credentials from the plugin settings, and derives the object's
//! public URL from the endpoint, bucket, and optional custom domain. It
//! works with AWS S3 and S3-compatible services such as Aliyun OSS or MinIO.

pub mod config;
pub mod error;
pub mod store;

pub use config::{DEFAULT_REGION, S3StoreConfig};
pub use error::{S3Error, classify_sdk_error};
pub use store::{S3ObjectStore, build_client};
