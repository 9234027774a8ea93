use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use pasteup_core::UploadResult;
use pasteup_settings::Settings;
use pasteup_store::{ObjectStore, StorageError};
use tracing::{debug, error, info, instrument};

use crate::config::S3StoreConfig;
use crate::error::classify_sdk_error;

/// Name reported by the static credentials provider.
const CREDENTIALS_PROVIDER_NAME: &str = "pasteup-settings";

/// Build an S3 client from static credentials.
///
/// Construction performs no I/O, so a client can be rebuilt on every
/// settings edit. An empty endpoint falls back to the regional AWS endpoint.
pub fn build_client(config: &S3StoreConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        config.access_key_id.clone(),
        config.access_key_secret.clone(),
        None,
        None,
        CREDENTIALS_PROVIDER_NAME,
    );

    let mut builder = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region_or_default().to_owned()))
        .credentials_provider(credentials)
        .force_path_style(config.uses_path_style());

    if let Some(endpoint) = config.endpoint_url() {
        debug!(endpoint = %endpoint, "using custom S3 endpoint");
        builder = builder.endpoint_url(endpoint);
    }

    aws_sdk_s3::Client::from_conf(builder.build())
}

/// Object store backed by an S3-compatible bucket.
pub struct S3ObjectStore {
    config: S3StoreConfig,
    client: aws_sdk_s3::Client,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("config", &self.config)
            .field("client", &"<S3Client>")
            .finish()
    }
}

impl S3ObjectStore {
    /// Create a store, building an SDK client from `config`.
    pub fn new(config: S3StoreConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Create a store from the persisted settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(S3StoreConfig::from(settings))
    }

    /// Create a store with a pre-built client (for testing).
    pub fn with_client(config: S3StoreConfig, client: aws_sdk_s3::Client) -> Self {
        Self { config, client }
    }

    /// The store configuration.
    pub fn config(&self) -> &S3StoreConfig {
        &self.config
    }
}

impl ObjectStore for S3ObjectStore {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "s3"
    }

    #[instrument(
        skip(self, data),
        fields(provider = "s3", bucket = %self.config.bucket, size = data.len())
    )]
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<UploadResult, StorageError> {
        let missing = self.config.missing_fields();
        if !missing.is_empty() {
            error!(missing = ?missing, "S3 settings incomplete, skipping upload");
            return Err(StorageError::Incomplete { missing });
        }

        let stored_key = normalize_key(key);
        debug!(key = stored_key, "uploading object to S3");

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(stored_key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                let err_str = DisplayErrorContext(&e).to_string();
                error!(error = %err_str, "S3 put_object failed");
                let err: StorageError = classify_sdk_error(&err_str).into();
                err
            })?;

        let url = self.config.public_url(stored_key);
        info!(url = %url, "S3 object uploaded");
        let result = UploadResult::new(url);
        Ok(if stored_key == key {
            result
        } else {
            result.with_stored_key(stored_key)
        })
    }
}

/// Object keys never start with `/`; a leading slash from the directory
/// prefix would otherwise become an empty path segment.
fn normalize_key(key: &str) -> &str {
    key.trim_start_matches('/')
}
