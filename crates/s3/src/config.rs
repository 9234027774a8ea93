use std::net::IpAddr;

use pasteup_settings::{SettingField, Settings};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Region used to sign requests when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Characters escaped in object keys when building public URLs.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Configuration for the S3-compatible object store.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct S3StoreConfig {
    /// Access key ID.
    pub access_key_id: String,

    /// Secret access key.
    pub access_key_secret: String,

    /// Service endpoint. A bare host gets `https://` prepended.
    pub endpoint: String,

    /// Target bucket.
    pub bucket: String,

    /// Signing region. Empty means [`DEFAULT_REGION`].
    pub region: String,

    /// Public URL base used instead of the bucket host.
    pub custom_domain: String,

    /// Put the bucket in the path rather than the host name. Endpoints
    /// given as an IP address always use path-style addressing.
    pub force_path_style: bool,
}

impl std::fmt::Debug for S3StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3StoreConfig")
            .field("access_key_id", &"[REDACTED]")
            .field("access_key_secret", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("custom_domain", &self.custom_domain)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl From<&Settings> for S3StoreConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            access_key_id: settings.access_key_id.trim().to_owned(),
            access_key_secret: settings.access_key_secret.trim().to_owned(),
            endpoint: settings.endpoint.trim().to_owned(),
            bucket: settings.bucket.trim().to_owned(),
            region: settings.region.trim().to_owned(),
            custom_domain: settings.custom_domain.trim().to_owned(),
            force_path_style: settings.force_path_style,
        }
    }
}

impl S3StoreConfig {
    /// Create a config for `bucket` at `endpoint` with the given credentials.
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            access_key_secret: access_key_secret.into(),
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            region: String::new(),
            custom_domain: String::new(),
            force_path_style: false,
        }
    }

    /// Set the signing region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Set a custom public URL base.
    #[must_use]
    pub fn with_custom_domain(mut self, custom_domain: impl Into<String>) -> Self {
        self.custom_domain = custom_domain.into();
        self
    }

    /// Force path-style bucket addressing.
    #[must_use]
    pub fn with_force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Persisted names of required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            (SettingField::AccessKeyId, &self.access_key_id),
            (SettingField::AccessKeySecret, &self.access_key_secret),
            (SettingField::Endpoint, &self.endpoint),
            (SettingField::Bucket, &self.bucket),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| field.key())
        .collect()
    }

    /// Region to sign with.
    pub fn region_or_default(&self) -> &str {
        if self.region.is_empty() {
            DEFAULT_REGION
        } else {
            &self.region
        }
    }

    /// Endpoint URL with a scheme, or `None` if no endpoint is set.
    pub fn endpoint_url(&self) -> Option<String> {
        if self.endpoint.is_empty() {
            None
        } else {
            Some(with_scheme(&self.endpoint))
        }
    }

    /// Whether requests address the bucket in the path.
    ///
    /// True when forced or when the endpoint host is an IP address, which
    /// cannot carry a bucket subdomain.
    pub fn uses_path_style(&self) -> bool {
        self.force_path_style
            || self
                .endpoint_url()
                .is_some_and(|endpoint| is_ip_host(split_endpoint(&endpoint).1))
    }

    /// Public URL of the object stored under `key`.
    ///
    /// Uses the custom domain if set. Otherwise the bucket address follows
    /// [`uses_path_style`](Self::uses_path_style):
    /// `<scheme>://<host>/<bucket>/<key>` or
    /// `<scheme>://<bucket>.<host>/<key>`. Without an endpoint the AWS
    /// regional host is used.
    pub fn public_url(&self, key: &str) -> String {
        let key = utf8_percent_encode(key, KEY_ENCODE_SET);

        if !self.custom_domain.is_empty() {
            let base = with_scheme(&self.custom_domain);
            return format!("{}/{key}", base.trim_end_matches('/'));
        }

        let endpoint = self.endpoint_url().unwrap_or_else(|| {
            format!("https://s3.{}.amazonaws.com", self.region_or_default())
        });
        let (scheme, host) = split_endpoint(&endpoint);
        if self.uses_path_style() {
            format!("{scheme}://{host}/{}/{key}", self.bucket)
        } else {
            format!("{scheme}://{}.{host}/{key}", self.bucket)
        }
    }
}

/// Split an endpoint URL into scheme and `host[:port]`, dropping any path.
fn split_endpoint(endpoint: &str) -> (&str, &str) {
    let (scheme, rest) = endpoint.split_once("://").unwrap_or(("https", endpoint));
    let host = rest.split('/').next().unwrap_or(rest);
    (scheme, host)
}

/// Whether `host[:port]` names an IPv4 or bracketed IPv6 address.
fn is_ip_host(host: &str) -> bool {
    if let Some(rest) = host.strip_prefix('[') {
        return rest
            .split(']')
            .next()
            .is_some_and(|addr| addr.parse::<IpAddr>().is_ok());
    }
    let addr = host.rsplit_once(':').map_or(host, |(addr, _)| addr);
    addr.parse::<IpAddr>().is_ok()
}

fn with_scheme(url: &str) -> String {
    if url.contains("://") {
        url.to_owned()
    } else {
        format!("https://{url}")
    }
}
