use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Upload destination settings, as persisted in the settings file.
///
/// Every field defaults to the empty string, so a partial or missing file
/// merges over the defaults. No field format is validated here; bad values
/// surface as upload failures.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Access key ID used to sign requests.
    #[serde(rename = "accessKeyID")]
    pub access_key_id: String,

    /// Secret access key used to sign requests.
    #[serde(rename = "accessKeySecret")]
    pub access_key_secret: String,

    /// Endpoint of the S3-compatible service (e.g. `https://oss-cn-hangzhou.aliyuncs.com`).
    pub endpoint: String,

    /// Bucket that receives uploads.
    pub bucket: String,

    /// Key prefix prepended to every uploaded object (e.g. `"notes/img/"`).
    pub dir: String,

    /// Signing region. Empty means the store's default region.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub region: String,

    /// Public URL base used instead of the bucket host (e.g. a CDN domain).
    #[serde(rename = "customDomain", skip_serializing_if = "String::is_empty")]
    pub custom_domain: String,

    /// Address the bucket as `<endpoint>/<bucket>` instead of
    /// `<bucket>.<endpoint>`. Only settable in the file.
    #[serde(rename = "forcePathStyle", skip_serializing_if = "std::ops::Not::not")]
    pub force_path_style: bool,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("access_key_id", &redact(&self.access_key_id))
            .field("access_key_secret", &redact(&self.access_key_secret))
            .field("endpoint", &self.endpoint)
            .field("bucket", &self.bucket)
            .field("dir", &self.dir)
            .field("region", &self.region)
            .field("custom_domain", &self.custom_domain)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() { "" } else { "[REDACTED]" }
}

impl Settings {
    /// Fields that must be non-empty before an upload can be attempted.
    pub const REQUIRED: [SettingField; 4] = [
        SettingField::AccessKeyId,
        SettingField::AccessKeySecret,
        SettingField::Endpoint,
        SettingField::Bucket,
    ];

    /// Read a field by name.
    pub fn get(&self, field: SettingField) -> &str {
        match field {
            SettingField::AccessKeyId => &self.access_key_id,
            SettingField::AccessKeySecret => &self.access_key_secret,
            SettingField::Endpoint => &self.endpoint,
            SettingField::Bucket => &self.bucket,
            SettingField::Dir => &self.dir,
            SettingField::Region => &self.region,
            SettingField::CustomDomain => &self.custom_domain,
        }
    }

    /// Overwrite a field by name.
    pub fn set(&mut self, field: SettingField, value: impl Into<String>) {
        let slot = match field {
            SettingField::AccessKeyId => &mut self.access_key_id,
            SettingField::AccessKeySecret => &mut self.access_key_secret,
            SettingField::Endpoint => &mut self.endpoint,
            SettingField::Bucket => &mut self.bucket,
            SettingField::Dir => &mut self.dir,
            SettingField::Region => &mut self.region,
            SettingField::CustomDomain => &mut self.custom_domain,
        };
        *slot = value.into();
    }

    /// Persisted names of the required fields that are empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        Self::REQUIRED
            .iter()
            .filter(|field| self.get(**field).trim().is_empty())
            .map(|field| field.key())
            .collect()
    }

    /// `true` when every required field is set.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// A single editable settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    /// [`Settings::access_key_id`], persisted as `accessKeyID`.
    AccessKeyId,
    /// [`Settings::access_key_secret`], persisted as `accessKeySecret`.
    AccessKeySecret,
    /// [`Settings::endpoint`].
    Endpoint,
    /// [`Settings::bucket`].
    Bucket,
    /// [`Settings::dir`], the key prefix.
    Dir,
    /// [`Settings::region`].
    Region,
    /// [`Settings::custom_domain`], persisted as `customDomain`.
    CustomDomain,
}

impl SettingField {
    /// All fields, in the order the settings panel shows them.
    pub const ALL: [Self; 7] = [
        Self::AccessKeyId,
        Self::AccessKeySecret,
        Self::Endpoint,
        Self::Bucket,
        Self::Dir,
        Self::Region,
        Self::CustomDomain,
    ];

    /// Name of the field in the settings file.
    pub fn key(self) -> &'static str {
        match self {
            Self::AccessKeyId => "accessKeyID",
            Self::AccessKeySecret => "accessKeySecret",
            Self::Endpoint => "endpoint",
            Self::Bucket => "bucket",
            Self::Dir => "dir",
            Self::Region => "region",
            Self::CustomDomain => "customDomain",
        }
    }
}

impl std::fmt::Display for SettingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SettingField {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| SettingsError::UnknownField(s.to_owned()))
    }
}
