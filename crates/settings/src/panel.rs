use crate::settings::{SettingField, Settings};

/// Title shown at the top of the settings panel.
pub const PANEL_TITLE: &str = "Image Upload Settings";

/// One text input on the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelField {
    /// Field the input is bound to.
    pub field: SettingField,
    /// Short label (e.g. `"Access Key ID"`).
    pub label: &'static str,
    /// One-line description under the label.
    pub description: &'static str,
    /// Placeholder shown while the input is empty.
    pub placeholder: &'static str,
    /// Whether the host should mask the input.
    pub secret: bool,
    /// Current value.
    pub value: String,
}

/// Host-agnostic description of the settings panel.
///
/// The host renders one text input per [`PanelField`] and reports every edit
/// back through the plugin's settings-change callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPanel {
    /// Panel heading.
    pub title: &'static str,
    /// Inputs, in display order.
    pub fields: Vec<PanelField>,
}

impl SettingsPanel {
    /// Build the panel for the given settings.
    pub fn new(settings: &Settings) -> Self {
        Self {
            title: PANEL_TITLE,
            fields: SettingField::ALL
                .into_iter()
                .map(|field| {
                    let (label, description, placeholder) = copy_for(field);
                    PanelField {
                        field,
                        label,
                        description,
                        placeholder,
                        secret: field == SettingField::AccessKeySecret,
                        value: settings.get(field).to_owned(),
                    }
                })
                .collect(),
        }
    }

    /// Look up the input bound to `field`.
    pub fn field(&self, field: SettingField) -> Option<&PanelField> {
        self.fields.iter().find(|f| f.field == field)
    }
}

fn copy_for(field: SettingField) -> (&'static str, &'static str, &'static str) {
    match field {
        SettingField::AccessKeyId => (
            "Access Key ID",
            "The Access Key ID for API access",
            "Enter your Access Key ID",
        ),
        SettingField::AccessKeySecret => (
            "Access Key Secret",
            "The Access Key Secret for API access",
            "Enter your Access Key Secret",
        ),
        SettingField::Endpoint => (
            "Endpoint",
            "The API endpoint URL",
            "Enter the API endpoint URL",
        ),
        SettingField::Bucket => ("Bucket", "The storage bucket name", "Enter the bucket name"),
        SettingField::Dir => (
            "Directory",
            "The default directory for uploads",
            "Enter the default directory",
        ),
        SettingField::Region => (
            "Region",
            "Signing region, leave empty for the default",
            "us-east-1",
        ),
        SettingField::CustomDomain => (
            "Custom domain",
            "Public URL base for uploaded images, e.g. a CDN",
            "https://img.example.com",
        ),
    }
}
