use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::error::SettingsError;
use crate::settings::Settings;

/// Default settings file name.
pub const DEFAULT_SETTINGS_FILE: &str = "data.json";

/// Persistence backend for [`Settings`].
pub trait SettingsStore: Send + Sync {
    /// Load the stored settings merged over defaults.
    ///
    /// Returns [`Settings::default`] if nothing has been stored yet.
    fn load(&self) -> Result<Settings, SettingsError>;

    /// Persist the full settings record, replacing whatever was stored.
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;
}

/// Parse a stored settings document.
///
/// An empty document or a JSON `null` yields the defaults.
fn parse(contents: &str) -> Result<Settings, SettingsError> {
    if contents.trim().is_empty() {
        return Ok(Settings::default());
    }
    let stored: Option<Settings> = serde_json::from_str(contents)?;
    Ok(stored.unwrap_or_default())
}

/// Settings stored as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store backed by [`DEFAULT_SETTINGS_FILE`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_SETTINGS_FILE))
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings file not found, using defaults");
                return Ok(Settings::default());
            }
            Err(e) => return Err(SettingsError::io(&self.path, e)),
        };
        parse(&contents)
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let contents = serde_json::to_string_pretty(settings)?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
        }

        // Readers only ever see a complete file: write a sibling, then rename.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| SettingsError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| SettingsError::io(&self.path, e))?;

        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

/// Settings kept in memory as a serialized document.
///
/// Goes through the same serialization as [`JsonFileSettingsStore`].
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    document: Mutex<Option<String>>,
}

impl MemorySettingsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a raw JSON document.
    pub fn with_document(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
        }
    }

    /// The raw stored document, if any.
    pub fn document(&self) -> Option<String> {
        self.document.lock().clone()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        match self.document.lock().as_deref() {
            Some(doc) => parse(doc),
            None => Ok(Settings::default()),
        }
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let doc = serde_json::to_string(settings)?;
        *self.document.lock() = Some(doc);
        Ok(())
    }
}
