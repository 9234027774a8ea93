//! Upload destination settings for pasteup.
//!
//! [`Settings`] is the persisted record (field names `accessKeyID`,
//! `accessKeySecret`, `endpoint`, `bucket`, `dir`). A [`SettingsHolder`]
//! keeps the current value and writes every edit through to a
//! [`SettingsStore`]. [`SettingsPanel`] describes the inputs a host renders,
//! and [`SettingsWatcher`] picks up edits made to the file directly.

pub mod error;
pub mod holder;
pub mod panel;
pub mod settings;
pub mod store;
pub mod watcher;

pub use error::SettingsError;
pub use holder::SettingsHolder;
pub use panel::{PANEL_TITLE, PanelField, SettingsPanel};
pub use settings::{SettingField, Settings};
pub use store::{DEFAULT_SETTINGS_FILE, JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
pub use watcher::SettingsWatcher;
