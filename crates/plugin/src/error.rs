use pasteup_settings::SettingsError;
use thiserror::Error;

/// Errors surfaced by the plugin lifecycle.
///
/// Paste handling itself never fails; upload errors end up in the
/// [`PasteReport`](crate::PasteReport) instead.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Settings could not be loaded or saved.
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// The settings watcher needs a running tokio runtime.
    #[error("no tokio runtime available to run the settings watcher")]
    NoRuntime,
}
