//! File watcher for settings hot-reload.
//!
//! [`SettingsWatcher`] monitors the settings file for changes made outside
//! the settings panel and hands the reloaded [`Settings`] to a callback.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info, warn};

use crate::settings::Settings;
use crate::store::{JsonFileSettingsStore, SettingsStore};

/// Default debounce interval for filesystem change events.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Callback invoked with freshly reloaded settings.
pub type ReloadFn = dyn Fn(Settings) + Send + Sync;

/// Watches the settings file and reloads it after it settles.
pub struct SettingsWatcher {
    store: JsonFileSettingsStore,
    on_reload: Arc<ReloadFn>,
    debounce: Duration,
}

impl SettingsWatcher {
    /// Create a watcher for the file behind `store`.
    pub fn new<F>(store: JsonFileSettingsStore, on_reload: F) -> Self
    where
        F: Fn(Settings) + Send + Sync + 'static,
    {
        Self {
            store,
            on_reload: Arc::new(on_reload),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Override the default debounce duration.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Spawn the watcher as a background tokio task.
    ///
    /// Abort the returned handle to stop watching.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                error!(error = %e, "settings watcher exited with error");
            }
        })
    }

    async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (tx, mut rx) = tokio::sync::mpsc::channel::<()>(16);
        let path = self.store.path().to_path_buf();

        // Watch the parent directory; editors often replace files atomically.
        let watch_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf();

        let file_name = path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();

        let _watcher = {
            let mut watcher = RecommendedWatcher::new(
                move |res: Result<notify::Event, notify::Error>| match res {
                    Ok(event) => {
                        let ours = event
                            .paths
                            .iter()
                            .any(|p| p.file_name().is_some_and(|n| n == file_name.as_os_str()));
                        if is_relevant_event(event.kind) && ours {
                            // A full channel already has a reload queued.
                            let _ = tx.try_send(());
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "filesystem watcher error");
                    }
                },
                notify::Config::default(),
            )?;
            watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
            info!(path = %path.display(), "settings watcher started");
            watcher
        };

        loop {
            if rx.recv().await.is_none() {
                debug!("settings watcher channel closed, shutting down");
                break;
            }

            tokio::time::sleep(self.debounce).await;
            while rx.try_recv().is_ok() {}

            self.reload(&path);
        }

        Ok(())
    }

    fn reload(&self, path: &Path) {
        info!(path = %path.display(), "reloading settings");
        match self.store.load() {
            Ok(settings) => (self.on_reload)(settings),
            Err(e) => {
                error!(error = %e, "failed to reload settings, keeping previous state");
            }
        }
    }
}

/// Returns `true` for filesystem events that might indicate a settings change.
fn is_relevant_event(kind: EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}
