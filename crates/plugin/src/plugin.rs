//! Plugin lifecycle: activation, settings edits, deactivation.

use std::sync::Arc;

use parking_lot::Mutex;
use pasteup_s3::S3ObjectStore;
use pasteup_settings::{
    JsonFileSettingsStore, SettingField, Settings, SettingsHolder, SettingsPanel, SettingsStore,
    SettingsWatcher,
};
use pasteup_store::DynObjectStore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::PluginError;
use crate::host::{EditorHost, HookId};
use crate::interceptor::{PasteInterceptor, PasteOptions, UploadTarget};

/// Builds the storage backend for a given set of settings.
pub type StoreFactory = dyn Fn(&Settings) -> Arc<dyn DynObjectStore> + Send + Sync;

/// Plugin configuration, consumed by [`start`](Self::start).
pub struct Plugin {
    settings_store: Arc<dyn SettingsStore>,
    factory: Arc<StoreFactory>,
    options: PasteOptions,
}

impl std::fmt::Debug for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Plugin")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Plugin {
    /// Configure a plugin that persists settings in `settings_store` and
    /// builds its storage backend with `factory`.
    pub fn new<F>(settings_store: Arc<dyn SettingsStore>, factory: F) -> Self
    where
        F: Fn(&Settings) -> Arc<dyn DynObjectStore> + Send + Sync + 'static,
    {
        Self {
            settings_store,
            factory: Arc::new(factory),
            options: PasteOptions::default(),
        }
    }

    /// Configure a plugin that uploads to an S3-compatible bucket.
    pub fn s3(settings_store: Arc<dyn SettingsStore>) -> Self {
        Self::new(settings_store, |settings| {
            Arc::new(S3ObjectStore::from_settings(settings))
        })
    }

    /// Override the paste pipeline options.
    #[must_use]
    pub fn with_options(mut self, options: PasteOptions) -> Self {
        self.options = options;
        self
    }

    /// Activate the plugin in `host`.
    ///
    /// Loads the settings, builds the storage backend, subscribes to paste
    /// events, and registers the settings panel. Incomplete settings are
    /// not an error here; uploads report them when they are attempted.
    pub fn start(self, host: &mut dyn EditorHost) -> Result<PluginHandle, PluginError> {
        let holder = SettingsHolder::load_from(self.settings_store)?;
        let settings = holder.get().clone();
        if !settings.is_complete() {
            warn!(
                missing = ?settings.missing_fields(),
                "upload settings incomplete, image pastes will fail until configured"
            );
        }

        let store = (self.factory)(&settings);
        info!(store = store.name(), dir = %settings.dir, "pasteup plugin started");
        let interceptor = Arc::new(PasteInterceptor::new(
            UploadTarget::new(store, settings.dir.clone()),
            self.options,
        ));

        let shared = Arc::new(Shared {
            interceptor: Arc::clone(&interceptor),
            settings: Mutex::new(holder),
            factory: self.factory,
        });

        let hook = host.register_paste_handler(interceptor);
        let on_change = Arc::clone(&shared);
        host.add_settings_panel(
            SettingsPanel::new(&settings),
            Arc::new(move |field: SettingField, value: &str| {
                if let Err(e) = on_change.update_setting(field, value) {
                    error!(field = %field, error = %e, "failed to save settings");
                }
            }),
        );

        Ok(PluginHandle {
            shared,
            hook,
            watcher: None,
        })
    }
}

struct Shared {
    interceptor: Arc<PasteInterceptor>,
    settings: Mutex<SettingsHolder>,
    factory: Arc<StoreFactory>,
}

impl Shared {
    fn update_setting(&self, field: SettingField, value: &str) -> Result<Settings, PluginError> {
        let mut holder = self.settings.lock();
        let settings = holder.update(field, value)?.clone();
        info!(field = %field, "setting updated");
        self.rebuild(&settings);
        Ok(settings)
    }

    fn apply(&self, settings: Settings) -> bool {
        let mut holder = self.settings.lock();
        if !holder.adopt(settings) {
            return false;
        }
        info!("settings changed on disk");
        self.rebuild(holder.get());
        true
    }

    /// Adopt what `store` holds right now. The read happens under the
    /// settings lock, so it is ordered with panel saves.
    fn reload_from(&self, store: &dyn SettingsStore) -> Result<bool, PluginError> {
        let mut holder = self.settings.lock();
        let on_disk = store.load()?;
        if !holder.adopt(on_disk) {
            return Ok(false);
        }
        info!("settings changed on disk");
        self.rebuild(holder.get());
        Ok(true)
    }

    fn rebuild(&self, settings: &Settings) {
        let store = (self.factory)(settings);
        info!(store = store.name(), dir = %settings.dir, "rebuilding upload target");
        self.interceptor.replace_target(UploadTarget::new(store, settings.dir.clone()));
    }
}

/// A running plugin.
///
/// Dropping the handle stops the settings watcher but leaves the host
/// registrations in place; call [`stop`](Self::stop) to remove them.
pub struct PluginHandle {
    shared: Arc<Shared>,
    hook: HookId,
    watcher: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("hook", &self.hook)
            .field("interceptor", &self.shared.interceptor)
            .field("watching", &self.watcher.is_some())
            .finish()
    }
}

impl PluginHandle {
    /// Set one field, save the whole record, and rebuild the storage
    /// backend. Pastes already running keep the backend they started with.
    pub fn update_setting(
        &self,
        field: SettingField,
        value: impl AsRef<str>,
    ) -> Result<Settings, PluginError> {
        self.shared.update_setting(field, value.as_ref())
    }

    /// Adopt settings loaded outside the panel and rebuild if they changed.
    /// Nothing is written back. Returns `true` if a rebuild happened.
    pub fn apply_settings(&self, settings: Settings) -> bool {
        self.shared.apply(settings)
    }

    /// The current settings.
    pub fn settings(&self) -> Settings {
        self.shared.settings.lock().get().clone()
    }

    /// A settings panel reflecting the current settings.
    pub fn settings_panel(&self) -> SettingsPanel {
        SettingsPanel::new(self.shared.settings.lock().get())
    }

    /// The paste interceptor registered with the host.
    pub fn interceptor(&self) -> &Arc<PasteInterceptor> {
        &self.shared.interceptor
    }

    /// Registration handle of the paste hook.
    pub fn hook(&self) -> HookId {
        self.hook
    }

    /// Reload settings whenever `store`'s file changes on disk.
    ///
    /// Replaces any watcher started earlier. Must be called from within a
    /// tokio runtime.
    pub fn watch_settings_file(&mut self, store: JsonFileSettingsStore) -> Result<(), PluginError> {
        tokio::runtime::Handle::try_current().map_err(|_| PluginError::NoRuntime)?;

        let shared = Arc::clone(&self.shared);
        let file = store.clone();
        // The watcher's own read may predate a panel save; read again.
        let handle = SettingsWatcher::new(store, move |_| {
            if let Err(e) = shared.reload_from(&file) {
                error!(error = %e, "failed to reload settings");
            }
        })
        .spawn();

        if let Some(previous) = self.watcher.replace(handle) {
            previous.abort();
        }
        Ok(())
    }

    /// Deactivate the plugin: unsubscribe from paste events, remove the
    /// settings panel, and stop the settings watcher.
    pub fn stop(mut self, host: &mut dyn EditorHost) {
        host.unregister_paste_handler(self.hook);
        host.remove_settings_panel();
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        info!("pasteup plugin stopped");
    }
}

impl Drop for PluginHandle {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}
