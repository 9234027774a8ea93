use std::sync::Arc;

use tracing::debug;

use crate::error::SettingsError;
use crate::settings::{SettingField, Settings};
use crate::store::SettingsStore;

/// Holds the current [`Settings`] and writes every change through to a
/// [`SettingsStore`].
///
/// The held value only changes through [`load`](Self::load),
/// [`save`](Self::save), [`update`](Self::update), or [`adopt`](Self::adopt).
pub struct SettingsHolder {
    store: Arc<dyn SettingsStore>,
    current: Settings,
}

impl std::fmt::Debug for SettingsHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsHolder")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

impl SettingsHolder {
    /// Create a holder with default settings. Nothing is read until
    /// [`load`](Self::load) is called.
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            current: Settings::default(),
        }
    }

    /// Create a holder and immediately load from `store`.
    pub fn load_from(store: Arc<dyn SettingsStore>) -> Result<Self, SettingsError> {
        let mut holder = Self::new(store);
        holder.load()?;
        Ok(holder)
    }

    /// Reload from the store, merging over defaults.
    pub fn load(&mut self) -> Result<&Settings, SettingsError> {
        self.current = self.store.load()?;
        debug!(settings = ?self.current, "settings loaded");
        Ok(&self.current)
    }

    /// Replace the held settings and persist them.
    ///
    /// The held value is only replaced once the store accepted it.
    pub fn save(&mut self, settings: Settings) -> Result<(), SettingsError> {
        self.store.save(&settings)?;
        self.current = settings;
        Ok(())
    }

    /// Set one field and persist the whole record.
    pub fn update(
        &mut self,
        field: SettingField,
        value: impl Into<String>,
    ) -> Result<&Settings, SettingsError> {
        let mut next = self.current.clone();
        next.set(field, value);
        self.save(next)?;
        Ok(&self.current)
    }

    /// Take over settings that were loaded elsewhere (e.g. by a file
    /// watcher) without writing them back. Returns `true` if they differ
    /// from the held value.
    pub fn adopt(&mut self, settings: Settings) -> bool {
        if settings == self.current {
            return false;
        }
        self.current = settings;
        true
    }

    /// The currently held settings.
    pub fn get(&self) -> &Settings {
        &self.current
    }
}
