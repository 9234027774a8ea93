use std::sync::Arc;

use pasteup_core::ClipboardPayload;
use pasteup_settings::{SettingField, SettingsPanel};
use tracing::debug;

use crate::editor::Editor;
use crate::event::PasteEvent;
use crate::interceptor::{PasteInterceptor, PasteReport, PasteTask};

/// Callback the host invokes when an input on the settings panel changes.
pub type SettingChangeFn = dyn Fn(SettingField, &str) + Send + Sync;

/// Registration handle for a paste handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub u64);

/// Receives paste signals from the host.
///
/// `on_paste` runs synchronously inside the host's dispatch, so anything
/// that must happen before the default paste (suppressing it) happens
/// there. The returned task is awaited by the host against its editor.
pub trait PasteHandler: Send + Sync {
    /// Handle a paste signal.
    fn on_paste(&self, event: &mut PasteEvent) -> PasteTask;
}

impl PasteHandler for PasteInterceptor {
    fn on_paste(&self, event: &mut PasteEvent) -> PasteTask {
        PasteInterceptor::on_paste(self, event)
    }
}

/// The parts of a host editor the plugin integrates with.
pub trait EditorHost {
    /// Subscribe `handler` to paste events.
    fn register_paste_handler(&mut self, handler: Arc<dyn PasteHandler>) -> HookId;

    /// Remove a handler added by
    /// [`register_paste_handler`](Self::register_paste_handler).
    fn unregister_paste_handler(&mut self, id: HookId);

    /// Show `panel` in the host's settings UI and report every edit to
    /// `on_change`.
    fn add_settings_panel(&mut self, panel: SettingsPanel, on_change: Arc<SettingChangeFn>);

    /// Remove the settings panel.
    fn remove_settings_panel(&mut self);
}

/// What happened when [`MemoryHost::paste`] dispatched an event.
#[derive(Debug, Clone)]
pub struct DispatchedPaste {
    /// Whether the host's own paste ran because no handler suppressed it.
    pub default_fired: bool,
    /// One report per handler, in registration order.
    pub reports: Vec<PasteReport>,
}

/// In-process host for headless use and tests.
///
/// Its default paste inserts the clipboard text, like a plain text editor.
#[derive(Default)]
pub struct MemoryHost {
    next_id: u64,
    handlers: Vec<(HookId, Arc<dyn PasteHandler>)>,
    panel: Option<(SettingsPanel, Arc<SettingChangeFn>)>,
}

impl std::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryHost")
            .field("handlers", &self.handlers.len())
            .field("panel", &self.panel.as_ref().map(|(panel, _)| panel))
            .finish_non_exhaustive()
    }
}

impl MemoryHost {
    /// Create a host with no handlers and no settings panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered paste handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// The registered settings panel, if any.
    pub fn settings_panel(&self) -> Option<&SettingsPanel> {
        self.panel.as_ref().map(|(panel, _)| panel)
    }

    /// Simulate the user editing a settings input.
    ///
    /// Returns `false` if no panel is registered.
    pub fn edit_setting(&mut self, field: SettingField, value: &str) -> bool {
        let Some((panel, on_change)) = self.panel.as_mut() else {
            return false;
        };
        if let Some(input) = panel.fields.iter_mut().find(|f| f.field == field) {
            input.value = value.to_owned();
        }
        on_change(field, value);
        true
    }

    /// Dispatch a paste of `payload` into `editor`.
    ///
    /// Every handler sees the event synchronously first; the host's default
    /// paste runs only if none of them suppressed it. Handler tasks are then
    /// awaited in registration order.
    pub async fn paste<E: Editor + ?Sized>(
        &self,
        payload: Option<ClipboardPayload>,
        editor: &mut E,
    ) -> DispatchedPaste {
        let mut event = payload.map_or_else(PasteEvent::without_payload, PasteEvent::new);
        let tasks: Vec<PasteTask> = self
            .handlers
            .iter()
            .map(|(_, handler)| handler.on_paste(&mut event))
            .collect();

        let default_fired = !event.is_default_prevented();
        if default_fired {
            debug!("no handler claimed the paste, running default");
            if let Some(text) = event.payload().and_then(|p| p.text.as_deref()) {
                editor.replace_selection(text);
            }
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for task in tasks {
            reports.push(task.run(&mut *editor).await);
        }

        DispatchedPaste {
            default_fired,
            reports,
        }
    }
}

impl EditorHost for MemoryHost {
    fn register_paste_handler(&mut self, handler: Arc<dyn PasteHandler>) -> HookId {
        self.next_id += 1;
        let id = HookId(self.next_id);
        self.handlers.push((id, handler));
        id
    }

    fn unregister_paste_handler(&mut self, id: HookId) {
        self.handlers.retain(|(hook, _)| *hook != id);
    }

    fn add_settings_panel(&mut self, panel: SettingsPanel, on_change: Arc<SettingChangeFn>) {
        self.panel = Some((panel, on_change));
    }

    fn remove_settings_panel(&mut self) {
        self.panel = None;
    }
}
