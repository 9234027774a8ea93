use pasteup_core::ClipboardPayload;

/// A paste signal as delivered by the host editor.
///
/// The host dispatches the event to every registered handler and runs its
/// own default paste only if no handler called
/// [`prevent_default`](Self::prevent_default).
#[derive(Debug, Clone, Default)]
pub struct PasteEvent {
    payload: Option<ClipboardPayload>,
    default_prevented: bool,
}

impl PasteEvent {
    /// Create an event carrying `payload`.
    pub fn new(payload: ClipboardPayload) -> Self {
        Self {
            payload: Some(payload),
            default_prevented: false,
        }
    }

    /// Create an event with no clipboard data attached.
    pub fn without_payload() -> Self {
        Self::default()
    }

    /// Suppress the host's default paste handling.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler suppressed the default paste.
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// The attached clipboard payload, if any.
    pub fn payload(&self) -> Option<&ClipboardPayload> {
        self.payload.as_ref()
    }

    /// Take the payload out of the event.
    pub fn take_payload(&mut self) -> Option<ClipboardPayload> {
        self.payload.take()
    }
}
