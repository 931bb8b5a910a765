//! Single-owner gateway to the system clipboard.
//!
//! The clipboard is the one mutable resource every tool shares, so all
//! writes funnel through one [`ClipboardBridge`] instance instead of
//! each tool talking to the OS on its own. Last writer wins; there is
//! no history and no per-session isolation. Tests swap the OS backend
//! for an in-memory slot.

trait ClipboardBackend {
    fn set_text(&mut self, text: &str);
}

/// Pushes to the OS clipboard via arboard, degrading quietly when no
/// clipboard service is reachable (e.g. headless sessions).
struct SystemBackend;

impl ClipboardBackend for SystemBackend {
    fn set_text(&mut self, text: &str) {
        if let Ok(mut clipboard) = arboard::Clipboard::new() {
            let _ = clipboard.set_text(text);
        }
    }
}

#[derive(Default)]
struct MemoryBackend {
    slot: Option<String>,
}

impl ClipboardBackend for MemoryBackend {
    fn set_text(&mut self, text: &str) {
        self.slot = Some(text.to_string());
    }
}

/// Process-wide clipboard slot. `set` is infallible to callers: the
/// bridge's own last-value cache is what the rest of the system
/// observes, and backend failures are not surfaced.
pub struct ClipboardBridge {
    backend: Box<dyn ClipboardBackend>,
    last: Option<String>,
}

impl ClipboardBridge {
    /// Bridge backed by the OS clipboard.
    pub fn system() -> Self {
        Self {
            backend: Box::new(SystemBackend),
            last: None,
        }
    }

    /// Bridge backed by an in-memory slot (for testing).
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::default()),
            last: None,
        }
    }

    /// Replace the clipboard value.
    pub fn set(&mut self, text: &str) {
        self.backend.set_text(text);
        self.last = Some(text.to_string());
    }

    /// The most recent value written through this bridge.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}
