use std::cell::RefCell;
use std::rc::Rc;

use recall_hooks::clipboard::{ClipboardError, ClipboardProvider, install_clipboard};

/// System clipboard through `arboard`.
#[cfg(feature = "desktop")]
pub struct ArboardClipboard(arboard::Clipboard);

#[cfg(feature = "desktop")]
impl ArboardClipboard {
    /// `None` when the platform has no clipboard to offer (e.g. a headless
    /// session); callers treat that as a recoverable condition.
    pub fn new() -> Option<Self> {
        arboard::Clipboard::new().ok().map(Self)
    }
}

#[cfg(feature = "desktop")]
impl ClipboardProvider for ArboardClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.0
            .set_text(text.to_string())
            .map_err(|e| ClipboardError::Backend(e.to_string()))
    }
}

/// Install the system clipboard for this thread, reporting whether one was
/// available.
#[cfg(feature = "desktop")]
pub fn init_desktop_clipboard() -> bool {
    match ArboardClipboard::new() {
        Some(provider) => {
            install_clipboard(provider);
            true
        }
        None => {
            log::warn!("clipboard: system clipboard unavailable");
            false
        }
    }
}

/// In-memory provider for headless runs and tests.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    /// Installs a clone of this provider, keeping this handle for
    /// inspection.
    pub fn install(&self) {
        install_clipboard(self.clone());
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trip() {
        let clip = MemoryClipboard::default();
        let mut writer = clip.clone();
        writer.write_text("copied").unwrap();
        assert_eq!(clip.contents().as_deref(), Some("copied"));
    }
}
