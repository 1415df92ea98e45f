use std::cell::RefCell;
use std::rc::Rc;

use recall_core::{Signal, remember, signal};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard provider installed")]
    Unavailable,
    #[error("clipboard backend: {0}")]
    Backend(String),
}

/// Write-only text clipboard capability. Platforms install one per thread;
/// its absence is a recoverable condition, not a failure to start.
pub trait ClipboardProvider {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

thread_local! {
    static PROVIDER: RefCell<Option<Rc<RefCell<dyn ClipboardProvider>>>> =
        const { RefCell::new(None) };
}

pub fn install_clipboard(provider: impl ClipboardProvider + 'static) {
    let provider: Rc<RefCell<dyn ClipboardProvider>> = Rc::new(RefCell::new(provider));
    PROVIDER.with(|p| *p.borrow_mut() = Some(provider));
}

fn write_text(text: &str) -> Result<(), ClipboardError> {
    let provider = PROVIDER.with(|p| p.borrow().clone());
    match provider {
        Some(p) => p.borrow_mut().write_text(text),
        None => Err(ClipboardError::Unavailable),
    }
}

/// Clipboard copy state: the last successfully copied text plus the copy
/// operation itself.
#[derive(Clone)]
pub struct ClipboardCopy {
    copied: Signal<Option<String>>,
}

pub fn use_clipboard_copy() -> ClipboardCopy {
    let copied = remember(|| signal(None::<String>));
    ClipboardCopy {
        copied: (*copied).clone(),
    }
}

impl ClipboardCopy {
    /// Last successfully copied text, reset on any failed copy.
    pub fn copied(&self) -> Option<String> {
        self.copied.get()
    }

    /// Copies `text`, reporting success. Missing provider, empty input, and
    /// backend errors all log a warning and return `false`.
    pub fn copy(&self, text: &str) -> bool {
        if text.is_empty() {
            log::warn!("clipboard: no text provided to copy");
            self.copied.set(None);
            return false;
        }
        match write_text(text) {
            Ok(()) => {
                self.copied.set(Some(text.to_string()));
                true
            }
            Err(err) => {
                log::warn!("clipboard: copy failed: {err}");
                self.copied.set(None);
                false
            }
        }
    }
}
