//! Environment integration: persistent storage and clipboard backends.
//!
//! The hooks resolve their storage areas and clipboard provider from
//! thread-local installs; this crate supplies the backends a real
//! application wants — a file-backed persistent area, an in-memory session
//! area, and the system clipboard — plus one-call setup:
//!
//! ```rust,no_run
//! recall_platform::init_storage("my-app").expect("storage");
//! ```

pub mod clipboard;
pub mod storage;

pub use clipboard::MemoryClipboard;
#[cfg(feature = "desktop")]
pub use clipboard::{ArboardClipboard, init_desktop_clipboard};
pub use storage::{FileArea, init_storage};
