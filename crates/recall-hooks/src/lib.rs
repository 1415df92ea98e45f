//! UI-state hooks over the recall composition runtime.
//!
//! Each hook is a free function called during composition. State lives in
//! `remember` slots, so a call site keeps its state across frames; timers
//! and listeners are released when the owning scope unmounts. All hooks are
//! single-threaded, like the runtime itself.

pub mod boolean;
pub mod clipboard;
pub mod debounce;
pub mod default_value;
pub mod event_listener;
pub mod interval;
pub mod isomorphic;
pub mod previous;
pub mod storage;
pub mod window_size;

pub use boolean::{BooleanState, use_boolean};
pub use clipboard::{ClipboardCopy, ClipboardError, ClipboardProvider, install_clipboard, use_clipboard_copy};
pub use debounce::use_debounce;
pub use default_value::{DefaultState, use_default};
pub use event_listener::use_event_listener;
pub use interval::{IntervalHandle, use_interval};
pub use isomorphic::use_isomorphic_effect;
pub use previous::use_previous;
pub use storage::{
    Codec, Initial, MemoryArea, StorageArea, StorageError, StorageOptions, StoredState,
    Subscribers, install_local_storage, install_session_storage, local_storage, session_storage,
    use_local_storage, use_local_storage_with, use_session_storage, use_session_storage_with,
    use_storage,
};
pub use window_size::{use_window_size, use_window_size_debounced};
