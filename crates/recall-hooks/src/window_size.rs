use recall_core::{Host, ViewportSize};
use web_time::Duration;

use crate::debounce::use_debounce;

/// Current host viewport. `None` in bare composition or before the platform
/// reported a size.
pub fn use_window_size() -> Option<ViewportSize> {
    Host::current_viewport().and_then(|sig| sig.get())
}

/// Like [`use_window_size`], but resize bursts settle for `delay` before
/// propagating.
pub fn use_window_size_debounced(delay: Duration) -> Option<ViewportSize> {
    use_debounce(use_window_size(), delay)
}
