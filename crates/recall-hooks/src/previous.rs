use std::cell::RefCell;

use recall_core::remember;

struct Track<T> {
    previous: Option<T>,
    current: Option<T>,
}

/// Previous distinct value seen at this call site; `None` until the value
/// first changes. Recomposing with an unchanged value keeps the previous
/// value stable.
pub fn use_previous<T: Clone + PartialEq + 'static>(value: T) -> Option<T> {
    let slot = remember(|| {
        RefCell::new(Track {
            previous: None::<T>,
            current: None,
        })
    });

    let mut track = slot.borrow_mut();
    if track.current.as_ref() != Some(&value) {
        track.previous = track.current.take();
        track.current = Some(value);
    }
    track.previous.clone()
}
