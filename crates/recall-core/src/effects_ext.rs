use crate::{Dispose, remember, scoped_effect};
use std::cell::RefCell;

/// Keyed effect: runs on first composition and again whenever `key` changes,
/// cleaning up the previous run first. Cleanup also runs on unmount.
pub fn disposable_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let last_key = remember(|| RefCell::new(None::<K>));
    let cleanup_slot = remember(|| RefCell::new(None::<Dispose>));
    let installed = remember(|| RefCell::new(false));

    // Install a single unmount disposer for this callsite.
    if !*installed.borrow() {
        *installed.borrow_mut() = true;
        let cleanup_slot = cleanup_slot.clone();
        scoped_effect(move || {
            Box::new(move || {
                if let Some(d) = cleanup_slot.borrow_mut().take() {
                    d.run();
                }
            })
        });
    }

    // Key change: cleanup previous + run new effect
    let changed = last_key.borrow().as_ref() != Some(&key);
    if changed {
        *last_key.borrow_mut() = Some(key);

        if let Some(d) = cleanup_slot.borrow_mut().take() {
            d.run();
        }

        let d = effect();
        *cleanup_slot.borrow_mut() = Some(d);
    }
}

/// Runs on every recomposition.
pub fn side_effect(effect: impl Fn()) {
    effect();
}

/// Queues `f` to run after the current composition commits: at the end of
/// `Host::frame`, or when the compose guard ends in bare composition. The
/// closure must not compose.
pub fn deferred_effect(f: impl FnOnce() + 'static) {
    crate::runtime::defer(Box::new(f));
}
