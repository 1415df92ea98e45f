use std::cell::RefCell;
use std::rc::Rc;

use recall_core::{Dispose, Host, deferred_effect, disposable_effect};

/// Environment-appropriate effect timing.
///
/// Inside a host frame the effect runs synchronously during composition
/// (layout timing). In bare, host-less composition it is deferred until the
/// composition commits, so code that assumes a live frame loop never runs
/// mid-build. Keyed like [`disposable_effect`]; cleanup runs on key change
/// and unmount in both environments.
pub fn use_isomorphic_effect<K: PartialEq + Clone + 'static>(
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    if Host::is_active() {
        disposable_effect(key, effect);
    } else {
        disposable_effect(key, move || {
            let cleanup: Rc<RefCell<Option<Dispose>>> = Rc::new(RefCell::new(None));
            let slot = cleanup.clone();
            deferred_effect(move || {
                *slot.borrow_mut() = Some(effect());
            });
            Dispose::new(move || {
                if let Some(d) = cleanup.borrow_mut().take() {
                    d.run();
                }
            })
        });
    }
}
