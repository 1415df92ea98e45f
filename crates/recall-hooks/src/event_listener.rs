use std::cell::RefCell;
use std::rc::Rc;

use recall_core::{disposable_effect, events, remember};

/// Attaches `handler` to the typed event bus for the lifetime of this call
/// site. The listener registers once; the latest handler passed on
/// recomposition is the one invoked. Detaches on unmount.
pub fn use_event_listener<E: 'static>(handler: impl Fn(&E) + 'static) {
    let handler: Rc<dyn Fn(&E)> = Rc::new(handler);
    let saved = remember(|| RefCell::new(handler.clone()));
    *saved.borrow_mut() = handler;

    disposable_effect((), {
        let saved = saved.clone();
        move || {
            events::listen::<E>(move |event| {
                let f = saved.borrow().clone();
                f(event);
            })
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::Host;

    #[derive(Debug)]
    struct KeyDown(char);

    #[test]
    fn receives_dispatched_events() {
        let mut host = Host::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        {
            let seen = seen.clone();
            host.frame(move || {
                use_event_listener::<KeyDown>(move |e| seen.borrow_mut().push(e.0));
            });
        }

        host.dispatch(&KeyDown('a'));
        host.dispatch(&KeyDown('b'));
        assert_eq!(*seen.borrow(), vec!['a', 'b']);
    }

    #[test]
    fn latest_handler_is_invoked_once() {
        let mut host = Host::new();
        let seen: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        for label in ["first", "second"] {
            let seen = seen.clone();
            host.frame(move || {
                use_event_listener::<KeyDown>(move |_| seen.borrow_mut().push(label));
            });
        }

        host.dispatch(&KeyDown('x'));
        assert_eq!(*seen.borrow(), vec!["second"]);
    }

    #[test]
    fn detaches_on_unmount() {
        let mut host = Host::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        {
            let seen = seen.clone();
            host.frame(move || {
                use_event_listener::<KeyDown>(move |e| seen.borrow_mut().push(e.0));
            });
        }
        drop(host);

        recall_core::events::emit(&KeyDown('z'));
        assert!(seen.borrow().is_empty());
    }
}
