use recall_core::{disposable_effect, on_unmount, remember, signal, timer};
use web_time::Duration;

/// Delayed mirror of `value`: the mirror adopts a new value only after
/// `delay` has elapsed with no further changes. Every change restarts the
/// window, cancelling the pending timer, so a burst of updates propagates
/// exactly once. Teardown cancels the pending timer as well.
pub fn use_debounce<T: Clone + PartialEq + 'static>(value: T, delay: Duration) -> T {
    let debounced = remember(|| signal(value.clone()));
    let out = (*debounced).clone();

    disposable_effect((value.clone(), delay), {
        let mirror = out.clone();
        move || {
            let handle = timer::schedule(delay, move || mirror.set(value.clone()));
            on_unmount(move || handle.cancel())
        }
    });

    out.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::{Host, Signal, TestClock, signal};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn compose(host: &mut Host, input: &Signal<i32>) -> i32 {
        let input = input.clone();
        host.frame(move || use_debounce(input.get(), Duration::from_millis(500)))
    }

    #[test]
    fn burst_propagates_once_with_last_value() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let input = signal(0);

        assert_eq!(compose(&mut host, &input), 0);

        // three updates inside one 500ms window
        for v in [1, 2, 3] {
            input.set(v);
            clock.advance(Duration::from_millis(100));
            assert_eq!(compose(&mut host, &input), 0);
        }

        // window elapses uninterrupted; the timer fires at the end of this
        // frame and the next frame observes the settled value
        clock.advance(Duration::from_millis(500));
        assert_eq!(compose(&mut host, &input), 0);
        assert_eq!(compose(&mut host, &input), 3);
    }

    #[test]
    fn propagation_count_is_one_per_settled_burst() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let input = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut last = compose(&mut host, &input);
        seen.borrow_mut().push(last);

        for v in [1, 2, 3] {
            input.set(v);
            clock.advance(Duration::from_millis(100));
            let cur = compose(&mut host, &input);
            if cur != last {
                seen.borrow_mut().push(cur);
                last = cur;
            }
        }
        clock.advance(Duration::from_millis(500));
        for _ in 0..2 {
            let cur = compose(&mut host, &input);
            if cur != last {
                seen.borrow_mut().push(cur);
                last = cur;
            }
        }

        assert_eq!(*seen.borrow(), vec![0, 3]);
    }

    #[test]
    fn unmount_cancels_pending_window() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let input = signal(0);

        compose(&mut host, &input);
        input.set(9);
        compose(&mut host, &input);

        drop(host);
        clock.advance(Duration::from_millis(1000));
        // the pending timer was cancelled with the host scope
        assert_eq!(recall_core::timer::fire_due(), 0);
    }
}
