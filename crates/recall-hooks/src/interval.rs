use std::cell::RefCell;
use std::rc::Rc;

use recall_core::{TimerHandle, disposable_effect, on_unmount, remember, timer};
use web_time::Duration;

/// Manual control over a running interval. `stop` is idempotent and safe
/// after the host has already torn the interval down.
#[derive(Clone)]
pub struct IntervalHandle {
    timer: Rc<RefCell<Option<TimerHandle>>>,
}

impl IntervalHandle {
    pub fn stop(&self) {
        if let Some(t) = self.timer.borrow_mut().take() {
            t.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .borrow()
            .as_ref()
            .is_some_and(|t| t.is_scheduled())
    }
}

/// Invokes `callback` every `delay`. The latest callback passed on
/// recomposition is the one the tick invokes; changing its identity does
/// not restart the timer. `None` suspends scheduling entirely. Stopping
/// through the returned handle is permanent until `delay` changes.
pub fn use_interval(callback: impl Fn() + 'static, delay: Option<Duration>) -> IntervalHandle {
    // remember the latest callback; the ticking timer reads through this slot
    let cb: Rc<dyn Fn()> = Rc::new(callback);
    let saved = remember(|| RefCell::new(cb.clone()));
    *saved.borrow_mut() = cb;

    let slot: Rc<RefCell<Option<TimerHandle>>> = remember(|| RefCell::new(None));

    disposable_effect(delay, {
        let saved = saved.clone();
        let slot = slot.clone();
        move || match delay {
            Some(every) => {
                let tick = {
                    let saved = saved.clone();
                    move || {
                        let cb = saved.borrow().clone();
                        cb();
                    }
                };
                let handle = timer::schedule_repeating(every, tick);
                *slot.borrow_mut() = Some(handle);
                on_unmount(move || {
                    if let Some(t) = slot.borrow_mut().take() {
                        t.cancel();
                    }
                })
            }
            None => {
                *slot.borrow_mut() = None;
                on_unmount(|| {})
            }
        }
    });

    IntervalHandle { timer: slot }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::{Host, TestClock};

    fn counting(host: &mut Host, count: &Rc<RefCell<u32>>, delay: Option<Duration>) -> IntervalHandle {
        let count = count.clone();
        host.frame(move || use_interval(move || *count.borrow_mut() += 1, delay))
    }

    #[test]
    fn ticks_on_schedule() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let count = Rc::new(RefCell::new(0));
        let delay = Some(Duration::from_millis(100));

        counting(&mut host, &count, delay);
        assert_eq!(*count.borrow(), 0);

        clock.advance(Duration::from_millis(100));
        counting(&mut host, &count, delay);
        assert_eq!(*count.borrow(), 1);

        clock.advance(Duration::from_millis(100));
        counting(&mut host, &count, delay);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn null_delay_never_fires() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let count = Rc::new(RefCell::new(0));

        counting(&mut host, &count, None);
        clock.advance(Duration::from_millis(1000));
        counting(&mut host, &count, None);
        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn stop_is_idempotent_and_final() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let count = Rc::new(RefCell::new(0));
        let delay = Some(Duration::from_millis(100));

        let handle = counting(&mut host, &count, delay);
        clock.advance(Duration::from_millis(100));
        counting(&mut host, &count, delay);
        assert_eq!(*count.borrow(), 1);

        handle.stop();
        handle.stop();
        assert!(!handle.is_running());

        clock.advance(Duration::from_millis(300));
        counting(&mut host, &count, delay);
        assert_eq!(*count.borrow(), 1);
    }

    fn labelled(host: &mut Host, hits: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) {
        let hits = hits.clone();
        host.frame(move || {
            use_interval(
                move || hits.borrow_mut().push(label),
                Some(Duration::from_millis(100)),
            );
        });
    }

    #[test]
    fn latest_callback_wins_without_restarting() {
        let clock = TestClock::install();
        let mut host = Host::new();
        let hits: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        labelled(&mut host, &hits, "first");
        clock.advance(Duration::from_millis(50));
        // identity change halfway through the window must not re-arm the timer
        labelled(&mut host, &hits, "second");
        clock.advance(Duration::from_millis(50));
        labelled(&mut host, &hits, "second");

        assert_eq!(*hits.borrow(), vec!["second"]);
    }
}
