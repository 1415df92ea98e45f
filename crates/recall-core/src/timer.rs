use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use web_time::{Duration, Instant};

use crate::clock;

new_key_type! {
    struct TimerKey;
}

struct Entry {
    deadline: Instant,
    period: Option<Duration>,
    callback: Rc<dyn Fn()>,
}

thread_local! {
    static TIMERS: RefCell<SlotMap<TimerKey, Entry>> = RefCell::new(SlotMap::with_key());
}

/// Handle owning a scheduled timer. Versioned keys make `cancel` idempotent
/// and safe after the timer has already fired.
#[derive(Clone)]
pub struct TimerHandle {
    key: TimerKey,
}

impl TimerHandle {
    pub fn cancel(&self) {
        TIMERS.with(|t| {
            t.borrow_mut().remove(self.key);
        });
    }

    pub fn is_scheduled(&self) -> bool {
        TIMERS.with(|t| t.borrow().contains_key(self.key))
    }
}

/// One-shot timer: `f` runs at the first pump at or past `after` from now.
pub fn schedule(after: Duration, f: impl Fn() + 'static) -> TimerHandle {
    insert(after, None, f)
}

/// Repeating timer. A zero period is clamped to one millisecond so the pump
/// stays finite.
pub fn schedule_repeating(every: Duration, f: impl Fn() + 'static) -> TimerHandle {
    let every = every.max(Duration::from_millis(1));
    insert(every, Some(every), f)
}

fn insert(after: Duration, period: Option<Duration>, f: impl Fn() + 'static) -> TimerHandle {
    let entry = Entry {
        deadline: clock::now() + after,
        period,
        callback: Rc::new(f),
    };
    let key = TIMERS.with(|t| t.borrow_mut().insert(entry));
    TimerHandle { key }
}

/// Earliest pending deadline, for host wakeup scheduling.
pub fn next_deadline() -> Option<Instant> {
    TIMERS.with(|t| t.borrow().values().map(|e| e.deadline).min())
}

/// Fires every due timer and returns how many ran. The due set is taken
/// before any callback runs, so callbacks may schedule or cancel timers
/// freely; their changes apply from the next pump. A periodic timer that
/// fell behind fires once and re-arms from now (no catch-up bursts).
pub fn fire_due() -> usize {
    let now = clock::now();
    let due: Vec<Rc<dyn Fn()>> = TIMERS.with(|t| {
        let mut timers = t.borrow_mut();
        let keys: Vec<TimerKey> = timers
            .iter()
            .filter(|(_, e)| e.deadline <= now)
            .map(|(k, _)| k)
            .collect();
        keys.into_iter()
            .filter_map(|k| {
                let entry = timers.get_mut(k)?;
                let cb = entry.callback.clone();
                match entry.period {
                    Some(period) => entry.deadline = now + period,
                    None => {
                        timers.remove(k);
                    }
                }
                Some(cb)
            })
            .collect()
    });
    let count = due.len();
    for cb in due {
        cb();
    }
    count
}
