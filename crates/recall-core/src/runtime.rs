use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use web_time::Instant;

use crate::scope::Scope;
use crate::{Signal, events, signal, timer};

thread_local! {
    pub static COMPOSER: RefCell<Composer> = RefCell::new(Composer::default());
    static DEFERRED: RefCell<Vec<Box<dyn FnOnce()>>> = RefCell::new(Vec::new());
    static HOST_ACTIVE: Cell<bool> = const { Cell::new(false) };
    static CURRENT_VIEWPORT: RefCell<Option<Signal<Option<ViewportSize>>>> =
        const { RefCell::new(None) };
}

#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Frame bracket for bare (host-less) composition: resets the slot cursor
/// and owns a scope that tears down when the guard drops. Deferred effects
/// queued during the composition drain on drop, before teardown.
pub struct ComposeGuard {
    scope: Scope,
}

impl ComposeGuard {
    pub fn begin() -> Self {
        COMPOSER.with(|c| {
            c.borrow_mut().cursor = 0;
        });
        ComposeGuard {
            scope: Scope::new(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl Drop for ComposeGuard {
    fn drop(&mut self) {
        drain_deferred();
    }
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let cursor = c.cursor;
        c.cursor += 1;

        if cursor >= c.slots.len() {
            let rc: Rc<T> = Rc::new(init());
            c.slots.push(Box::new(rc.clone()));
            return rc;
        }

        if let Some(rc) = c.slots[cursor].downcast_ref::<Rc<T>>() {
            rc.clone()
        } else {
            // replace (else panics)
            log::warn!(
                "remember: slot {} type changed; replacing. \
                 If this is due to conditional composition, prefer remember_with_key.",
                cursor
            );
            let rc: Rc<T> = Rc::new(init());
            c.slots[cursor] = Box::new(rc.clone());
            rc
        }
    })
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    COMPOSER.with(|c| {
        let mut c = c.borrow_mut();
        let key = key.into();

        if let Some(existing) = c.keyed_slots.get(&key) {
            if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
                return rc.clone();
            } else {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
        }

        let rc: Rc<T> = Rc::new(init());
        c.keyed_slots.insert(key, Box::new(rc.clone()));
        rc
    })
}

pub fn remember_state<T: 'static>(init: impl FnOnce() -> T) -> Rc<RefCell<T>> {
    remember(|| RefCell::new(init()))
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}

pub(crate) fn defer(f: Box<dyn FnOnce()>) {
    DEFERRED.with(|d| d.borrow_mut().push(f));
}

fn drain_deferred() {
    loop {
        let batch: Vec<Box<dyn FnOnce()>> = DEFERRED.with(|d| std::mem::take(&mut *d.borrow_mut()));
        if batch.is_empty() {
            break;
        }
        for f in batch {
            f();
        }
    }
}

/// Viewport dimensions reported by the platform, in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

/// Emitted through the event bus whenever the host viewport changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowResized(pub ViewportSize);

/// Drives composition frames the way a platform runner would: one persistent
/// root scope for the lifetime of the host, a viewport signal, and a pump
/// for timers and deferred effects after each frame. Dropping the host tears
/// the root scope down, releasing every effect the frames registered.
pub struct Host {
    viewport: Signal<Option<ViewportSize>>,
    root: Scope,
}

impl Host {
    pub fn new() -> Self {
        Self {
            viewport: signal(None),
            root: Scope::new(),
        }
    }

    /// Report a viewport change (the platform resize event).
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        let size = ViewportSize { width, height };
        self.viewport.set(Some(size));
        events::emit(&WindowResized(size));
    }

    pub fn viewport(&self) -> Option<ViewportSize> {
        self.viewport.get()
    }

    /// Forward an application event into the bus between frames.
    pub fn dispatch<E: 'static>(&mut self, event: &E) {
        events::emit(event);
    }

    /// Earliest timer deadline; a platform loop sleeps until then.
    pub fn next_wake(&self) -> Option<Instant> {
        timer::next_deadline()
    }

    /// Compose one frame: run `root` inside the persistent root scope, then
    /// drain deferred effects and fire due timers. State changes made by
    /// timers become visible on the next frame.
    pub fn frame<R>(&mut self, root: impl FnOnce() -> R) -> R {
        COMPOSER.with(|c| {
            c.borrow_mut().cursor = 0;
        });
        CURRENT_VIEWPORT.with(|v| *v.borrow_mut() = Some(self.viewport.clone()));
        HOST_ACTIVE.with(|h| h.set(true));
        let out = self.root.run(root);
        HOST_ACTIVE.with(|h| h.set(false));
        CURRENT_VIEWPORT.with(|v| *v.borrow_mut() = None);
        drain_deferred();
        timer::fire_due();
        out
    }

    /// Whether a host frame is currently composing on this thread.
    pub fn is_active() -> bool {
        HOST_ACTIVE.with(|h| h.get())
    }

    /// Viewport signal of the host currently composing, if any.
    pub fn current_viewport() -> Option<Signal<Option<ViewportSize>>> {
        CURRENT_VIEWPORT.with(|v| v.borrow().clone())
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}
