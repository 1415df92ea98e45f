use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use recall_core::{Dispose, Signal, disposable_effect, remember, signal};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("codec: {0}")]
    Codec(String),
}

/// String key/value store with per-key change notification. The hook layer
/// serializes values before they reach an area and deserializes on the way
/// out, so implementations never see anything but strings.
pub trait StorageArea {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    /// `f` runs whenever `key` changes through this area, whoever wrote it.
    fn subscribe(&self, key: &str, f: Box<dyn Fn()>) -> Dispose;
}

/// Per-key subscriber list shared by area implementations.
#[derive(Clone, Default)]
pub struct Subscribers(Rc<RefCell<SubInner>>);

#[derive(Default)]
struct SubInner {
    next: usize,
    list: Vec<(usize, String, Rc<dyn Fn()>)>,
}

impl Subscribers {
    pub fn add(&self, key: &str, f: Box<dyn Fn()>) -> Dispose {
        let id = {
            let mut inner = self.0.borrow_mut();
            let id = inner.next;
            inner.next += 1;
            inner.list.push((id, key.to_string(), Rc::from(f)));
            id
        };
        let inner = self.0.clone();
        Dispose::new(move || {
            inner.borrow_mut().list.retain(|(sid, _, _)| *sid != id);
        })
    }

    /// Snapshot first: notified subscribers may read the area or resubscribe.
    pub fn notify(&self, key: &str) {
        let due: Vec<Rc<dyn Fn()>> = self
            .0
            .borrow()
            .list
            .iter()
            .filter(|(_, k, _)| k == key)
            .map(|(_, _, f)| f.clone())
            .collect();
        for f in due {
            f();
        }
    }
}

/// Volatile in-process area: the session-storage backend, the fallback when
/// no persistent area is installed, and the test double.
#[derive(Default)]
pub struct MemoryArea {
    entries: RefCell<HashMap<String, String>>,
    subs: Subscribers,
}

impl StorageArea for MemoryArea {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.subs.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        self.subs.notify(key);
        Ok(())
    }

    fn subscribe(&self, key: &str, f: Box<dyn Fn()>) -> Dispose {
        self.subs.add(key, f)
    }
}

thread_local! {
    static LOCAL: RefCell<Option<Rc<dyn StorageArea>>> = const { RefCell::new(None) };
    static SESSION: RefCell<Option<Rc<dyn StorageArea>>> = const { RefCell::new(None) };
    static WARNED_VOLATILE: Cell<bool> = const { Cell::new(false) };
}

/// Install the persistent ("local") area for this thread.
pub fn install_local_storage(area: Rc<dyn StorageArea>) {
    LOCAL.with(|a| *a.borrow_mut() = Some(area));
}

/// Install the process-scoped ("session") area for this thread.
pub fn install_session_storage(area: Rc<dyn StorageArea>) {
    SESSION.with(|a| *a.borrow_mut() = Some(area));
}

/// The persistent area, falling back to a volatile store (with a one-time
/// warning) when the platform installed nothing.
pub fn local_storage() -> Rc<dyn StorageArea> {
    LOCAL.with(|a| {
        a.borrow_mut()
            .get_or_insert_with(|| {
                if !WARNED_VOLATILE.with(|w| w.replace(true)) {
                    log::warn!(
                        "storage: no persistent area installed; local storage is volatile"
                    );
                }
                Rc::new(MemoryArea::default())
            })
            .clone()
    })
}

/// The session area; defaults to an in-memory store, which is already the
/// right lifetime for a session.
pub fn session_storage() -> Rc<dyn StorageArea> {
    SESSION.with(|a| {
        a.borrow_mut()
            .get_or_insert_with(|| Rc::new(MemoryArea::default()))
            .clone()
    })
}

/// Initial value for a stored state: immediate, or computed only when
/// actually needed.
pub enum Initial<T> {
    Value(T),
    Lazy(Rc<dyn Fn() -> T>),
}

impl<T: Clone> Initial<T> {
    pub fn lazy(f: impl Fn() -> T + 'static) -> Self {
        Initial::Lazy(Rc::new(f))
    }

    fn resolve(&self) -> T {
        match self {
            Initial::Value(v) => v.clone(),
            Initial::Lazy(f) => f(),
        }
    }
}

impl<T> From<T> for Initial<T> {
    fn from(value: T) -> Self {
        Initial::Value(value)
    }
}

impl<T: Clone> Clone for Initial<T> {
    fn clone(&self) -> Self {
        match self {
            Initial::Value(v) => Initial::Value(v.clone()),
            Initial::Lazy(f) => Initial::Lazy(f.clone()),
        }
    }
}

/// Serializer/deserializer pair for persisted values.
pub struct Codec<T> {
    encode: Rc<dyn Fn(&T) -> Result<String, StorageError>>,
    decode: Rc<dyn Fn(&str) -> Result<T, StorageError>>,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            encode: self.encode.clone(),
            decode: self.decode.clone(),
        }
    }
}

impl<T> Codec<T> {
    pub fn new(
        encode: impl Fn(&T) -> Result<String, StorageError> + 'static,
        decode: impl Fn(&str) -> Result<T, StorageError> + 'static,
    ) -> Self {
        Self {
            encode: Rc::new(encode),
            decode: Rc::new(decode),
        }
    }
}

impl<T: Serialize + DeserializeOwned> Codec<T> {
    /// JSON text round-trip, the default.
    pub fn json() -> Self {
        Self {
            encode: Rc::new(|v| Ok(serde_json::to_string(v)?)),
            decode: Rc::new(|s| Ok(serde_json::from_str(s)?)),
        }
    }
}

pub struct StorageOptions<T> {
    pub codec: Codec<T>,
    /// Read the persisted value during the first composition. When false the
    /// initial value shows first and the persisted one arrives through the
    /// change subscription.
    pub initialize_with_value: bool,
}

impl<T: Serialize + DeserializeOwned> Default for StorageOptions<T> {
    fn default() -> Self {
        Self {
            codec: Codec::json(),
            initialize_with_value: true,
        }
    }
}

struct Shared<T: Clone> {
    key: String,
    area: Rc<dyn StorageArea>,
    codec: Codec<T>,
    initial: Initial<T>,
}

/// State synchronized with a storage area under a fixed key.
pub struct StoredState<T: Clone + 'static> {
    value: Signal<T>,
    shared: Rc<Shared<T>>,
}

impl<T: Clone + 'static> Clone for StoredState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            shared: self.shared.clone(),
        }
    }
}

fn read_area<T: Clone>(shared: &Shared<T>) -> T {
    match shared.area.read(&shared.key) {
        Some(raw) => match (shared.codec.decode)(&raw) {
            Ok(v) => v,
            Err(err) => {
                log::warn!(
                    "storage: reading key '{}' failed: {err}; using the initial value",
                    shared.key
                );
                shared.initial.resolve()
            }
        },
        None => shared.initial.resolve(),
    }
}

impl<T: Clone + 'static> StoredState<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }

    /// Persist and adopt `value`. On encode or write failure the in-memory
    /// value stays unchanged and a warning is logged.
    pub fn set(&self, value: T) {
        let s = &self.shared;
        match (s.codec.encode)(&value) {
            Ok(raw) => match s.area.write(&s.key, &raw) {
                Ok(()) => self.value.set(value),
                Err(err) => log::warn!("storage: writing key '{}' failed: {err}", s.key),
            },
            Err(err) => log::warn!("storage: encoding key '{}' failed: {err}", s.key),
        }
    }

    /// Set from the previous value.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let next = self.value.with(|v| f(v));
        self.set(next);
    }

    /// Delete the persisted entry and reset to the initial value.
    pub fn remove(&self) {
        let s = &self.shared;
        if let Err(err) = s.area.remove(&s.key) {
            log::warn!("storage: removing key '{}' failed: {err}", s.key);
        }
        self.value.set(s.initial.resolve());
    }

    fn refresh(&self) {
        let fresh = read_area(&self.shared);
        self.value.set(fresh);
    }
}

/// Storage-backed state over an explicit area. Reads fall back to the
/// initial value; external writes to the same key re-read through the
/// area's change subscription. Last writer wins.
pub fn use_storage<T: Clone + 'static>(
    area: Rc<dyn StorageArea>,
    key: &str,
    initial: impl Into<Initial<T>>,
    options: StorageOptions<T>,
) -> StoredState<T> {
    let initial = initial.into();
    let make = || {
        let shared = Rc::new(Shared {
            key: key.to_string(),
            area: area.clone(),
            codec: options.codec.clone(),
            initial: initial.clone(),
        });
        let first = if options.initialize_with_value {
            read_area(&shared)
        } else {
            shared.initial.resolve()
        };
        StoredState {
            value: signal(first),
            shared,
        }
    };

    let slot = remember(|| RefCell::new(make()));
    if slot.borrow().shared.key != key {
        // key changed at this call site: rebind against the new entry
        *slot.borrow_mut() = make();
    }
    let state = slot.borrow().clone();

    disposable_effect(key.to_string(), {
        let state = state.clone();
        move || {
            let on_change = {
                let state = state.clone();
                move || state.refresh()
            };
            state.shared.area.subscribe(&state.shared.key, Box::new(on_change))
        }
    });

    state
}

/// [`use_storage`] against the persistent area with JSON defaults.
pub fn use_local_storage<T>(key: &str, initial: impl Into<Initial<T>>) -> StoredState<T>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
{
    use_storage(local_storage(), key, initial, StorageOptions::default())
}

pub fn use_local_storage_with<T: Clone + 'static>(
    key: &str,
    initial: impl Into<Initial<T>>,
    options: StorageOptions<T>,
) -> StoredState<T> {
    use_storage(local_storage(), key, initial, options)
}

/// [`use_storage`] against the session area with JSON defaults.
pub fn use_session_storage<T>(key: &str, initial: impl Into<Initial<T>>) -> StoredState<T>
where
    T: Clone + Serialize + DeserializeOwned + 'static,
{
    use_storage(session_storage(), key, initial, StorageOptions::default())
}

pub fn use_session_storage_with<T: Clone + 'static>(
    key: &str,
    initial: impl Into<Initial<T>>,
    options: StorageOptions<T>,
) -> StoredState<T> {
    use_storage(session_storage(), key, initial, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recall_core::{COMPOSER, Host};
    use serde::Deserialize;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        a: i32,
    }

    fn reload() {
        // simulate a fresh process: composition slots gone, area kept
        COMPOSER.with(|c| {
            let mut c = c.borrow_mut();
            c.slots.clear();
            c.keyed_slots.clear();
            c.cursor = 0;
        });
    }

    fn hook(host: &mut Host, area: &Rc<dyn StorageArea>) -> StoredState<Payload> {
        let area = area.clone();
        host.frame(move || {
            use_storage(area, "payload", Payload { a: 0 }, StorageOptions::default())
        })
    }

    #[test]
    fn round_trips_through_json() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        let mut host = Host::new();

        let state = hook(&mut host, &area);
        state.set(Payload { a: 1 });
        drop(host);
        reload();

        let mut host = Host::new();
        let state = hook(&mut host, &area);
        assert_eq!(state.get(), Payload { a: 1 });
    }

    #[test]
    fn corrupt_entry_falls_back_to_initial() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        area.write("payload", "{not json").unwrap();

        let mut host = Host::new();
        let state = hook(&mut host, &area);
        assert_eq!(state.get(), Payload { a: 0 });
    }

    #[test]
    fn absent_key_resolves_lazy_initial() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        let mut host = Host::new();

        let area2 = area.clone();
        let state: StoredState<Payload> = host.frame(move || {
            use_storage(
                area2,
                "payload",
                Initial::lazy(|| Payload { a: 41 }),
                StorageOptions::default(),
            )
        });
        assert_eq!(state.get(), Payload { a: 41 });
    }

    struct ReadOnlyArea(MemoryArea);

    impl StorageArea for ReadOnlyArea {
        fn read(&self, key: &str) -> Option<String> {
            self.0.read(key)
        }
        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
        fn subscribe(&self, key: &str, f: Box<dyn Fn()>) -> Dispose {
            self.0.subscribe(key, f)
        }
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let area: Rc<dyn StorageArea> = Rc::new(ReadOnlyArea(MemoryArea::default()));
        let mut host = Host::new();

        let state = hook(&mut host, &area);
        state.set(Payload { a: 7 });
        assert_eq!(state.get(), Payload { a: 0 });
    }

    #[test]
    fn external_write_resynchronizes() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        let mut host = Host::new();

        let state = hook(&mut host, &area);
        assert_eq!(state.get(), Payload { a: 0 });

        // another instance of the same key writes through the same area
        area.write("payload", "{\"a\":5}").unwrap();
        assert_eq!(state.get(), Payload { a: 5 });
    }

    #[test]
    fn two_instances_stay_consistent() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        let mut host = Host::new();

        let (first, second) = {
            let area = area.clone();
            host.frame(move || {
                let a = use_storage(
                    area.clone(),
                    "payload",
                    Payload { a: 0 },
                    StorageOptions::default(),
                );
                let b = use_storage(
                    area.clone(),
                    "payload",
                    Payload { a: 0 },
                    StorageOptions::default(),
                );
                (a, b)
            })
        };

        first.set(Payload { a: 3 });
        assert_eq!(second.get(), Payload { a: 3 });
    }

    #[test]
    fn remove_resets_to_initial() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        let mut host = Host::new();

        let state = hook(&mut host, &area);
        state.set(Payload { a: 9 });
        state.remove();
        assert_eq!(state.get(), Payload { a: 0 });
        assert_eq!(area.read("payload"), None);
    }

    #[test]
    fn updater_sees_previous_value() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        let mut host = Host::new();

        let state = hook(&mut host, &area);
        state.set(Payload { a: 2 });
        state.update(|p| Payload { a: p.a + 40 });
        assert_eq!(state.get(), Payload { a: 42 });
        assert_eq!(area.read("payload").as_deref(), Some("{\"a\":42}"));
    }

    #[test]
    fn skip_initial_read_when_asked() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        area.write("payload", "{\"a\":5}").unwrap();

        let mut host = Host::new();
        let area2 = area.clone();
        let state = host.frame(move || {
            use_storage(
                area2,
                "payload",
                Payload { a: 0 },
                StorageOptions {
                    initialize_with_value: false,
                    ..StorageOptions::default()
                },
            )
        });

        // initial shows first; the persisted value arrives on the next change
        assert_eq!(state.get(), Payload { a: 0 });
        area.write("payload", "{\"a\":6}").unwrap();
        assert_eq!(state.get(), Payload { a: 6 });
    }

    #[test]
    fn session_front_uses_the_thread_area() {
        let mut host = Host::new();
        let state = host.frame(|| use_session_storage("count", 1i32));
        state.set(5);
        drop(host);
        reload();

        let mut host = Host::new();
        let state = host.frame(|| use_session_storage("count", 1i32));
        assert_eq!(state.get(), 5);
    }

    #[test]
    fn local_front_falls_back_to_volatile_store() {
        let mut host = Host::new();
        let state = host.frame(|| use_local_storage("theme", "dark".to_string()));
        state.set("light".to_string());
        assert_eq!(local_storage().read("theme").as_deref(), Some("\"light\""));
    }

    #[test]
    fn key_change_rebinds_the_call_site() {
        let area: Rc<dyn StorageArea> = Rc::new(MemoryArea::default());
        area.write("first", "{\"a\":1}").unwrap();
        area.write("second", "{\"a\":2}").unwrap();

        let mut host = Host::new();
        for (key, expect) in [("first", 1), ("second", 2)] {
            let area = area.clone();
            let state = host.frame(move || {
                use_storage(area, key, Payload { a: 0 }, StorageOptions::default())
            });
            assert_eq!(state.get(), Payload { a: expect });
        }
    }
}
