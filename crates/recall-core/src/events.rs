use std::any::{Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::Dispose;

type Listener = Rc<dyn Fn(&dyn Any)>;

thread_local! {
    static BUS: RefCell<HashMap<TypeId, Vec<(usize, Listener)>>> = RefCell::new(HashMap::new());
    static NEXT_ID: Cell<usize> = const { Cell::new(0) };
}

/// Subscribe to events of type `E`. The returned `Dispose` detaches the
/// listener.
pub fn listen<E: 'static>(f: impl Fn(&E) + 'static) -> Dispose {
    let id = NEXT_ID.with(|n| {
        let id = n.get();
        n.set(id + 1);
        id
    });
    let listener: Listener = Rc::new(move |any| {
        if let Some(event) = any.downcast_ref::<E>() {
            f(event);
        }
    });
    BUS.with(|b| {
        b.borrow_mut()
            .entry(TypeId::of::<E>())
            .or_default()
            .push((id, listener));
    });
    Dispose::new(move || {
        BUS.with(|b| {
            if let Some(list) = b.borrow_mut().get_mut(&TypeId::of::<E>()) {
                list.retain(|(lid, _)| *lid != id);
            }
        });
    })
}

/// Deliver `event` to every listener registered for `E`. The listener list
/// is snapshotted first, so listeners may attach or detach reentrantly.
pub fn emit<E: 'static>(event: &E) {
    let listeners: Vec<Listener> = BUS.with(|b| {
        b.borrow()
            .get(&TypeId::of::<E>())
            .map(|list| list.iter().map(|(_, f)| f.clone()).collect())
            .unwrap_or_default()
    });
    for f in listeners {
        f(event);
    }
}
