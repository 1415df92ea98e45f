use recall_core::{Signal, remember, signal};

/// Boolean flag with toggle/set/reset controls.
///
/// `reset` always returns to the value the call site was first composed
/// with, regardless of intervening toggles.
#[derive(Clone)]
pub struct BooleanState {
    value: Signal<bool>,
    initial: bool,
}

pub fn use_boolean(initial: bool) -> BooleanState {
    let slot = remember(|| (signal(initial), initial));
    BooleanState {
        value: slot.0.clone(),
        initial: slot.1,
    }
}

impl BooleanState {
    pub fn get(&self) -> bool {
        self.value.get()
    }

    pub fn set(&self, value: bool) {
        self.value.set(value);
    }

    pub fn toggle(&self) {
        self.value.update(|v| *v = !*v);
    }

    pub fn set_true(&self) {
        self.value.set(true);
    }

    pub fn set_false(&self) {
        self.value.set(false);
    }

    pub fn reset(&self) {
        self.value.set(self.initial);
    }
}
