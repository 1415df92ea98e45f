use recall_core::{Signal, remember, signal};

/// State with a fallback: setting `None` yields the configured default.
#[derive(Clone)]
pub struct DefaultState<T: Clone + 'static> {
    value: Signal<T>,
    fallback: T,
}

pub fn use_default<T: Clone + 'static>(initial: T, fallback: T) -> DefaultState<T> {
    let slot = remember(|| signal(initial));
    DefaultState {
        value: (*slot).clone(),
        fallback,
    }
}

impl<T: Clone + 'static> DefaultState<T> {
    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn set(&self, value: Option<T>) {
        self.value
            .set(value.unwrap_or_else(|| self.fallback.clone()));
    }
}
