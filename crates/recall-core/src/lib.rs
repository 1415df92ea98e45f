//! # State, Signals, and Effects
//!
//! Recall uses a small reactive core instead of a retained widget tree with
//! mutable fields. There are four main pieces:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `remember*` — lifecycle‑aware storage bound to composition.
//! - `effect` / `scoped_effect` / `disposable_effect` — side‑effects with
//!   cleanup.
//! - `Host` — the frame driver that pumps timers and deferred effects.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use recall_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! ## Remembered state
//!
//! Hook state is held in `remember_*` slots rather than globals:
//!
//! - `remember` and `remember_state` are order‑based: the Nth call in a
//!   composition always refers to the Nth stored value.
//! - `remember_with_key` and `remember_state_with_key` are key‑based and more
//!   stable across conditional branches.
//!
//! ## Effects and cleanup
//!
//! `disposable_effect(key, f)` is the workhorse for hooks: `f` runs when the
//! key first appears and again on every key change, with the previous
//! cleanup run first; the last cleanup runs on unmount. One‑off effects use
//! `effect` / `scoped_effect` directly.
//!
//! ## Frames and time
//!
//! A `Host` composes one frame at a time. After each frame it drains
//! deferred effects and fires due timers against the installed `Clock`, so a
//! test can drive debounce windows and intervals deterministically:
//!
//! ```rust
//! use recall_core::*;
//! use std::{cell::RefCell, rc::Rc};
//! use web_time::Duration;
//!
//! let clock = TestClock::install();
//! let mut host = Host::new();
//!
//! let fired = Rc::new(RefCell::new(false));
//! {
//!     let fired = fired.clone();
//!     host.frame(move || {
//!         schedule(Duration::from_millis(10), move || *fired.borrow_mut() = true);
//!     });
//! }
//! clock.advance(Duration::from_millis(10));
//! host.frame(|| ());
//! assert!(*fired.borrow());
//! ```

pub mod clock;
pub mod effects;
pub mod effects_ext;
pub mod events;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod signal;
pub mod timer;

pub use clock::*;
pub use effects::*;
pub use effects_ext::*;
pub use prelude::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
pub use timer::*;
