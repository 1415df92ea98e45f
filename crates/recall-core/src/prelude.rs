pub use crate::clock::{Clock, SystemClock, TestClock, now, set_clock};
pub use crate::effects::{Dispose, effect, on_unmount};
pub use crate::effects_ext::{deferred_effect, disposable_effect, side_effect};
pub use crate::events::{emit, listen};
pub use crate::runtime::{
    ComposeGuard, Host, ViewportSize, WindowResized, remember, remember_state,
    remember_state_with_key, remember_with_key,
};
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, SubId, signal};
pub use crate::timer::{TimerHandle, schedule, schedule_repeating};
