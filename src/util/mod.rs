pub mod debounce;
pub mod time;

pub use debounce::Scheduler;
pub use time::{Clock, ManualClock, SystemClock};
