mod engine;
mod format;
mod ticker;

pub use engine::{MeditationTimer, TimerSlot};
pub use format::format_time;
pub use ticker::{TickHandle, DEFAULT_TICK_PERIOD};
