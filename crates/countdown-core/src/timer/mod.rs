mod clock;
mod command;
mod engine;
mod selection;
mod tick;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::TimerCommand;
pub use engine::{CountdownEngine, PrimaryAction, SubscriptionId, TimerState};
pub use selection::{DurationSelection, HOURS_RANGE, MINUTES_RANGE, SECONDS_RANGE};
pub use tick::{IntervalTicks, ManualTicks, TickSource, TICK_PERIOD};
