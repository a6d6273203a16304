mod alarm;
mod driver;
mod engine;

pub use alarm::{Alarm, SilentAlarm, TerminalBell};
pub use driver::TickDriver;
pub use engine::{format_countdown, SessionTimer, TimerMode, TimerState};
