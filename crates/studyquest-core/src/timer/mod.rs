mod clock;
mod phase;
mod pomodoro;

pub use clock::{ClockDriver, TickToken, TICK_PERIOD};
pub use phase::{minutes_to_secs, Phase, PhasePlan};
pub use pomodoro::{PomodoroSession, PomodoroTimer, TimerState};
