mod engine;
mod session;
mod settings;

pub use engine::{PomodoroEngine, PomodoroState, TimerState};
pub use session::{focus_stats, FocusStats, PomodoroSession};
pub use settings::{Adjust, DurationField, PomodoroSettings, SessionType, SettingsPatch};
