//! # Daybloom Core Library
//!
//! In-memory state for a personal productivity app: tasks, habits, calendar
//! events and a Pomodoro focus timer. The CLI and any GUI are thin layers over
//! the same stores.
//!
//! ## Architecture
//!
//! - **Stores**: each of tasks, habits and events is owned by exactly one
//!   store; cross-store links are ids resolved through [`Workspace`]
//! - **Streak engine**: consecutive-day counting over habit logs
//! - **Calendar queries**: day and range overlap tests in the clock's zone
//! - **Pomodoro engine**: a session state machine driven by external ticks
//! - **Configuration**: TOML file with dotted-key access
//!
//! ## Key Components
//!
//! - [`Clock`]: supplies "now" and the local time zone to every store
//! - [`PomodoroEngine`]: Pomodoro session state machine
//! - [`HabitStore`]: habits, logs and cached streaks
//! - [`CalendarStore`]: events and day/range queries
//! - [`Config`]: application configuration

pub mod calendar;
pub mod config;
pub mod date;
pub mod error;
pub mod events;
pub mod habit;
pub mod seed;
pub mod task;
pub mod timer;
pub mod workspace;

pub use calendar::{CalendarEvent, CalendarStore, EventPatch, NewEvent};
pub use config::Config;
pub use date::{Clock, DayKey};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use habit::{compute_streak, Habit, HabitFrequency, HabitLog, HabitPatch, HabitStore, NewHabit};
pub use task::{NewTask, Task, TaskPatch, TaskStore};
pub use timer::{PomodoroEngine, PomodoroSession, PomodoroSettings, SessionType, TimerState};
pub use workspace::{Dashboard, Workspace};

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
