//! The four stores of one app session, sharing a clock.
//!
//! Cross-store links (event -> task, session -> task) are plain ids. They are
//! resolved here by lookup and may dangle: deleting a task never touches the
//! events or sessions that name it.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::Serialize;

use crate::calendar::{CalendarEvent, CalendarStore};
use crate::config::Config;
use crate::date::{Clock, DayKey};
use crate::error::ValidationError;
use crate::events::Event;
use crate::habit::{Habit, HabitStore};
use crate::task::{Task, TaskStore};
use crate::timer::{FocusStats, PomodoroEngine, PomodoroSession};

/// Home screen summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard<'a> {
    pub today: DayKey,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub upcoming_tasks: Vec<&'a Task>,
    pub top_habits: Vec<&'a Habit>,
    pub habits_due_today: usize,
    pub habits_done_today: usize,
    pub todays_events: Vec<&'a CalendarEvent>,
    pub focus: FocusStats,
    pub timer: Event,
}

#[derive(Debug, Clone)]
pub struct Workspace<Tz: TimeZone = Local> {
    pub tasks: TaskStore<Tz>,
    pub habits: HabitStore<Tz>,
    pub calendar: CalendarStore<Tz>,
    pub timer: PomodoroEngine<Tz>,
    config: Config,
}

impl Workspace<Local> {
    /// Workspace on the system clock in the local zone.
    pub fn system(config: Config) -> Self {
        Self::new(config, Clock::system())
    }
}

impl<Tz: TimeZone> Workspace<Tz> {
    pub fn new(config: Config, clock: Clock<Tz>) -> Self {
        Self {
            tasks: TaskStore::new(clock.clone()),
            habits: HabitStore::new(clock.clone()),
            calendar: CalendarStore::new(clock.clone()),
            timer: PomodoroEngine::new(config.timer.settings(), clock),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clock(&self) -> &Clock<Tz> {
        self.tasks.clock()
    }

    pub fn today(&self) -> DayKey {
        self.clock().today()
    }

    /// Pin every store's clock to `at`.
    pub fn set_now(&mut self, at: DateTime<Utc>) {
        self.tasks.clock_mut().set_now(at);
        self.habits.clock_mut().set_now(at);
        self.calendar.clock_mut().set_now(at);
        self.timer.clock_mut().set_now(at);
    }

    /// Move every store's clock forward by `by`.
    ///
    /// # Errors
    /// Returns [`ValidationError::ClockOverflow`] when the result is out of
    /// chrono's range; no clock moves.
    pub fn advance(&mut self, by: Duration) -> Result<(), ValidationError> {
        let at = self
            .clock()
            .now()
            .checked_add_signed(by)
            .ok_or(ValidationError::ClockOverflow(by))?;
        self.set_now(at);
        Ok(())
    }

    // ── Weak references ──────────────────────────────────────────────

    /// Task linked from an event, if both still exist.
    pub fn related_task(&self, event_id: &str) -> Option<&Task> {
        let task_id = self.calendar.get_event(event_id)?.related_task_id.as_deref()?;
        self.tasks.get_task(task_id)
    }

    /// Task a session was started for, if it still exists.
    pub fn session_task(&self, session: &PomodoroSession) -> Option<&Task> {
        self.tasks.get_task(session.task_id.as_deref()?)
    }

    pub fn current_session_task(&self) -> Option<&Task> {
        self.session_task(self.timer.current_session()?)
    }

    /// Sessions recorded against `task_id`.
    pub fn sessions_for_task(&self, task_id: &str) -> Vec<&PomodoroSession> {
        self.timer
            .history()
            .iter()
            .filter(|s| s.task_id.as_deref() == Some(task_id))
            .collect()
    }

    // ── Dashboard ────────────────────────────────────────────────────

    pub fn dashboard(&self) -> Dashboard<'_> {
        let today = self.today();
        let due = self.habits.habits_due_on(today);
        Dashboard {
            today,
            tasks_completed: self.tasks.completed_tasks().len(),
            tasks_total: self.tasks.tasks().len(),
            upcoming_tasks: self.tasks.upcoming(self.config.dashboard.upcoming_tasks),
            top_habits: self.habits.top_by_streak(self.config.habits.top_streaks),
            habits_due_today: due.len(),
            habits_done_today: due.iter().filter(|h| h.is_completed_on(today)).count(),
            todays_events: self.calendar.events_for_today(),
            focus: self.timer.focus_stats(),
            timer: self.timer.snapshot(),
        }
    }
}
