//! Pomodoro session state machine.
//!
//! The engine owns no timer thread. A driver either pushes the remaining
//! seconds through `update_time_remaining()` or calls `tick()` once per
//! second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused -> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = PomodoroEngine::new(PomodoroSettings::default(), Clock::system());
//! engine.start_session(None);
//! // In a loop, once per second:
//! engine.tick();
//! ```

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::session::{self, FocusStats, PomodoroSession};
use super::settings::{Adjust, DurationField, PomodoroSettings, SessionType, SettingsPatch};
use crate::date::{Clock, DayKey};
use crate::error::ValidationError;
use crate::events::Event;
use crate::new_id;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// No current session
    #[default]
    Idle,
    Running,
    Paused,
}

/// Live timer state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroState {
    pub is_active: bool,
    pub current_session: Option<PomodoroSession>,
    /// Work sessions finished this cycle, completed or skipped
    pub sessions_completed: u32,
    /// Seconds left, at most the current session's duration
    pub time_remaining: u32,
}

/// Pomodoro engine and session history.
#[derive(Debug, Clone)]
pub struct PomodoroEngine<Tz: TimeZone = Local> {
    settings: PomodoroSettings,
    state: PomodoroState,
    history: Vec<PomodoroSession>,
    /// Type of the last session that ended; decides the next type.
    last_session_type: Option<SessionType>,
    clock: Clock<Tz>,
}

impl<Tz: TimeZone> PomodoroEngine<Tz> {
    /// Starts idle with a full work session preloaded.
    pub fn new(settings: PomodoroSettings, clock: Clock<Tz>) -> Self {
        let state = PomodoroState {
            time_remaining: settings.duration_secs(SessionType::Work),
            ..PomodoroState::default()
        };
        Self {
            settings,
            state,
            history: Vec::new(),
            last_session_type: None,
            clock,
        }
    }

    pub fn clock(&self) -> &Clock<Tz> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock<Tz> {
        &mut self.clock
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn state(&self) -> &PomodoroState {
        &self.state
    }

    pub fn timer_state(&self) -> TimerState {
        match (&self.state.current_session, self.state.is_active) {
            (None, _) => TimerState::Idle,
            (Some(_), true) => TimerState::Running,
            (Some(_), false) => TimerState::Paused,
        }
    }

    pub fn current_session(&self) -> Option<&PomodoroSession> {
        self.state.current_session.as_ref()
    }

    pub fn history(&self) -> &[PomodoroSession] {
        &self.history
    }

    pub fn sessions_completed(&self) -> u32 {
        self.state.sessions_completed
    }

    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining
    }

    /// Seconds in the current session, or in the preloaded one when idle.
    pub fn total_secs(&self) -> u32 {
        match &self.state.current_session {
            Some(s) => s.duration.saturating_mul(60),
            None => self.settings.duration_secs(self.upcoming_session_type()),
        }
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 || self.state.current_session.is_none() {
            return 0.0;
        }
        1.0 - (self.state.time_remaining as f64 / total as f64)
    }

    /// Type the next `start_session()` will produce.
    ///
    /// Work follows a break or a fresh cycle. After work, every
    /// `sessions_before_long_break`-th session earns a long break.
    pub fn upcoming_session_type(&self) -> SessionType {
        match self.last_session_type {
            Some(SessionType::Work) => {
                let every = self.settings.sessions_before_long_break.max(1);
                if self.state.sessions_completed % every == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            _ => SessionType::Work,
        }
    }

    /// History entries that started on `day` in the clock's zone.
    pub fn sessions_for_day(&self, day: DayKey) -> Vec<&PomodoroSession> {
        session::sessions_on(&self.history, day, self.clock.zone())
    }

    pub fn completed_sessions_count(&self) -> usize {
        session::completed_work_count(&self.history)
    }

    /// Minutes spent in completed work sessions.
    pub fn total_focus_time(&self) -> u32 {
        session::focus_minutes(&self.history)
    }

    pub fn focus_stats(&self) -> FocusStats {
        session::focus_stats(&self.history, self.clock.today(), self.clock.zone())
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.timer_state(),
            session_type: self.state.current_session.as_ref().map(|s| s.session_type),
            upcoming_type: self.upcoming_session_type(),
            remaining_secs: self.state.time_remaining,
            total_secs: self.total_secs(),
            sessions_completed: self.state.sessions_completed,
            at: self.clock.now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start the next session. No-op while a session is current.
    pub fn start_session(&mut self, task_id: Option<String>) -> Option<Event> {
        if self.state.current_session.is_some() {
            debug!("start ignored: a session is already current");
            return None;
        }
        let session_type = self.upcoming_session_type();
        let duration = self.settings.duration_for(session_type);
        let now = self.clock.now();
        let session = PomodoroSession {
            id: new_id(),
            start_time: now,
            end_time: None,
            duration,
            session_type,
            task_id: task_id.clone(),
            completed: false,
            interruption_count: 0,
        };
        let session_id = session.id.clone();
        self.state.current_session = Some(session);
        self.state.time_remaining = duration.saturating_mul(60);
        self.state.is_active = true;
        info!(?session_type, duration, "session started");
        Some(Event::SessionStarted {
            session_id,
            session_type,
            duration_secs: self.state.time_remaining,
            task_id,
            at: now,
        })
    }

    pub fn pause_session(&mut self) -> Option<Event> {
        if self.timer_state() != TimerState::Running {
            return None;
        }
        self.state.is_active = false;
        Some(Event::SessionPaused {
            remaining_secs: self.state.time_remaining,
            at: self.clock.now(),
        })
    }

    pub fn resume_session(&mut self) -> Option<Event> {
        if self.timer_state() != TimerState::Paused {
            return None;
        }
        self.state.is_active = true;
        Some(Event::SessionResumed {
            remaining_secs: self.state.time_remaining,
            at: self.clock.now(),
        })
    }

    /// Record the current session as completed and go idle.
    pub fn complete_session(&mut self) -> Option<Event> {
        let session = self.finish_current(true)?;
        self.state.time_remaining = 0;
        info!(
            session_type = ?session.session_type,
            sessions_completed = self.state.sessions_completed,
            "session completed"
        );
        Some(Event::SessionCompleted {
            session_id: session.id,
            session_type: session.session_type,
            sessions_completed: self.state.sessions_completed,
            at: self.clock.now(),
        })
    }

    /// Record the current session as skipped and preload the next one's
    /// duration.
    pub fn skip_session(&mut self) -> Option<Event> {
        let session = self.finish_current(false)?;
        let next_type = self.upcoming_session_type();
        self.state.time_remaining = self.settings.duration_secs(next_type);
        info!(session_type = ?session.session_type, ?next_type, "session skipped");
        Some(Event::SessionSkipped {
            session_id: session.id,
            session_type: session.session_type,
            next_type,
            at: self.clock.now(),
        })
    }

    /// Drop the current session and start the cycle over. History is kept.
    pub fn reset_session(&mut self) -> Option<Event> {
        self.state = PomodoroState {
            time_remaining: self.settings.duration_secs(SessionType::Work),
            ..PomodoroState::default()
        };
        self.last_session_type = None;
        info!("timer reset");
        Some(Event::SessionReset {
            at: self.clock.now(),
        })
    }

    pub fn log_interruption(&mut self) -> Option<Event> {
        let session = self.state.current_session.as_mut()?;
        session.interruption_count += 1;
        Some(Event::InterruptionLogged {
            session_id: session.id.clone(),
            interruption_count: session.interruption_count,
            at: self.clock.now(),
        })
    }

    /// Set the remaining seconds. Clamped to the current session's length.
    pub fn update_time_remaining(&mut self, seconds: u32) {
        self.state.time_remaining = match &self.state.current_session {
            Some(s) => seconds.min(s.duration.saturating_mul(60)),
            None => seconds,
        };
    }

    /// Advance one second of a running session.
    ///
    /// When the countdown hits zero the session completes, and the next one
    /// starts right away if the matching auto-start flag is set.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.timer_state() != TimerState::Running {
            return Vec::new();
        }
        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        if self.state.time_remaining > 0 {
            return Vec::new();
        }

        let mut events = Vec::new();
        events.extend(self.complete_session());
        let auto_start = match self.upcoming_session_type() {
            SessionType::Work => self.settings.auto_start_pomodoros,
            SessionType::ShortBreak | SessionType::LongBreak => self.settings.auto_start_breaks,
        };
        if auto_start {
            events.extend(self.start_session(None));
        }
        events
    }

    /// Merge `patch` into the settings. When idle, the preloaded time is
    /// recomputed from the work duration.
    ///
    /// # Errors
    /// Rejects a patch that would set any duration or interval to zero.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Result<(), ValidationError> {
        self.settings = self.settings.merged(&patch)?;
        if self.state.current_session.is_none() {
            self.state.time_remaining = self.settings.duration_secs(SessionType::Work);
        }
        debug!(settings = ?self.settings, "settings updated");
        Ok(())
    }

    /// Step one duration up or down. Returns `false` when a decrement would
    /// cross the field's floor and nothing changed.
    pub fn adjust_duration(&mut self, field: DurationField, adjust: Adjust) -> bool {
        let Some(minutes) = field.stepped(field.get(&self.settings), adjust) else {
            debug!(?field, "duration already at its floor");
            return false;
        };
        self.update_settings(field.patch(minutes)).is_ok()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn finish_current(&mut self, completed: bool) -> Option<PomodoroSession> {
        let Some(mut session) = self.state.current_session.take() else {
            debug!("no current session");
            return None;
        };
        session.completed = completed;
        session.end_time = Some(self.clock.now());
        if session.session_type == SessionType::Work {
            self.state.sessions_completed += 1;
        }
        self.last_session_type = Some(session.session_type);
        self.state.is_active = false;
        self.history.push(session.clone());
        Some(session)
    }
}
