use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{SessionType, TimerState};

/// Every Pomodoro state change produces an Event.
/// Front-ends render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: String,
        session_type: SessionType,
        duration_secs: u32,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    SessionPaused {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    SessionResumed {
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        session_id: String,
        session_type: SessionType,
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
    SessionSkipped {
        session_id: String,
        session_type: SessionType,
        /// Type the next start will produce
        next_type: SessionType,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    InterruptionLogged {
        session_id: String,
        interruption_count: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        session_type: Option<SessionType>,
        upcoming_type: SessionType,
        remaining_secs: u32,
        total_secs: u32,
        sessions_completed: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SessionStarted { at, .. }
            | Event::SessionPaused { at, .. }
            | Event::SessionResumed { at, .. }
            | Event::SessionCompleted { at, .. }
            | Event::SessionSkipped { at, .. }
            | Event::SessionReset { at }
            | Event::InterruptionLogged { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
