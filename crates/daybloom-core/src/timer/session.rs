use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::settings::SessionType;
use crate::date::{day_key, DayKey};

/// A Pomodoro session, current or finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Planned length in minutes
    pub duration: u32,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    /// Weak reference into the task store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    pub completed: bool,
    pub interruption_count: u32,
}

impl PomodoroSession {
    fn is_completed_work(&self) -> bool {
        self.completed && self.session_type == SessionType::Work
    }
}

/// Aggregate numbers for the focus statistics view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusStats {
    /// Every recorded session, skipped ones included
    pub total_sessions: usize,
    pub completed_work_sessions: usize,
    /// Minutes of completed work sessions
    pub focus_minutes: u32,
    /// Interruptions logged during work sessions
    pub interruptions: u32,
    pub focus_minutes_today: u32,
}

/// Sessions that started on `day` in `zone`.
pub fn sessions_on<'a, Tz: TimeZone>(
    history: &'a [PomodoroSession],
    day: DayKey,
    zone: &Tz,
) -> Vec<&'a PomodoroSession> {
    history
        .iter()
        .filter(|s| day_key(&s.start_time, zone) == day)
        .collect()
}

pub fn completed_work_count(history: &[PomodoroSession]) -> usize {
    history.iter().filter(|s| s.is_completed_work()).count()
}

/// Minutes of completed work sessions.
pub fn focus_minutes<'a>(history: impl IntoIterator<Item = &'a PomodoroSession>) -> u32 {
    history
        .into_iter()
        .filter(|s| s.is_completed_work())
        .map(|s| s.duration)
        .sum()
}

pub fn focus_stats<Tz: TimeZone>(history: &[PomodoroSession], today: DayKey, zone: &Tz) -> FocusStats {
    FocusStats {
        total_sessions: history.len(),
        completed_work_sessions: completed_work_count(history),
        focus_minutes: focus_minutes(history),
        interruptions: history
            .iter()
            .filter(|s| s.session_type == SessionType::Work)
            .map(|s| s.interruption_count)
            .sum(),
        focus_minutes_today: focus_minutes(sessions_on(history, today, zone)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(session_type: SessionType, completed: bool, start: DateTime<Utc>) -> PomodoroSession {
        PomodoroSession {
            id: format!("{session_type:?}-{start}"),
            start_time: start,
            end_time: Some(start + Duration::minutes(25)),
            duration: 25,
            session_type,
            task_id: None,
            completed,
            interruption_count: 1,
        }
    }

    #[test]
    fn stats_count_only_completed_work() {
        let today = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let yesterday = today - Duration::days(1);
        let history = vec![
            session(SessionType::Work, true, yesterday),
            session(SessionType::Work, true, today),
            session(SessionType::Work, false, today),
            session(SessionType::ShortBreak, true, today),
        ];
        let stats = focus_stats(&history, day_key(&today, &Utc), &Utc);
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.completed_work_sessions, 2);
        assert_eq!(stats.focus_minutes, 50);
        assert_eq!(stats.interruptions, 3);
        assert_eq!(stats.focus_minutes_today, 25);
    }

    #[test]
    fn session_type_field_is_named_type() {
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
        let json = serde_json::to_value(session(SessionType::LongBreak, true, start)).unwrap();
        assert_eq!(json["type"], "longBreak");
        assert_eq!(json["interruptionCount"], 1);
    }
}
