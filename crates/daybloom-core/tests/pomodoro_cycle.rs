//! Integration tests for a full Pomodoro cycle driven by ticks.

use chrono::{Duration, TimeZone, Utc};

use daybloom_core::timer::SettingsPatch;
use daybloom_core::{Clock, Event, PomodoroEngine, PomodoroSettings, SessionType, TimerState};

fn engine(settings: PomodoroSettings) -> PomodoroEngine<Utc> {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap();
    PomodoroEngine::new(settings, Clock::fixed(Utc, now))
}

/// Tick a running session down to zero, advancing the clock alongside.
fn run_out(e: &mut PomodoroEngine<Utc>) -> Vec<Event> {
    let mut events = Vec::new();
    while e.timer_state() == TimerState::Running && events.is_empty() {
        e.clock_mut().advance(Duration::seconds(1)).unwrap();
        events = e.tick();
    }
    events
}

#[test]
fn test_manual_cycle_reaches_long_break() {
    let short = PomodoroSettings {
        work_duration: 1,
        short_break_duration: 1,
        long_break_duration: 2,
        ..PomodoroSettings::default()
    };
    let mut e = engine(short);
    let mut kinds = Vec::new();

    for _ in 0..8 {
        e.start_session(None);
        kinds.push(e.current_session().unwrap().session_type);
        let events = run_out(&mut e);
        assert!(matches!(events[0], Event::SessionCompleted { .. }));
    }

    use SessionType::*;
    assert_eq!(
        kinds,
        [Work, ShortBreak, Work, ShortBreak, Work, ShortBreak, Work, LongBreak]
    );
    assert_eq!(e.sessions_completed(), 4);
    assert_eq!(e.completed_sessions_count(), 4);
    assert_eq!(e.total_focus_time(), 4);
    assert_eq!(e.history().len(), 8);
}

#[test]
fn test_auto_start_runs_unattended() {
    let settings = PomodoroSettings {
        work_duration: 1,
        short_break_duration: 1,
        auto_start_breaks: true,
        auto_start_pomodoros: true,
        ..PomodoroSettings::default()
    };
    let mut e = engine(settings);
    e.start_session(None);

    for _ in 0..5 {
        let events = run_out(&mut e);
        assert_eq!(events.len(), 2);
        assert_eq!(e.timer_state(), TimerState::Running);
    }
    assert_eq!(e.history().len(), 5);
    assert_eq!(e.sessions_completed(), 3);
}

#[test]
fn test_history_end_times_follow_clock() {
    let mut e = engine(PomodoroSettings::default());
    e.start_session(Some("task-1".into()));
    let started = e.current_session().unwrap().start_time;
    e.clock_mut().advance(Duration::minutes(10)).unwrap();
    e.complete_session();

    let session = &e.history()[0];
    assert_eq!(session.end_time, Some(started + Duration::minutes(10)));
    assert_eq!(session.task_id.as_deref(), Some("task-1"));
}

#[test]
fn test_events_serialize_with_type_tag() {
    let mut e = engine(PomodoroSettings::default());
    let started = e.start_session(None).unwrap();
    let json = serde_json::to_value(&started).unwrap();
    assert_eq!(json["type"], "SessionStarted");
    assert_eq!(json["session_type"], "work");
    assert_eq!(json["duration_secs"], 1500);

    let back: Event = serde_json::from_value(json).unwrap();
    assert_eq!(back, started);
}

#[test]
fn test_settings_change_mid_cycle_applies_to_next_session() {
    let mut e = engine(PomodoroSettings::default());
    e.start_session(None);
    e.update_settings(SettingsPatch {
        short_break_duration: Some(10),
        ..SettingsPatch::default()
    })
    .unwrap();
    assert_eq!(e.time_remaining(), 1500);
    e.complete_session();
    e.start_session(None);
    assert_eq!(e.time_remaining(), 600);
}
