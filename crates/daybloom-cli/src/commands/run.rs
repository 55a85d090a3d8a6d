//! JSON-lines op scripts.
//!
//! Each non-empty line is one op such as `{"op":"start_session"}`. Every op
//! prints one JSON line: the op's result, or `{"error": ...}` when the store
//! rejected the input. Lines starting with `#` are comments.

use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use daybloom_core::calendar::EventPatch;
use daybloom_core::task::{SubTaskPatch, TaskFilter};
use daybloom_core::timer::{Adjust, DurationField, SettingsPatch};
use daybloom_core::{
    seed, Clock, CoreError, DayKey, HabitPatch, NewEvent, NewHabit, NewTask, Result, TaskPatch,
    ValidationError, Workspace,
};

#[derive(Args)]
pub struct RunArgs {
    /// Script file; stdin when omitted or "-"
    file: Option<PathBuf>,
    /// Start from the sample workspace
    #[arg(long)]
    seed: bool,
    /// Pin the clock to this RFC 3339 instant
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

/// One scripted operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    // Tasks
    AddTask { task: NewTask },
    UpdateTask { task_id: String, patch: TaskPatch },
    DeleteTask { task_id: String },
    ToggleTask { task_id: String },
    AddSubtask { task_id: String, title: String },
    UpdateSubtask { task_id: String, subtask_id: String, patch: SubTaskPatch },
    ToggleSubtask { task_id: String, subtask_id: String },
    DeleteSubtask { task_id: String, subtask_id: String },
    GetTask { task_id: String },
    ListTasks {
        #[serde(default)]
        filter: TaskFilter,
    },
    UpcomingTasks {
        #[serde(default = "default_three")]
        limit: usize,
    },
    Eisenhower,

    // Habits
    AddHabit { habit: NewHabit },
    UpdateHabit { habit_id: String, patch: HabitPatch },
    DeleteHabit { habit_id: String },
    LogHabit {
        habit_id: String,
        /// Defaults to today
        #[serde(default)]
        date: Option<DayKey>,
        #[serde(default = "default_true")]
        completed: bool,
        #[serde(default)]
        note: Option<String>,
    },
    RemoveHabitLog { habit_id: String, date: DayKey },
    GetHabit { habit_id: String },
    Streak { habit_id: String },
    HabitLogs { habit_id: String, start: DayKey, end: DayKey },
    HabitsDue {
        #[serde(default)]
        date: Option<DayKey>,
    },
    Heatmap {
        habit_id: String,
        #[serde(default)]
        days: Option<u32>,
    },

    // Calendar
    AddEvent { event: NewEvent },
    UpdateEvent { event_id: String, patch: EventPatch },
    DeleteEvent { event_id: String },
    GetEvent { event_id: String },
    EventsForDay {
        #[serde(default)]
        date: Option<DayKey>,
    },
    EventsForRange { start: DayKey, end: DayKey },
    EventsForTask { task_id: String },
    MarkedDays { start: DayKey, end: DayKey },
    RelatedTask { event_id: String },

    // Timer
    StartSession {
        #[serde(default)]
        task_id: Option<String>,
    },
    PauseSession,
    ResumeSession,
    CompleteSession,
    SkipSession,
    ResetSession,
    LogInterruption,
    SetTimeRemaining { seconds: u32 },
    Tick {
        #[serde(default = "default_one")]
        count: u32,
    },
    UpdateSettings { patch: SettingsPatch },
    AdjustDuration { field: DurationField, adjust: Adjust },
    TimerStatus,
    SessionsForDay {
        #[serde(default)]
        date: Option<DayKey>,
    },
    FocusStats,

    // Workspace
    AdvanceClock { minutes: i64 },
    SetNow { at: DateTime<Utc> },
    Dashboard,
}

/// Largest step `advance_clock` accepts, in either direction.
const MAX_ADVANCE_MINUTES: i64 = i64::MAX / 60_000;

fn default_three() -> usize {
    3
}

fn to_json<T: Serialize>(value: T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn id(id: String) -> Value {
    json!({ "id": id })
}

/// Apply one op and return its printable result.
pub fn apply(ws: &mut Workspace, op: Op) -> Result<Value, ValidationError> {
    let today = ws.today();
    let value = match op {
        Op::AddTask { task } => id(ws.tasks.add_task(task)?),
        Op::UpdateTask { task_id, patch } => {
            ws.tasks.update_task(&task_id, patch)?;
            to_json(ws.tasks.get_task(&task_id))
        }
        Op::DeleteTask { task_id } => {
            ws.tasks.delete_task(&task_id);
            Value::Null
        }
        Op::ToggleTask { task_id } => {
            ws.tasks.toggle_task_completion(&task_id);
            to_json(ws.tasks.get_task(&task_id))
        }
        Op::AddSubtask { task_id, title } => to_json(ws.tasks.add_subtask(&task_id, title).map(id)),
        Op::UpdateSubtask {
            task_id,
            subtask_id,
            patch,
        } => {
            ws.tasks.update_subtask(&task_id, &subtask_id, patch);
            to_json(ws.tasks.get_task(&task_id))
        }
        Op::ToggleSubtask {
            task_id,
            subtask_id,
        } => {
            ws.tasks.toggle_subtask_completion(&task_id, &subtask_id);
            to_json(ws.tasks.get_task(&task_id))
        }
        Op::DeleteSubtask {
            task_id,
            subtask_id,
        } => {
            ws.tasks.delete_subtask(&task_id, &subtask_id);
            to_json(ws.tasks.get_task(&task_id))
        }
        Op::GetTask { task_id } => to_json(ws.tasks.get_task(&task_id)),
        Op::ListTasks { filter } => to_json(ws.tasks.filter(&filter)),
        Op::UpcomingTasks { limit } => to_json(ws.tasks.upcoming(limit)),
        Op::Eisenhower => to_json(ws.tasks.eisenhower()),

        Op::AddHabit { habit } => id(ws.habits.add_habit(habit)?),
        Op::UpdateHabit { habit_id, patch } => {
            ws.habits.update_habit(&habit_id, patch)?;
            to_json(ws.habits.get_habit(&habit_id))
        }
        Op::DeleteHabit { habit_id } => {
            ws.habits.delete_habit(&habit_id);
            Value::Null
        }
        Op::LogHabit {
            habit_id,
            date,
            completed,
            note,
        } => {
            let date = date.unwrap_or(today);
            ws.habits.log_habit_completion(&habit_id, date, completed, note);
            streaks(ws, &habit_id)
        }
        Op::RemoveHabitLog { habit_id, date } => {
            ws.habits.remove_habit_log(&habit_id, date);
            streaks(ws, &habit_id)
        }
        Op::GetHabit { habit_id } => to_json(ws.habits.get_habit(&habit_id)),
        Op::Streak { habit_id } => json!({ "streak": ws.habits.calculate_streak(&habit_id) }),
        Op::HabitLogs {
            habit_id,
            start,
            end,
        } => to_json(ws.habits.habit_logs(&habit_id, start, end)),
        Op::HabitsDue { date } => to_json(ws.habits.habits_due_on(date.unwrap_or(today))),
        Op::Heatmap { habit_id, days } => {
            let days = days.unwrap_or(ws.config().habits.heatmap_days);
            json!({
                "cells": ws.habits.heatmap(&habit_id, days),
                "completionRate": ws.habits.completion_rate(&habit_id, days),
            })
        }

        Op::AddEvent { event } => id(ws.calendar.add_event(event)?),
        Op::UpdateEvent { event_id, patch } => {
            ws.calendar.update_event(&event_id, patch)?;
            to_json(ws.calendar.get_event(&event_id))
        }
        Op::DeleteEvent { event_id } => {
            ws.calendar.delete_event(&event_id);
            Value::Null
        }
        Op::GetEvent { event_id } => to_json(ws.calendar.get_event(&event_id)),
        Op::EventsForDay { date } => to_json(ws.calendar.events_for_day(date.unwrap_or(today))),
        Op::EventsForRange { start, end } => to_json(ws.calendar.events_for_range(start, end)),
        Op::EventsForTask { task_id } => to_json(ws.calendar.events_for_task(&task_id)),
        Op::MarkedDays { start, end } => to_json(ws.calendar.marked_days(start, end)),
        Op::RelatedTask { event_id } => to_json(ws.related_task(&event_id)),

        Op::StartSession { task_id } => to_json(ws.timer.start_session(task_id)),
        Op::PauseSession => to_json(ws.timer.pause_session()),
        Op::ResumeSession => to_json(ws.timer.resume_session()),
        Op::CompleteSession => to_json(ws.timer.complete_session()),
        Op::SkipSession => to_json(ws.timer.skip_session()),
        Op::ResetSession => to_json(ws.timer.reset_session()),
        Op::LogInterruption => to_json(ws.timer.log_interruption()),
        Op::SetTimeRemaining { seconds } => {
            ws.timer.update_time_remaining(seconds);
            to_json(ws.timer.snapshot())
        }
        Op::Tick { count } => {
            let mut events = Vec::new();
            for _ in 0..count {
                ws.advance(Duration::seconds(1))?;
                events.extend(ws.timer.tick());
            }
            to_json(events)
        }
        Op::UpdateSettings { patch } => {
            ws.timer.update_settings(patch)?;
            to_json(ws.timer.settings())
        }
        Op::AdjustDuration { field, adjust } => {
            let changed = ws.timer.adjust_duration(field, adjust);
            json!({ "changed": changed, "settings": ws.timer.settings() })
        }
        Op::TimerStatus => to_json(ws.timer.snapshot()),
        Op::SessionsForDay { date } => to_json(ws.timer.sessions_for_day(date.unwrap_or(today))),
        Op::FocusStats => to_json(ws.timer.focus_stats()),

        Op::AdvanceClock { minutes } => {
            let by = Duration::try_minutes(minutes).ok_or(ValidationError::OutOfRange {
                field: "minutes".to_string(),
                value: minutes,
                min: -MAX_ADVANCE_MINUTES,
                max: MAX_ADVANCE_MINUTES,
            })?;
            ws.advance(by)?;
            json!({ "now": ws.clock().now() })
        }
        Op::SetNow { at } => {
            ws.set_now(at);
            json!({ "now": ws.clock().now() })
        }
        Op::Dashboard => to_json(ws.dashboard()),
    };
    Ok(value)
}

fn streaks(ws: &Workspace, habit_id: &str) -> Value {
    match ws.habits.get_habit(habit_id) {
        Some(h) => json!({
            "currentStreak": h.current_streak,
            "longestStreak": h.longest_streak,
        }),
        None => Value::Null,
    }
}

/// Run every op in `input`, writing one result line per op to `out`.
///
/// # Errors
/// Returns an error naming the line number for a line that is not a valid op.
pub fn execute(
    ws: &mut Workspace,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let op: Op = serde_json::from_str(trimmed)
            .map_err(|e| CoreError::Custom(format!("line {}: invalid op: {e}", index + 1)))?;
        tracing::debug!(line = index + 1, ?op, "applying op");
        let result = match apply(ws, op) {
            Ok(value) => value,
            Err(e) => json!({ "error": e.to_string() }),
        };
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    }
    Ok(())
}

pub fn run(args: RunArgs) -> Result<()> {
    let clock = match args.now {
        Some(at) => Clock::fixed(chrono::Local, at),
        None => Clock::system(),
    };
    let mut ws = super::workspace(clock);
    if args.seed {
        seed::populate(&mut ws)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.file {
        Some(path) if path.as_os_str() != "-" => {
            let file = std::fs::File::open(&path)
                .map_err(|e| CoreError::Custom(format!("cannot open {}: {e}", path.display())))?;
            execute(&mut ws, BufReader::new(file), &mut out)
        }
        _ => execute(&mut ws, std::io::stdin().lock(), &mut out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use daybloom_core::Config;

    fn workspace() -> Workspace {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        Workspace::new(Config::default(), Clock::fixed(chrono::Local, now))
    }

    fn run_script(ws: &mut Workspace, script: &str) -> Vec<Value> {
        let mut out = Vec::new();
        execute(ws, script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn pomodoro_script() {
        let mut ws = workspace();
        let results = run_script(
            &mut ws,
            r#"{"op":"start_session"}
{"op":"complete_session"}
# comment lines are skipped

{"op":"start_session"}
{"op":"timer_status"}"#,
        );
        assert_eq!(results.len(), 4);
        assert_eq!(results[0]["type"], "SessionStarted");
        assert_eq!(results[0]["session_type"], "work");
        assert_eq!(results[1]["sessions_completed"], 1);
        assert_eq!(results[2]["session_type"], "shortBreak");
        assert_eq!(results[3]["remaining_secs"], 300);
    }

    #[test]
    fn noop_commands_print_null() {
        let mut ws = workspace();
        let results = run_script(&mut ws, r#"{"op":"pause_session"}"#);
        assert_eq!(results[0], Value::Null);
    }

    #[test]
    fn habit_log_reports_streaks() {
        let mut ws = workspace();
        let added = run_script(&mut ws, r#"{"op":"add_habit","habit":{"title":"Read"}}"#);
        let habit_id = added[0]["id"].as_str().unwrap().to_string();
        let yesterday = ws.today().add_days(-1);
        let script = format!(
            "{{\"op\":\"log_habit\",\"habit_id\":\"{habit_id}\",\"date\":\"{yesterday}\"}}\n\
             {{\"op\":\"log_habit\",\"habit_id\":\"{habit_id}\"}}"
        );
        let results = run_script(&mut ws, &script);
        assert_eq!(results[1]["currentStreak"], 2);
        assert_eq!(results[1]["longestStreak"], 2);
    }

    #[test]
    fn validation_errors_are_reported_inline() {
        let mut ws = workspace();
        let results = run_script(
            &mut ws,
            r#"{"op":"add_event","event":{"title":"Backwards","startTime":"2024-05-02T10:00:00Z","endTime":"2024-05-02T09:00:00Z"}}
{"op":"events_for_day","date":"2024-05-02"}"#,
        );
        assert!(results[0]["error"].as_str().unwrap().contains("time range"));
        assert_eq!(results[1], json!([]));
    }

    #[test]
    fn malformed_line_names_line_number() {
        let mut ws = workspace();
        let mut out = Vec::new();
        let err = execute(
            &mut ws,
            "{\"op\":\"timer_status\"}\n{\"op\":\"fly\"}".as_bytes(),
            &mut out,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::Custom(_)));
        assert!(err.to_string().starts_with("line 2:"));
    }

    #[test]
    fn oversized_clock_step_is_reported_inline() {
        let mut ws = workspace();
        let before = ws.clock().now();
        let results = run_script(
            &mut ws,
            r#"{"op":"advance_clock","minutes":9223372036854775807}
{"op":"advance_clock","minutes":1000000000000}
{"op":"advance_clock","minutes":30}"#,
        );
        assert!(results[0]["error"].as_str().unwrap().contains("minutes"));
        assert!(results[1]["error"].as_str().unwrap().contains("Cannot move the clock"));
        assert_eq!(ws.clock().now(), before + Duration::minutes(30));
    }

    #[test]
    fn tick_advances_the_clock() {
        let mut ws = workspace();
        let before = ws.clock().now();
        run_script(&mut ws, r#"{"op":"start_session"}
{"op":"tick","count":3}"#);
        assert_eq!(ws.clock().now(), before + Duration::seconds(3));
        assert_eq!(ws.timer.time_remaining(), 1497);
    }
}
