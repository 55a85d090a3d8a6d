//! Habits, their completion logs and cached streaks.
//!
//! `current_streak` and `longest_streak` are caches derived from `logs`.
//! The store recomputes them on every log mutation and never lowers
//! `longest_streak`.

mod heatmap;
mod store;
pub mod streak;

pub use heatmap::{CellStatus, HeatCell, MAX_HEATMAP_DAYS};
pub use store::HabitStore;
pub use streak::compute_streak;

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date::DayKey;
use crate::error::ValidationError;

/// How often a habit is expected to be completed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    #[default]
    Daily,
    Weekly,
    Custom,
}

/// One day's entry for a habit. At most one per habit per day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HabitLog {
    pub date: DayKey,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    /// Weekdays the habit is scheduled on, 0 = Sunday
    pub active_days: BTreeSet<u8>,
    /// Repetitions expected per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_per_day: Option<u32>,
    pub current_streak: u32,
    /// Historical maximum of `current_streak`
    pub longest_streak: u32,
    pub start_date: DayKey,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// `HH:MM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    pub logs: Vec<HabitLog>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    pub fn log_for(&self, date: DayKey) -> Option<&HabitLog> {
        self.logs.iter().find(|l| l.date == date)
    }

    pub fn is_completed_on(&self, date: DayKey) -> bool {
        self.log_for(date).is_some_and(|l| l.completed)
    }

    /// Scheduled on `day`: the weekday is active and the habit has started.
    pub fn is_due_on(&self, day: DayKey) -> bool {
        self.start_date <= day && self.active_days.contains(&day.weekday_index())
    }
}

pub const DEFAULT_HABIT_COLOR: &str = "#60a5fa";

/// Input for [`HabitStore::add_habit`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewHabit {
    pub title: String,
    pub description: Option<String>,
    pub frequency: HabitFrequency,
    pub active_days: BTreeSet<u8>,
    pub target_per_day: Option<u32>,
    /// Defaults to today
    pub start_date: Option<DayKey>,
    pub color: String,
    pub icon: Option<String>,
    pub reminder_time: Option<String>,
}

impl NewHabit {
    pub fn new(title: impl Into<String>, frequency: HabitFrequency) -> Self {
        Self {
            title: title.into(),
            frequency,
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            Some(&self.active_days),
            self.target_per_day,
            self.reminder_time.as_deref(),
        )
    }
}

impl Default for NewHabit {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            frequency: HabitFrequency::Daily,
            active_days: (0..=6).collect(),
            target_per_day: None,
            start_date: None,
            color: DEFAULT_HABIT_COLOR.to_string(),
            icon: None,
            reminder_time: None,
        }
    }
}

/// Partial update for a habit. Streak caches and logs are not patchable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HabitPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<HabitFrequency>,
    pub active_days: Option<BTreeSet<u8>>,
    pub target_per_day: Option<u32>,
    pub start_date: Option<DayKey>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub reminder_time: Option<String>,
}

impl HabitPatch {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(
            self.active_days.as_ref(),
            self.target_per_day,
            self.reminder_time.as_deref(),
        )
    }
}

fn validate_fields(
    active_days: Option<&BTreeSet<u8>>,
    target_per_day: Option<u32>,
    reminder_time: Option<&str>,
) -> Result<(), ValidationError> {
    if let Some(days) = active_days {
        for &day in days {
            ValidationError::check_range("activeDays", day.into(), 0, 6)?;
        }
    }
    if let Some(target) = target_per_day {
        ValidationError::check_range("targetPerDay", target.into(), 1, i64::from(u32::MAX))?;
    }
    if let Some(time) = reminder_time {
        if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
            return Err(ValidationError::InvalidValue {
                field: "reminderTime".into(),
                message: format!("'{time}' is not HH:MM"),
            });
        }
    }
    Ok(())
}
