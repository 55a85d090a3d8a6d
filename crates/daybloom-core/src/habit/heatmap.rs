use serde::{Deserialize, Serialize};

use super::Habit;
use crate::date::DayKey;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// No log for the day
    NoData,
    /// Logged as not completed
    Missed,
    Completed,
}

/// One day of a habit's completion heatmap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatCell {
    pub date: DayKey,
    pub status: CellStatus,
}

/// Longest window a heatmap or completion rate covers.
pub const MAX_HEATMAP_DAYS: u32 = 366;

/// `days` cells ending at `today`, oldest first. Windows longer than
/// [`MAX_HEATMAP_DAYS`] are cut to that length.
pub(super) fn heatmap(habit: &Habit, today: DayKey, days: u32) -> Vec<HeatCell> {
    (0..i64::from(days.min(MAX_HEATMAP_DAYS)))
        .rev()
        .map(|back| {
            let date = today.add_days(-back);
            let status = match habit.log_for(date) {
                None => CellStatus::NoData,
                Some(log) if log.completed => CellStatus::Completed,
                Some(_) => CellStatus::Missed,
            };
            HeatCell { date, status }
        })
        .collect()
}

/// Completed logs in the `days`-day window ending at `today`, divided by
/// the window length. Uses the same cap as [`heatmap`].
pub(super) fn completion_rate(habit: &Habit, today: DayKey, days: u32) -> f64 {
    let days = days.min(MAX_HEATMAP_DAYS);
    if days == 0 {
        return 0.0;
    }
    let first = today.add_days(1 - i64::from(days));
    let completed = habit
        .logs
        .iter()
        .filter(|l| l.completed && l.date >= first && l.date <= today)
        .count();
    completed as f64 / f64::from(days)
}
