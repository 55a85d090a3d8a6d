//! Streak computation over a habit's completion log.
//!
//! Completed entries are walked newest first. Today's completion anchors the
//! count at 1; after that, each pair of neighbouring entries whose calendar
//! gap fits the cadence adds one, and the first gap that does not fit ends
//! the walk.

use super::{HabitFrequency, HabitLog};
use crate::date::{days_between, DayKey};

/// Inclusive gap, in days, between two weekly completions that still counts
/// as consecutive.
pub const WEEKLY_GAP_DAYS: std::ops::RangeInclusive<i64> = 6..=14;

/// Whether `gap` days between neighbouring completions keeps the streak.
/// `None` for cadences without a gap rule.
pub fn gap_continues(frequency: HabitFrequency, gap: i64) -> Option<bool> {
    match frequency {
        HabitFrequency::Daily => Some(gap == 1),
        HabitFrequency::Weekly => Some(WEEKLY_GAP_DAYS.contains(&gap)),
        HabitFrequency::Custom => None,
    }
}

/// Current streak as seen on `today`.
///
/// Only today's entry is compared with `today`. A run that ended long ago
/// still reports its length minus one: three daily completions ninety days
/// back give 2, not 0.
///
/// `Custom` habits have no gap rule; their streak is the number of completed
/// entries.
pub fn compute_streak(frequency: HabitFrequency, logs: &[HabitLog], today: DayKey) -> u32 {
    let mut days: Vec<DayKey> = logs.iter().filter(|l| l.completed).map(|l| l.date).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(&newest) = days.first() else {
        return 0;
    };
    if frequency == HabitFrequency::Custom {
        return days.len() as u32;
    }

    let mut streak = u32::from(newest == today);
    for pair in days.windows(2) {
        let gap = days_between(pair[1], pair[0]);
        if gap_continues(frequency, gap) == Some(true) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
