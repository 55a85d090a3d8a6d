use chrono::{Local, TimeZone};
use tracing::debug;

use super::heatmap::{completion_rate, heatmap, HeatCell};
use super::streak::compute_streak;
use super::{Habit, HabitFrequency, HabitLog, HabitPatch, NewHabit};
use crate::date::{Clock, DayKey};
use crate::error::ValidationError;
use crate::new_id;

/// In-memory owner of all habits and their logs.
#[derive(Debug, Clone)]
pub struct HabitStore<Tz: TimeZone = Local> {
    habits: Vec<Habit>,
    clock: Clock<Tz>,
}

impl<Tz: TimeZone> HabitStore<Tz> {
    pub fn new(clock: Clock<Tz>) -> Self {
        Self {
            habits: Vec::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &Clock<Tz> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock<Tz> {
        &mut self.clock
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a habit with empty logs and zero streaks.
    ///
    /// # Errors
    /// Rejects weekdays outside 0..=6, a zero daily target or a reminder
    /// that is not `HH:MM`.
    pub fn add_habit(&mut self, new: NewHabit) -> Result<String, ValidationError> {
        new.validate()?;
        let now = self.clock.now();
        let habit = Habit {
            id: new_id(),
            title: new.title,
            description: new.description,
            frequency: new.frequency,
            active_days: new.active_days,
            target_per_day: new.target_per_day,
            current_streak: 0,
            longest_streak: 0,
            start_date: new.start_date.unwrap_or_else(|| self.clock.today()),
            color: new.color,
            icon: new.icon,
            reminder_time: new.reminder_time,
            logs: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let id = habit.id.clone();
        debug!(habit_id = %id, title = %habit.title, "habit added");
        self.habits.push(habit);
        Ok(id)
    }

    /// Merge `patch` into the habit. Unknown ids are ignored.
    ///
    /// A frequency change recomputes the current streak under the new
    /// cadence.
    pub fn update_habit(&mut self, habit_id: &str, patch: HabitPatch) -> Result<(), ValidationError> {
        patch.validate()?;
        let today = self.clock.today();
        self.with_habit(habit_id, |habit| {
            if let Some(title) = patch.title {
                habit.title = title;
            }
            if let Some(description) = patch.description {
                habit.description = Some(description);
            }
            if let Some(days) = patch.active_days {
                habit.active_days = days;
            }
            if let Some(target) = patch.target_per_day {
                habit.target_per_day = Some(target);
            }
            if let Some(start) = patch.start_date {
                habit.start_date = start;
            }
            if let Some(color) = patch.color {
                habit.color = color;
            }
            if let Some(icon) = patch.icon {
                habit.icon = Some(icon);
            }
            if let Some(reminder) = patch.reminder_time {
                habit.reminder_time = Some(reminder);
            }
            if let Some(frequency) = patch.frequency {
                if frequency != habit.frequency {
                    habit.frequency = frequency;
                    refresh_streaks(habit, today);
                }
            }
        });
        Ok(())
    }

    pub fn delete_habit(&mut self, habit_id: &str) {
        let before = self.habits.len();
        self.habits.retain(|h| h.id != habit_id);
        if self.habits.len() == before {
            debug!(habit_id, "delete of unknown habit ignored");
        }
    }

    /// Upsert the log entry for `date`, then refresh the streak caches.
    ///
    /// An existing entry keeps its note unless a new one is given.
    pub fn log_habit_completion(
        &mut self,
        habit_id: &str,
        date: DayKey,
        completed: bool,
        note: Option<String>,
    ) {
        let today = self.clock.today();
        self.with_habit(habit_id, |habit| {
            match habit.logs.iter_mut().find(|l| l.date == date) {
                Some(log) => {
                    log.completed = completed;
                    if note.is_some() {
                        log.note = note;
                    }
                }
                None => habit.logs.push(HabitLog {
                    date,
                    completed,
                    note,
                }),
            }
            refresh_streaks(habit, today);
            debug!(
                habit_id = %habit.id,
                %date,
                completed,
                current = habit.current_streak,
                longest = habit.longest_streak,
                "habit logged"
            );
        });
    }

    /// Drop the log entry for `date`, if any. `longest_streak` is kept.
    pub fn remove_habit_log(&mut self, habit_id: &str, date: DayKey) {
        let today = self.clock.today();
        self.with_habit(habit_id, |habit| {
            habit.logs.retain(|l| l.date != date);
            refresh_streaks(habit, today);
        });
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get_habit(&self, habit_id: &str) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    /// Streak as of today. 0 for an unknown id.
    pub fn calculate_streak(&self, habit_id: &str) -> u32 {
        self.get_habit(habit_id)
            .map(|h| compute_streak(h.frequency, &h.logs, self.clock.today()))
            .unwrap_or(0)
    }

    pub fn habits_by_frequency(&self, frequency: HabitFrequency) -> Vec<&Habit> {
        self.habits.iter().filter(|h| h.frequency == frequency).collect()
    }

    /// Every habit is active; there is no archive state.
    pub fn active_habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn habits_due_on(&self, day: DayKey) -> Vec<&Habit> {
        self.habits.iter().filter(|h| h.is_due_on(day)).collect()
    }

    /// Log entries with `start <= date <= end`, in stored order.
    pub fn habit_logs(&self, habit_id: &str, start: DayKey, end: DayKey) -> Vec<&HabitLog> {
        self.get_habit(habit_id)
            .map(|h| {
                h.logs
                    .iter()
                    .filter(|l| l.date >= start && l.date <= end)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Habits with the highest current streak first.
    pub fn top_by_streak(&self, limit: usize) -> Vec<&Habit> {
        let mut ranked: Vec<&Habit> = self.habits.iter().collect();
        ranked.sort_by(|a, b| b.current_streak.cmp(&a.current_streak));
        ranked.truncate(limit);
        ranked
    }

    /// Completion heatmap for the last `days` days, oldest first.
    pub fn heatmap(&self, habit_id: &str, days: u32) -> Vec<HeatCell> {
        self.get_habit(habit_id)
            .map(|h| heatmap(h, self.clock.today(), days))
            .unwrap_or_default()
    }

    /// Share of the last `days` days with a completed entry.
    pub fn completion_rate(&self, habit_id: &str, days: u32) -> f64 {
        self.get_habit(habit_id)
            .map(|h| completion_rate(h, self.clock.today(), days))
            .unwrap_or(0.0)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn with_habit(&mut self, habit_id: &str, f: impl FnOnce(&mut Habit)) -> bool {
        let now = self.clock.now();
        match self.habits.iter_mut().find(|h| h.id == habit_id) {
            Some(habit) => {
                f(habit);
                habit.updated_at = now;
                true
            }
            None => {
                debug!(habit_id, "unknown habit ignored");
                false
            }
        }
    }
}

fn refresh_streaks(habit: &mut Habit, today: DayKey) {
    habit.current_streak = compute_streak(habit.frequency, &habit.logs, today);
    habit.longest_streak = habit.longest_streak.max(habit.current_streak);
}
