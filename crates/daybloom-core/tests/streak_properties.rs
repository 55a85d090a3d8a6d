//! Property tests for the streak engine and day-key helpers.

use chrono::{FixedOffset, TimeZone, Utc};
use proptest::prelude::*;

use daybloom_core::date::{day_key, start_of_day};
use daybloom_core::{compute_streak, Clock, DayKey, HabitFrequency, HabitLog, HabitStore, NewHabit};

fn base_day() -> DayKey {
    DayKey::from_ymd(2024, 5, 2).unwrap()
}

fn store() -> HabitStore<Utc> {
    let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
    HabitStore::new(Clock::fixed(Utc, now))
}

fn log(date: DayKey, completed: bool) -> HabitLog {
    HabitLog {
        date,
        completed,
        note: None,
    }
}

proptest! {
    #[test]
    fn longest_streak_never_decreases(
        ops in prop::collection::vec((0i64..45, 0u8..3), 1..80),
        frequency in prop_oneof![
            Just(HabitFrequency::Daily),
            Just(HabitFrequency::Weekly),
            Just(HabitFrequency::Custom),
        ],
    ) {
        let mut habits = store();
        let id = habits.add_habit(NewHabit::new("Read", frequency)).unwrap();
        let today = base_day();
        let mut previous = 0;

        for (days_ago, action) in ops {
            let day = today.add_days(-days_ago);
            match action {
                0 => habits.log_habit_completion(&id, day, true, None),
                1 => habits.log_habit_completion(&id, day, false, None),
                _ => habits.remove_habit_log(&id, day),
            }
            let habit = habits.get_habit(&id).unwrap();
            prop_assert!(habit.longest_streak >= previous);
            prop_assert!(habit.longest_streak >= habit.current_streak);
            previous = habit.longest_streak;
        }
    }

    #[test]
    fn unbroken_daily_run_counts_every_day(len in 1i64..120) {
        let today = base_day();
        let logs: Vec<HabitLog> = (0..len).map(|i| log(today.add_days(-i), true)).collect();
        prop_assert_eq!(compute_streak(HabitFrequency::Daily, &logs, today), len as u32);
    }

    #[test]
    fn streak_never_exceeds_completed_days(
        days in prop::collection::btree_set(0i64..60, 0..40),
        frequency in prop_oneof![Just(HabitFrequency::Daily), Just(HabitFrequency::Weekly)],
    ) {
        let today = base_day();
        let logs: Vec<HabitLog> = days.iter().map(|d| log(today.add_days(-d), true)).collect();
        prop_assert!(compute_streak(frequency, &logs, today) as usize <= days.len());
    }

    #[test]
    fn custom_streak_counts_completions(
        days in prop::collection::btree_set(0i64..90, 0..50),
        missed in prop::collection::btree_set(90i64..120, 0..10),
    ) {
        let today = base_day();
        let mut logs: Vec<HabitLog> = days.iter().map(|d| log(today.add_days(-d), true)).collect();
        logs.extend(missed.iter().map(|d| log(today.add_days(-d), false)));
        prop_assert_eq!(compute_streak(HabitFrequency::Custom, &logs, today) as usize, days.len());
    }

    #[test]
    fn start_of_day_stays_on_its_day(offset_days in 0i64..20_000, offset_quarters in -48i32..=56) {
        let day = DayKey::from_ymd(1990, 1, 1).unwrap().add_days(offset_days);
        let zone = FixedOffset::east_opt(offset_quarters * 15 * 60).unwrap();
        prop_assert_eq!(day_key(&start_of_day(day, &zone), &zone), day);
        prop_assert_eq!(DayKey::parse(&day.to_string()).unwrap(), day);
    }
}

#[test]
fn three_day_run_with_gap_before() {
    let today = base_day();
    let logs = vec![
        log(today, true),
        log(today.add_days(-1), true),
        log(today.add_days(-2), true),
        log(today.add_days(-4), true),
    ];
    assert_eq!(compute_streak(HabitFrequency::Daily, &logs, today), 3);
}
