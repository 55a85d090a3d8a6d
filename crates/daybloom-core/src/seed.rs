//! Starter content for a fresh workspace.
//!
//! Everything is placed relative to the clock's today and goes through the
//! regular store commands, so streak caches come out consistent with the logs.

use chrono::{Duration, TimeZone};

use crate::calendar::{NewEvent, Recurrence, RecurrenceFrequency};
use crate::date::{end_of_day, start_of_day};
use crate::error::ValidationError;
use crate::habit::{HabitFrequency, NewHabit};
use crate::task::{NewTask, TaskCategory, TaskPriority, TaskRecurrence, TaskRepeat};
use crate::workspace::Workspace;

const PRIMARY: &str = "#60a5fa";
const SECONDARY: &str = "#34d399";
const ACCENT: &str = "#f472b6";
const ERROR: &str = "#f87171";

fn tags(list: &[&str]) -> std::collections::BTreeSet<String> {
    list.iter().map(|t| t.to_string()).collect()
}

/// Add the sample tasks, habits and events to `ws`.
///
/// # Errors
/// Only if a sample record fails validation.
pub fn populate<Tz: TimeZone>(ws: &mut Workspace<Tz>) -> Result<(), ValidationError> {
    seed_tasks(ws)?;
    seed_habits(ws)?;
    seed_events(ws)?;
    Ok(())
}

fn seed_tasks<Tz: TimeZone>(ws: &mut Workspace<Tz>) -> Result<(), ValidationError> {
    let now = ws.clock().now();

    let proposal = NewTask {
        description: Some("Draft and submit the project proposal for the new client".into()),
        priority: TaskPriority::High,
        category: TaskCategory::Work,
        due_date: Some(now + Duration::days(2)),
        sub_tasks: vec![
            "Research client background".into(),
            "Create project timeline".into(),
            "Prepare budget estimation".into(),
        ],
        importance: 4,
        urgency: 4,
        tags: tags(&["work", "client", "proposal"]),
        ..NewTask::new("Complete project proposal")
    };
    let groceries = NewTask {
        description: Some("Buy groceries for the week".into()),
        priority: TaskPriority::Medium,
        category: TaskCategory::Personal,
        due_date: Some(now + Duration::days(1)),
        sub_tasks: vec![
            "Make shopping list".into(),
            "Check pantry for existing items".into(),
            "Visit grocery store".into(),
        ],
        tags: tags(&["personal", "shopping", "groceries"]),
        ..NewTask::new("Grocery shopping")
    };
    let jog = NewTask {
        description: Some("Go for a 30-minute morning jog".into()),
        priority: TaskPriority::Medium,
        category: TaskCategory::Health,
        recurring: Some(TaskRecurrence {
            frequency: TaskRepeat::Daily,
            days: None,
            interval: Some(1),
        }),
        importance: 4,
        urgency: 2,
        tags: tags(&["health", "exercise", "routine"]),
        ..NewTask::new("Morning jog")
    };

    // (task, number of leading subtasks already done)
    for (task, done) in [(proposal, 1), (groceries, 2), (jog, 0)] {
        let id = ws.tasks.add_task(task)?;
        let subtask_ids: Vec<String> = ws
            .tasks
            .get_task(&id)
            .map(|t| t.sub_tasks.iter().take(done).map(|s| s.id.clone()).collect())
            .unwrap_or_default();
        for sub in subtask_ids {
            ws.tasks.toggle_subtask_completion(&id, &sub);
        }
    }
    Ok(())
}

fn seed_habits<Tz: TimeZone>(ws: &mut Workspace<Tz>) -> Result<(), ValidationError> {
    let today = ws.today();

    let meditation = NewHabit {
        description: Some("10 minutes of mindfulness meditation".into()),
        start_date: Some(today.add_days(-30)),
        color: PRIMARY.into(),
        reminder_time: Some("08:00".into()),
        ..NewHabit::new("Morning Meditation", HabitFrequency::Daily)
    };
    let water = NewHabit {
        description: Some("8 glasses of water daily".into()),
        target_per_day: Some(8),
        start_date: Some(today.add_days(-40)),
        color: SECONDARY.into(),
        ..NewHabit::new("Drink Water", HabitFrequency::Daily)
    };
    let review = NewHabit {
        description: Some("Review goals and plan for next week".into()),
        active_days: [0].into_iter().collect(),
        start_date: Some(today.add_days(-60)),
        color: ACCENT.into(),
        ..NewHabit::new("Weekly Review", HabitFrequency::Weekly)
    };

    // Each pattern maps "days ago" to whether that day was completed.
    let meditation_id = ws.habits.add_habit(meditation)?;
    log_days(ws, &meditation_id, 0..30, 1, |i| {
        i < 5 || (11..15).contains(&i) || (21..25).contains(&i)
    });
    let water_id = ws.habits.add_habit(water)?;
    log_days(ws, &water_id, 0..40, 1, |i| {
        i < 12 || (16..25).contains(&i) || (31..35).contains(&i)
    });
    let review_id = ws.habits.add_habit(review)?;
    log_days(ws, &review_id, 0..9, 7, |i| i < 3 || i == 5 || i == 7);
    Ok(())
}

/// Log `range` entries `stride` days apart, oldest first.
fn log_days<Tz: TimeZone>(
    ws: &mut Workspace<Tz>,
    habit_id: &str,
    range: std::ops::Range<i64>,
    stride: i64,
    completed: impl Fn(i64) -> bool,
) {
    let today = ws.today();
    for i in range.rev() {
        let day = today.add_days(-i * stride);
        ws.habits.log_habit_completion(habit_id, day, completed(i), None);
    }
}

fn seed_events<Tz: TimeZone>(ws: &mut Workspace<Tz>) -> Result<(), ValidationError> {
    let today = ws.today();
    let zone = ws.clock().zone().clone();
    let at = |days: i64, minutes: i64| start_of_day(today.add_days(days), &zone) + Duration::minutes(minutes);

    let meeting = NewEvent {
        description: Some("Weekly team sync-up".into()),
        location: Some("Conference Room A".into()),
        color: PRIMARY.into(),
        reminder_minutes: Some(vec![15, 60]),
        recurrence: Some(Recurrence {
            frequency: RecurrenceFrequency::Weekly,
            interval: 1,
            end_date: None,
            count: None,
        }),
        ..NewEvent::new("Team Meeting", at(0, 10 * 60), at(0, 11 * 60))
    };
    let dentist = NewEvent {
        description: Some("Regular checkup".into()),
        location: Some("Dental Clinic".into()),
        color: ERROR.into(),
        reminder_minutes: Some(vec![60, 1440]),
        ..NewEvent::new("Dentist Appointment", at(2, 14 * 60 + 30), at(2, 15 * 60 + 30))
    };
    let birthday_day = today.add_days(5);
    let birthday = NewEvent {
        is_all_day: true,
        color: ACCENT.into(),
        reminder_minutes: Some(vec![1440, 10080]),
        recurrence: Some(Recurrence {
            frequency: RecurrenceFrequency::Yearly,
            interval: 1,
            end_date: None,
            count: None,
        }),
        ..NewEvent::new(
            "Mom's Birthday",
            start_of_day(birthday_day, &zone),
            end_of_day(birthday_day, &zone),
        )
    };

    for event in [meeting, dentist, birthday] {
        ws.calendar.add_event(event)?;
    }
    Ok(())
}
