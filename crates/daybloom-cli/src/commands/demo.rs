use chrono::Local;
use daybloom_core::date::day_key;
use daybloom_core::{seed, Clock, Dashboard, Event, Result, TimerState};

pub fn run(json: bool) -> Result<()> {
    let mut ws = super::workspace(Clock::system());
    seed::populate(&mut ws)?;
    let dashboard = ws.dashboard();

    if json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", render(&dashboard));
    }
    Ok(())
}

fn render(d: &Dashboard<'_>) -> String {
    let mut out = String::new();
    out.push_str(&format!("Today      {}\n", d.today));
    out.push_str(&format!(
        "Tasks      {}/{} done\n",
        d.tasks_completed, d.tasks_total
    ));
    for task in &d.upcoming_tasks {
        let due = task
            .due_date
            .map(|at| day_key(&at, &Local).to_string())
            .unwrap_or_default();
        let (done, total) = task.subtask_progress();
        out.push_str(&format!("  {due}  {} ({done}/{total})\n", task.title));
    }

    out.push_str(&format!(
        "Habits     {}/{} done today\n",
        d.habits_done_today, d.habits_due_today
    ));
    for habit in &d.top_habits {
        out.push_str(&format!(
            "  {:<20} {} day streak (best {})\n",
            habit.title, habit.current_streak, habit.longest_streak
        ));
    }

    out.push_str(&format!("Events     {}\n", d.todays_events.len()));
    for event in &d.todays_events {
        let span = if event.is_all_day {
            "all day    ".to_string()
        } else {
            format!(
                "{}-{}",
                event.start_time.with_timezone(&Local).format("%H:%M"),
                event.end_time.with_timezone(&Local).format("%H:%M")
            )
        };
        out.push_str(&format!("  {span}  {}\n", event.title));
    }

    out.push_str(&format!(
        "Focus      {} min today, {} sessions\n",
        d.focus.focus_minutes_today, d.focus.completed_work_sessions
    ));
    if let Event::StateSnapshot {
        state,
        upcoming_type,
        remaining_secs,
        ..
    } = &d.timer
    {
        let state = match state {
            TimerState::Idle => "idle",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        };
        out.push_str(&format!(
            "Timer      {state}, next {} {:02}:{:02}\n",
            upcoming_type.label(),
            remaining_secs / 60,
            remaining_secs % 60
        ));
    }
    out
}
