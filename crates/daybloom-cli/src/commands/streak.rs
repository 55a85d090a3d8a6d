use clap::{Args, ValueEnum};
use daybloom_core::{compute_streak, Clock, DayKey, HabitFrequency, HabitLog, Result};

#[derive(Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Daily,
    Weekly,
    Custom,
}

impl From<FrequencyArg> for HabitFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Daily => HabitFrequency::Daily,
            FrequencyArg::Weekly => HabitFrequency::Weekly,
            FrequencyArg::Custom => HabitFrequency::Custom,
        }
    }
}

#[derive(Args)]
pub struct StreakArgs {
    /// Habit frequency
    #[arg(long, value_enum, default_value = "daily")]
    frequency: FrequencyArg,
    /// Day to count from (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    today: Option<DayKey>,
    /// Completed days (YYYY-MM-DD), in any order
    days: Vec<DayKey>,
}

pub fn run(args: StreakArgs) -> Result<()> {
    let today = args.today.unwrap_or_else(|| Clock::system().today());
    let logs: Vec<HabitLog> = args
        .days
        .into_iter()
        .map(|date| HabitLog {
            date,
            completed: true,
            note: None,
        })
        .collect();
    println!("{}", compute_streak(args.frequency.into(), &logs, today));
    Ok(())
}
