use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Kind of Pomodoro session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Work,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Work => "Focus Session",
            SessionType::ShortBreak => "Short Break",
            SessionType::LongBreak => "Long Break",
        }
    }
}

/// Timer settings. Durations are in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub sessions_before_long_break: u32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            sessions_before_long_break: 4,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
        }
    }
}

impl PomodoroSettings {
    /// Minutes for a session of `session_type`.
    pub fn duration_for(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Work => self.work_duration,
            SessionType::ShortBreak => self.short_break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Seconds for a session of `session_type`.
    pub fn duration_secs(&self, session_type: SessionType) -> u32 {
        self.duration_for(session_type).saturating_mul(60)
    }

    /// All durations and the long-break interval must be positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("workDuration", self.work_duration),
            ("shortBreakDuration", self.short_break_duration),
            ("longBreakDuration", self.long_break_duration),
            ("sessionsBeforeLongBreak", self.sessions_before_long_break),
        ];
        for (field, value) in fields {
            if value == 0 {
                return Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Settings with `patch` merged in, validated.
    pub fn merged(&self, patch: &SettingsPatch) -> Result<Self, ValidationError> {
        let merged = Self {
            work_duration: patch.work_duration.unwrap_or(self.work_duration),
            short_break_duration: patch
                .short_break_duration
                .unwrap_or(self.short_break_duration),
            long_break_duration: patch.long_break_duration.unwrap_or(self.long_break_duration),
            sessions_before_long_break: patch
                .sessions_before_long_break
                .unwrap_or(self.sessions_before_long_break),
            auto_start_breaks: patch.auto_start_breaks.unwrap_or(self.auto_start_breaks),
            auto_start_pomodoros: patch
                .auto_start_pomodoros
                .unwrap_or(self.auto_start_pomodoros),
        };
        merged.validate()?;
        Ok(merged)
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    pub work_duration: Option<u32>,
    pub short_break_duration: Option<u32>,
    pub long_break_duration: Option<u32>,
    pub sessions_before_long_break: Option<u32>,
    pub auto_start_breaks: Option<bool>,
    pub auto_start_pomodoros: Option<bool>,
}

/// Duration setting reachable from the settings stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DurationField {
    Work,
    ShortBreak,
    LongBreak,
}

impl DurationField {
    /// Minutes added or removed per step.
    pub fn step(self) -> u32 {
        match self {
            DurationField::ShortBreak => 1,
            DurationField::Work | DurationField::LongBreak => 5,
        }
    }

    /// Smallest value a decrement may reach.
    pub fn floor(self) -> u32 {
        match self {
            DurationField::ShortBreak => 1,
            DurationField::Work | DurationField::LongBreak => 5,
        }
    }

    pub fn get(self, settings: &PomodoroSettings) -> u32 {
        match self {
            DurationField::Work => settings.work_duration,
            DurationField::ShortBreak => settings.short_break_duration,
            DurationField::LongBreak => settings.long_break_duration,
        }
    }

    /// Patch setting this field to `minutes`.
    pub fn patch(self, minutes: u32) -> SettingsPatch {
        let mut patch = SettingsPatch::default();
        match self {
            DurationField::Work => patch.work_duration = Some(minutes),
            DurationField::ShortBreak => patch.short_break_duration = Some(minutes),
            DurationField::LongBreak => patch.long_break_duration = Some(minutes),
        }
        patch
    }

    /// Next value after one step, or `None` when a decrement would cross
    /// the floor.
    pub fn stepped(self, current: u32, adjust: Adjust) -> Option<u32> {
        match adjust {
            Adjust::Increase => Some(current.saturating_add(self.step())),
            Adjust::Decrease => current
                .checked_sub(self.step())
                .filter(|next| *next >= self.floor()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjust {
    Increase,
    Decrease,
}
