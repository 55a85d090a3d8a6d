//! Tasks with subtasks, Eisenhower scoring and dashboard selections.
//!
//! A task exclusively owns its subtasks. Other stores only ever hold a
//! task's id and resolve it through [`TaskStore::get_task`].

mod filter;
mod store;

pub use filter::{display_order, EisenhowerMatrix, Quadrant, TaskFilter};
pub use store::TaskStore;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority, lowest to highest.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Sort rank used by task lists: urgent first.
    pub fn rank(self) -> u8 {
        match self {
            TaskPriority::Urgent => 0,
            TaskPriority::High => 1,
            TaskPriority::Medium => 2,
            TaskPriority::Low => 3,
        }
    }
}

/// Life area a task belongs to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Personal,
    Health,
    Education,
    Finance,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskRepeat {
    Daily,
    Weekly,
    Monthly,
}

/// Repeat rule attached to a task. Stored as metadata only; no occurrences
/// are generated from it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecurrence {
    pub frequency: TaskRepeat,
    /// Weekdays (0 = Sunday) for weekly rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u8>>,
    /// Every N periods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubTask {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<DateTime<Utc>>,
    /// Owned subtasks, in insertion order
    pub sub_tasks: Vec<SubTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<TaskRecurrence>,
    /// Eisenhower importance, 1..=5
    pub importance: u8,
    /// Eisenhower urgency, 1..=5
    pub urgency: u8,
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// `(done, total)` over the task's subtasks.
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.sub_tasks.iter().filter(|s| s.completed).count();
        (done, self.sub_tasks.len())
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::of(self.importance, self.urgency)
    }

    pub fn subtask(&self, subtask_id: &str) -> Option<&SubTask> {
        self.sub_tasks.iter().find(|s| s.id == subtask_id)
    }
}

/// Input for [`TaskStore::add_task`]. Everything but the title has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_time: Option<DateTime<Utc>>,
    /// Titles of subtasks to create alongside the task
    pub sub_tasks: Vec<String>,
    pub recurring: Option<TaskRecurrence>,
    pub importance: u8,
    pub urgency: u8,
    pub tags: BTreeSet<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            completed: false,
            priority: TaskPriority::default(),
            category: TaskCategory::default(),
            due_date: None,
            reminder_time: None,
            sub_tasks: Vec::new(),
            recurring: None,
            importance: 3,
            urgency: 3,
            tags: BTreeSet::new(),
        }
    }
}

/// Partial update for a task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    pub due_date: Option<DateTime<Utc>>,
    pub reminder_time: Option<DateTime<Utc>>,
    pub recurring: Option<TaskRecurrence>,
    pub importance: Option<u8>,
    pub urgency: Option<u8>,
    pub tags: Option<BTreeSet<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubTaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}
