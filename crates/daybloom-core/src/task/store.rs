use chrono::{Local, TimeZone};
use tracing::debug;

use super::filter::{display_order, EisenhowerMatrix, TaskFilter};
use super::{NewTask, SubTask, SubTaskPatch, Task, TaskCategory, TaskPatch, TaskPriority};
use crate::date::Clock;
use crate::error::ValidationError;
use crate::new_id;

/// In-memory owner of all tasks.
#[derive(Debug, Clone)]
pub struct TaskStore<Tz: TimeZone = Local> {
    tasks: Vec<Task>,
    clock: Clock<Tz>,
}

impl<Tz: TimeZone> TaskStore<Tz> {
    pub fn new(clock: Clock<Tz>) -> Self {
        Self {
            tasks: Vec::new(),
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

    /// Create a task and return its id.
    ///
    /// # Errors
    /// Rejects importance or urgency outside 1..=5.
    pub fn add_task(&mut self, new: NewTask) -> Result<String, ValidationError> {
        check_scores(Some(new.importance), Some(new.urgency))?;
        let now = self.clock.now();
        let sub_tasks = new
            .sub_tasks
            .into_iter()
            .map(|title| SubTask {
                id: new_id(),
                title,
                completed: false,
                created_at: now,
            })
            .collect();
        let task = Task {
            id: new_id(),
            title: new.title,
            description: new.description,
            completed: new.completed,
            priority: new.priority,
            category: new.category,
            due_date: new.due_date,
            reminder_time: new.reminder_time,
            sub_tasks,
            recurring: new.recurring,
            importance: new.importance,
            urgency: new.urgency,
            tags: new.tags,
            created_at: now,
            updated_at: now,
        };
        let id = task.id.clone();
        debug!(task_id = %id, title = %task.title, "task added");
        self.tasks.push(task);
        Ok(id)
    }

    /// Merge `patch` into the task. Unknown ids are ignored.
    ///
    /// # Errors
    /// Rejects importance or urgency outside 1..=5; the task is left as is.
    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> Result<(), ValidationError> {
        check_scores(patch.importance, patch.urgency)?;
        self.with_task(task_id, |task| {
            if let Some(title) = patch.title {
                task.title = title;
            }
            if let Some(description) = patch.description {
                task.description = Some(description);
            }
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
            if let Some(priority) = patch.priority {
                task.priority = priority;
            }
            if let Some(category) = patch.category {
                task.category = category;
            }
            if let Some(due) = patch.due_date {
                task.due_date = Some(due);
            }
            if let Some(reminder) = patch.reminder_time {
                task.reminder_time = Some(reminder);
            }
            if let Some(recurring) = patch.recurring {
                task.recurring = Some(recurring);
            }
            if let Some(importance) = patch.importance {
                task.importance = importance;
            }
            if let Some(urgency) = patch.urgency {
                task.urgency = urgency;
            }
            if let Some(tags) = patch.tags {
                task.tags = tags;
            }
        });
        Ok(())
    }

    /// Remove a task together with its subtasks.
    pub fn delete_task(&mut self, task_id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != task_id);
        if self.tasks.len() == before {
            debug!(task_id, "delete of unknown task ignored");
        }
    }

    pub fn toggle_task_completion(&mut self, task_id: &str) {
        self.with_task(task_id, |task| task.completed = !task.completed);
    }

    /// Append a subtask; returns its id, or `None` when the task is unknown.
    pub fn add_subtask(&mut self, task_id: &str, title: impl Into<String>) -> Option<String> {
        let subtask = SubTask {
            id: new_id(),
            title: title.into(),
            completed: false,
            created_at: self.clock.now(),
        };
        let id = subtask.id.clone();
        self.with_task(task_id, move |task| task.sub_tasks.push(subtask))
            .then_some(id)
    }

    pub fn update_subtask(&mut self, task_id: &str, subtask_id: &str, patch: SubTaskPatch) {
        self.with_task(task_id, |task| {
            if let Some(sub) = task.sub_tasks.iter_mut().find(|s| s.id == subtask_id) {
                if let Some(title) = patch.title {
                    sub.title = title;
                }
                if let Some(completed) = patch.completed {
                    sub.completed = completed;
                }
            }
        });
    }

    pub fn delete_subtask(&mut self, task_id: &str, subtask_id: &str) {
        self.with_task(task_id, |task| task.sub_tasks.retain(|s| s.id != subtask_id));
    }

    pub fn toggle_subtask_completion(&mut self, task_id: &str, subtask_id: &str) {
        self.with_task(task_id, |task| {
            if let Some(sub) = task.sub_tasks.iter_mut().find(|s| s.id == subtask_id) {
                sub.completed = !sub.completed;
            }
        });
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn tasks_by_category(&self, category: TaskCategory) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.category == category).collect()
    }

    pub fn tasks_by_priority(&self, priority: TaskPriority) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.priority == priority).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.completed).collect()
    }

    pub fn incomplete_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.completed).collect()
    }

    /// Filtered task list in display order.
    pub fn filter(&self, filter: &TaskFilter) -> Vec<&Task> {
        let mut hits: Vec<&Task> = self.tasks.iter().filter(|t| filter.matches(t)).collect();
        hits.sort_by(|a, b| display_order(a, b));
        hits
    }

    /// Open tasks with a due date, soonest first.
    pub fn upcoming(&self, limit: usize) -> Vec<&Task> {
        let mut dated: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| !t.completed && t.due_date.is_some())
            .collect();
        dated.sort_by_key(|t| t.due_date);
        dated.truncate(limit);
        dated
    }

    pub fn eisenhower(&self) -> EisenhowerMatrix<'_> {
        EisenhowerMatrix::build(&self.tasks)
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Apply `f` to the task and bump `updated_at`. Returns false for an
    /// unknown id.
    fn with_task(&mut self, task_id: &str, f: impl FnOnce(&mut Task)) -> bool {
        let now = self.clock.now();
        match self.tasks.iter_mut().find(|t| t.id == task_id) {
            Some(task) => {
                f(task);
                task.updated_at = now;
                true
            }
            None => {
                debug!(task_id, "unknown task ignored");
                false
            }
        }
    }
}

fn check_scores(importance: Option<u8>, urgency: Option<u8>) -> Result<(), ValidationError> {
    if let Some(value) = importance {
        ValidationError::check_range("importance", value.into(), 1, 5)?;
    }
    if let Some(value) = urgency {
        ValidationError::check_range("urgency", value.into(), 1, 5)?;
    }
    Ok(())
}
