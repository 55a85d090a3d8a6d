use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Task, TaskCategory, TaskPriority};

/// List filter for the task view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    /// Case-insensitive substring of the title
    pub search: Option<String>,
    pub category: Option<TaskCategory>,
    pub priority: Option<TaskPriority>,
    pub show_completed: bool,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(query) = self.search.as_deref().filter(|q| !q.is_empty()) {
            if !task.title.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != task.category) {
            return false;
        }
        if self.priority.is_some_and(|p| p != task.priority) {
            return false;
        }
        self.show_completed || !task.completed
    }
}

/// Task list order: open tasks first, then dated tasks by due date, then
/// undated tasks by priority.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    if a.completed != b.completed {
        return a.completed.cmp(&b.completed);
    }
    match (a.due_date, b.due_date) {
        (Some(da), Some(db)) => da.cmp(&db),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.priority.rank().cmp(&b.priority.rank()),
    }
}

/// Eisenhower quadrant. Scores above 3 count as important / urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    /// Important and urgent
    DoFirst,
    /// Important, not urgent
    Schedule,
    /// Urgent, not important
    Delegate,
    Eliminate,
}

impl Quadrant {
    pub fn of(importance: u8, urgency: u8) -> Self {
        match (importance > 3, urgency > 3) {
            (true, true) => Quadrant::DoFirst,
            (true, false) => Quadrant::Schedule,
            (false, true) => Quadrant::Delegate,
            (false, false) => Quadrant::Eliminate,
        }
    }
}

/// Open tasks grouped by quadrant, each group in store order.
#[derive(Debug, Default, Serialize)]
pub struct EisenhowerMatrix<'a> {
    pub do_first: Vec<&'a Task>,
    pub schedule: Vec<&'a Task>,
    pub delegate: Vec<&'a Task>,
    pub eliminate: Vec<&'a Task>,
}

impl<'a> EisenhowerMatrix<'a> {
    pub fn build(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut matrix = Self::default();
        for task in tasks.into_iter().filter(|t| !t.completed) {
            matrix.bucket_mut(task.quadrant()).push(task);
        }
        matrix
    }

    pub fn bucket(&self, quadrant: Quadrant) -> &[&'a Task] {
        match quadrant {
            Quadrant::DoFirst => &self.do_first,
            Quadrant::Schedule => &self.schedule,
            Quadrant::Delegate => &self.delegate,
            Quadrant::Eliminate => &self.eliminate,
        }
    }

    fn bucket_mut(&mut self, quadrant: Quadrant) -> &mut Vec<&'a Task> {
        match quadrant {
            Quadrant::DoFirst => &mut self.do_first,
            Quadrant::Schedule => &mut self.schedule,
            Quadrant::Delegate => &mut self.delegate,
            Quadrant::Eliminate => &mut self.eliminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn task(title: &str, priority: TaskPriority) -> Task {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        Task {
            id: title.to_string(),
            title: title.to_string(),
            description: None,
            completed: false,
            priority,
            category: TaskCategory::Work,
            due_date: None,
            reminder_time: None,
            sub_tasks: Vec::new(),
            recurring: None,
            importance: 3,
            urgency: 3,
            tags: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn quadrant_thresholds() {
        assert_eq!(Quadrant::of(4, 4), Quadrant::DoFirst);
        assert_eq!(Quadrant::of(5, 3), Quadrant::Schedule);
        assert_eq!(Quadrant::of(3, 5), Quadrant::Delegate);
        assert_eq!(Quadrant::of(3, 3), Quadrant::Eliminate);
    }

    #[test]
    fn filter_search_is_case_insensitive() {
        let filter = TaskFilter {
            search: Some("PROPOSAL".into()),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&task("Write proposal", TaskPriority::High)));
        assert!(!filter.matches(&task("Groceries", TaskPriority::High)));
    }

    #[test]
    fn filter_hides_completed_unless_asked() {
        let mut done = task("Done", TaskPriority::Low);
        done.completed = true;
        assert!(!TaskFilter::default().matches(&done));
        let show = TaskFilter {
            show_completed: true,
            ..TaskFilter::default()
        };
        assert!(show.matches(&done));
    }

    #[test]
    fn display_order_puts_dated_before_undated() {
        let mut dated = task("dated", TaskPriority::Low);
        dated.due_date = Some(Utc.with_ymd_and_hms(2024, 5, 3, 0, 0, 0).unwrap());
        let urgent = task("urgent", TaskPriority::Urgent);
        let mut done = task("done", TaskPriority::Urgent);
        done.completed = true;

        let mut list = vec![done.clone(), urgent.clone(), dated.clone()];
        list.sort_by(display_order);
        let titles: Vec<_> = list.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["dated", "urgent", "done"]);
    }

    #[test]
    fn matrix_skips_completed_tasks() {
        let mut hot = task("hot", TaskPriority::High);
        hot.importance = 5;
        hot.urgency = 5;
        let mut finished = hot.clone();
        finished.completed = true;
        let tasks = [hot, finished];
        let matrix = EisenhowerMatrix::build(&tasks);
        assert_eq!(matrix.bucket(Quadrant::DoFirst).len(), 1);
        assert!(matrix.eliminate.is_empty());
    }
}
