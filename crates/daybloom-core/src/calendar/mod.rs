//! Calendar events and the store that owns them.

pub mod query;

pub use query::{events_for_day, events_for_range, marked_days, occurs_on, EventMark};

use std::collections::BTreeMap;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::date::{Clock, DayKey};
use crate::error::ValidationError;
use crate::new_id;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Repeat rule. Kept as metadata; occurrences are never generated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    pub frequency: RecurrenceFrequency,
    /// Every N periods
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Number of occurrences
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    /// Never before `start_time`
    pub end_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_all_day: bool,
    pub color: String,
    /// Weak reference into the task store; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_task_id: Option<String>,
    /// Minutes before start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_EVENT_COLOR: &str = "#818cf8";

fn default_event_color() -> String {
    DEFAULT_EVENT_COLOR.to_string()
}

/// Input for [`CalendarStore::add_event`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default = "default_event_color")]
    pub color: String,
    #[serde(default)]
    pub related_task_id: Option<String>,
    #[serde(default)]
    pub reminder_minutes: Option<Vec<u32>>,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            start_time,
            end_time,
            location: None,
            is_all_day: false,
            color: default_event_color(),
            related_task_id: None,
            reminder_minutes: None,
            recurrence: None,
        }
    }
}

/// Partial update for an event. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub is_all_day: Option<bool>,
    pub color: Option<String>,
    pub related_task_id: Option<String>,
    pub reminder_minutes: Option<Vec<u32>>,
    pub recurrence: Option<Recurrence>,
}

fn check_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::InvalidTimeRange { start, end });
    }
    Ok(())
}

/// In-memory owner of all calendar events.
#[derive(Debug, Clone)]
pub struct CalendarStore<Tz: TimeZone = Local> {
    events: Vec<CalendarEvent>,
    clock: Clock<Tz>,
}

impl<Tz: TimeZone> CalendarStore<Tz> {
    pub fn new(clock: Clock<Tz>) -> Self {
        Self {
            events: Vec::new(),
            clock,
        }
    }

    pub fn clock(&self) -> &Clock<Tz> {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut Clock<Tz> {
        &mut self.clock
    }

    /// # Errors
    /// Rejects an event that ends before it starts.
    pub fn add_event(&mut self, new: NewEvent) -> Result<String, ValidationError> {
        check_range(new.start_time, new.end_time)?;
        let now = self.clock.now();
        let event = CalendarEvent {
            id: new_id(),
            title: new.title,
            description: new.description,
            start_time: new.start_time,
            end_time: new.end_time,
            location: new.location,
            is_all_day: new.is_all_day,
            color: new.color,
            related_task_id: new.related_task_id,
            reminder_minutes: new.reminder_minutes,
            recurrence: new.recurrence,
            created_at: now,
            updated_at: now,
        };
        let id = event.id.clone();
        debug!(event_id = %id, title = %event.title, "event added");
        self.events.push(event);
        Ok(id)
    }

    /// Merge `patch` into the event. Unknown ids are ignored.
    ///
    /// # Errors
    /// Rejects a patch that would leave the event ending before it starts;
    /// the event is left unchanged.
    pub fn update_event(&mut self, event_id: &str, patch: EventPatch) -> Result<(), ValidationError> {
        let now = self.clock.now();
        let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) else {
            debug!(event_id, "unknown event ignored");
            return Ok(());
        };
        let start = patch.start_time.unwrap_or(event.start_time);
        let end = patch.end_time.unwrap_or(event.end_time);
        check_range(start, end)?;

        event.start_time = start;
        event.end_time = end;
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(location) = patch.location {
            event.location = Some(location);
        }
        if let Some(all_day) = patch.is_all_day {
            event.is_all_day = all_day;
        }
        if let Some(color) = patch.color {
            event.color = color;
        }
        if let Some(task_id) = patch.related_task_id {
            event.related_task_id = Some(task_id);
        }
        if let Some(reminders) = patch.reminder_minutes {
            event.reminder_minutes = Some(reminders);
        }
        if let Some(recurrence) = patch.recurrence {
            event.recurrence = Some(recurrence);
        }
        event.updated_at = now;
        Ok(())
    }

    pub fn delete_event(&mut self, event_id: &str) {
        let before = self.events.len();
        self.events.retain(|e| e.id != event_id);
        if self.events.len() == before {
            debug!(event_id, "delete of unknown event ignored");
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn get_event(&self, event_id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    /// Events on `day` in the store's zone, ascending by start.
    pub fn events_for_day(&self, day: DayKey) -> Vec<&CalendarEvent> {
        query::events_for_day(&self.events, day, self.clock.zone())
    }

    pub fn events_for_today(&self) -> Vec<&CalendarEvent> {
        self.events_for_day(self.clock.today())
    }

    /// Events touching the inclusive range `first..=last`.
    pub fn events_for_range(&self, first: DayKey, last: DayKey) -> Vec<&CalendarEvent> {
        query::events_for_range(&self.events, first, last, self.clock.zone())
    }

    /// Events whose weak task reference points at `task_id`.
    pub fn events_for_task(&self, task_id: &str) -> Vec<&CalendarEvent> {
        self.events
            .iter()
            .filter(|e| e.related_task_id.as_deref() == Some(task_id))
            .collect()
    }

    pub fn marked_days(&self, first: DayKey, last: DayKey) -> BTreeMap<DayKey, Vec<EventMark>> {
        query::marked_days(&self.events, first, last, self.clock.zone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn store() -> CalendarStore<Utc> {
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        CalendarStore::new(Clock::fixed(Utc, at))
    }

    fn meeting(store: &CalendarStore<Utc>, hour: i64) -> NewEvent {
        let start = store.clock().now() + Duration::hours(hour);
        NewEvent::new("Meeting", start, start + Duration::hours(1))
    }

    #[test]
    fn add_rejects_inverted_range() {
        let mut store = store();
        let now = store.clock().now();
        let err = store
            .add_event(NewEvent::new("Backwards", now, now - Duration::minutes(1)))
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTimeRange { .. }));
        assert!(store.events().is_empty());
    }

    #[test]
    fn zero_length_event_is_allowed() {
        let mut store = store();
        let now = store.clock().now();
        assert!(store.add_event(NewEvent::new("Instant", now, now)).is_ok());
    }

    #[test]
    fn update_rejects_inverted_patch_and_keeps_event() {
        let mut store = store();
        let new = meeting(&store, 2);
        let id = store.add_event(new.clone()).unwrap();
        let bad = EventPatch {
            end_time: Some(new.start_time - Duration::hours(1)),
            title: Some("Moved".into()),
            ..EventPatch::default()
        };
        assert!(store.update_event(&id, bad).is_err());
        let event = store.get_event(&id).unwrap();
        assert_eq!(event.title, "Meeting");
        assert_eq!(event.end_time, new.end_time);
    }

    #[test]
    fn update_moves_event_between_days() {
        let mut store = store();
        let new = meeting(&store, 2);
        let id = store.add_event(new.clone()).unwrap();
        let today = store.clock().today();
        assert_eq!(store.events_for_day(today).len(), 1);

        store
            .update_event(
                &id,
                EventPatch {
                    start_time: Some(new.start_time + Duration::days(1)),
                    end_time: Some(new.end_time + Duration::days(1)),
                    ..EventPatch::default()
                },
            )
            .unwrap();
        assert!(store.events_for_day(today).is_empty());
        assert_eq!(store.events_for_day(today.add_days(1)).len(), 1);
    }

    #[test]
    fn unknown_event_is_a_no_op() {
        let mut store = store();
        let new = meeting(&store, 1);
        store.add_event(new).unwrap();
        assert!(store.update_event("missing", EventPatch::default()).is_ok());
        store.delete_event("missing");
        assert_eq!(store.events().len(), 1);
        assert!(store.get_event("missing").is_none());
    }

    #[test]
    fn recurring_event_is_not_expanded() {
        let mut store = store();
        let mut weekly = meeting(&store, 2);
        weekly.recurrence = Some(Recurrence {
            frequency: RecurrenceFrequency::Weekly,
            interval: 1,
            end_date: None,
            count: None,
        });
        store.add_event(weekly).unwrap();
        let today = store.clock().today();
        assert_eq!(store.events_for_day(today).len(), 1);
        assert!(store.events_for_day(today.add_days(7)).is_empty());
    }

    #[test]
    fn events_for_task_follow_weak_reference() {
        let mut store = store();
        let mut linked = meeting(&store, 1);
        linked.related_task_id = Some("task-1".into());
        store.add_event(linked).unwrap();
        store.add_event(meeting(&store, 3)).unwrap();
        assert_eq!(store.events_for_task("task-1").len(), 1);
        assert!(store.events_for_task("task-2").is_empty());
    }

    #[test]
    fn events_for_today_sorted_by_start() {
        let mut store = store();
        let late = store.add_event(meeting(&store, 6)).unwrap();
        let early = store.add_event(meeting(&store, 1)).unwrap();
        let ids: Vec<_> = store.events_for_today().iter().map(|e| e.id.clone()).collect();
        assert_eq!(ids, [early, late]);
    }
}
