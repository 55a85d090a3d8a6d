//! Day and range queries over calendar events.
//!
//! Recurrence rules are not expanded: a recurring event only ever matches
//! through its single stored occurrence.

use std::collections::BTreeMap;

use chrono::TimeZone;
use serde::Serialize;

use super::CalendarEvent;
use crate::date::{day_key, ranges_overlap, same_local_day, start_of_day, DayKey};

/// Whether `event` shows up on `day`.
///
/// Matches when it overlaps the day, or is an all-day event whose start
/// falls on the day.
pub fn occurs_on<Tz: TimeZone>(event: &CalendarEvent, day: DayKey, zone: &Tz) -> bool {
    overlaps_days(event, day, day, zone)
        || (event.is_all_day && same_local_day(&event.start_time, &start_of_day(day, zone), zone))
}

/// Whether `event` touches the inclusive day range `first..=last`.
///
/// The event counts as `[start, end)` except that an event ending exactly
/// as the range opens still touches it, as does a zero-length event.
pub fn overlaps_days<Tz: TimeZone>(
    event: &CalendarEvent,
    first: DayKey,
    last: DayKey,
    zone: &Tz,
) -> bool {
    let range_start = start_of_day(first, zone);
    let range_end = start_of_day(last.add_days(1), zone);
    let (start, end) = (event.start_time, event.end_time);

    ranges_overlap(start, end, range_start, range_end) || (range_start..range_end).contains(&end)
}

/// Events on `day`, ascending by start time. Ties keep input order.
pub fn events_for_day<'a, Tz: TimeZone>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    day: DayKey,
    zone: &Tz,
) -> Vec<&'a CalendarEvent> {
    let mut hits: Vec<&CalendarEvent> = events
        .into_iter()
        .filter(|e| occurs_on(e, day, zone))
        .collect();
    hits.sort_by_key(|e| e.start_time);
    hits
}

/// Events touching `first..=last`, in input order.
pub fn events_for_range<'a, Tz: TimeZone>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    first: DayKey,
    last: DayKey,
    zone: &Tz,
) -> Vec<&'a CalendarEvent> {
    events
        .into_iter()
        .filter(|e| overlaps_days(e, first, last, zone))
        .collect()
}

/// Marker dot for the month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMark {
    pub event_id: String,
    pub color: String,
}

/// Event markers keyed by local start day, for days within `first..=last`.
pub fn marked_days<'a, Tz: TimeZone>(
    events: impl IntoIterator<Item = &'a CalendarEvent>,
    first: DayKey,
    last: DayKey,
    zone: &Tz,
) -> BTreeMap<DayKey, Vec<EventMark>> {
    let mut marks: BTreeMap<DayKey, Vec<EventMark>> = BTreeMap::new();
    for event in events {
        let day = day_key(&event.start_time, zone);
        if day < first || day > last {
            continue;
        }
        marks.entry(day).or_default().push(EventMark {
            event_id: event.id.clone(),
            color: event.color.clone(),
        });
    }
    marks
}
