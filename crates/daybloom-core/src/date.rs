//! Calendar-day helpers shared by every store.
//!
//! Instants are stored as `DateTime<Utc>`. Anything that talks about a
//! "day" goes through a time zone, normally the one carried by the store's
//! [`Clock`], so two instants on the same local day always map to the same
//! [`DayKey`].

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A local calendar day, rendered as `YYYY-MM-DD`.
///
/// Ordering matches chronological order, which also matches the lexical
/// order of the rendered keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Strict `YYYY-MM-DD` parse.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(ValidationError::InvalidDayKey(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ValidationError::InvalidDayKey(s.to_string()))
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    /// Weekday as 0..=6 with Sunday = 0.
    pub fn weekday_index(self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    /// Shift by whole calendar days. Saturates at chrono's date bounds.
    pub fn add_days(self, days: i64) -> Self {
        self.0
            .checked_add_signed(Duration::days(days))
            .map(Self)
            .unwrap_or(self)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DayKey::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Local calendar day of `instant` in `zone`.
pub fn day_key<Tz: TimeZone>(instant: &DateTime<Utc>, zone: &Tz) -> DayKey {
    DayKey(instant.with_timezone(zone).date_naive())
}

/// Signed number of calendar days from `a` to `b`.
///
/// Works on date components, so a daylight-saving shift between the two
/// days never turns a one-day gap into 0 or 2.
pub fn days_between(a: DayKey, b: DayKey) -> i64 {
    b.0.signed_duration_since(a.0).num_days()
}

/// Half-open interval overlap: `[start_a, end_a)` against `[start_b, end_b)`.
pub fn ranges_overlap<T: PartialOrd>(start_a: T, end_a: T, start_b: T, end_b: T) -> bool {
    start_a < end_b && start_b < end_a
}

/// Whether two instants fall on the same local calendar day.
pub fn same_local_day<Tz: TimeZone>(a: &DateTime<Utc>, b: &DateTime<Utc>, zone: &Tz) -> bool {
    day_key(a, zone) == day_key(b, zone)
}

/// First instant of `day` (local 00:00:00.000).
pub fn start_of_day<Tz: TimeZone>(day: DayKey, zone: &Tz) -> DateTime<Utc> {
    resolve_local(zone, day.0.and_time(NaiveTime::MIN), true)
}

/// Last instant of `day` (local 23:59:59.999).
pub fn end_of_day<Tz: TimeZone>(day: DayKey, zone: &Tz) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    resolve_local(zone, day.0.and_time(last), false)
}

/// Map a wall-clock time to an instant. Inside a DST gap the nearest valid
/// wall-clock time in the search direction is used.
fn resolve_local<Tz: TimeZone>(zone: &Tz, local: NaiveDateTime, forward: bool) -> DateTime<Utc> {
    let step = if forward {
        Duration::minutes(15)
    } else {
        Duration::minutes(-15)
    };
    let mut probe = local;
    for _ in 0..=96 {
        let resolved = zone.from_local_datetime(&probe);
        let hit = if forward {
            resolved.earliest()
        } else {
            resolved.latest()
        };
        if let Some(dt) = hit {
            return dt.with_timezone(&Utc);
        }
        probe += step;
    }
    Utc.from_utc_datetime(&local)
}

/// Source of "now" and of the local time zone.
///
/// A system clock reads the wall clock on every call; a fixed clock always
/// returns the instant it was given, which keeps scripted runs and tests
/// reproducible.
#[derive(Debug, Clone)]
pub struct Clock<Tz: TimeZone = Local> {
    zone: Tz,
    fixed: Option<DateTime<Utc>>,
}

impl Clock<Local> {
    pub fn system() -> Self {
        Self::system_in(Local)
    }
}

impl Default for Clock<Local> {
    fn default() -> Self {
        Self::system()
    }
}

impl<Tz: TimeZone> Clock<Tz> {
    pub fn system_in(zone: Tz) -> Self {
        Self { zone, fixed: None }
    }

    pub fn fixed(zone: Tz, at: DateTime<Utc>) -> Self {
        Self {
            zone,
            fixed: Some(at),
        }
    }

    pub fn zone(&self) -> &Tz {
        &self.zone
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.fixed.unwrap_or_else(Utc::now)
    }

    pub fn today(&self) -> DayKey {
        day_key(&self.now(), &self.zone)
    }

    /// Pin the clock to `at`.
    pub fn set_now(&mut self, at: DateTime<Utc>) {
        self.fixed = Some(at);
    }

    /// Move a fixed clock forward. A system clock is pinned first.
    ///
    /// # Errors
    /// Returns [`ValidationError::ClockOverflow`] when the result is out of
    /// chrono's range; the clock is left unchanged.
    pub fn advance(&mut self, by: Duration) -> Result<(), ValidationError> {
        let at = self
            .now()
            .checked_add_signed(by)
            .ok_or(ValidationError::ClockOverflow(by))?;
        self.fixed = Some(at);
        Ok(())
    }
}
