// --- File: crates/advisory_schedule/src/slots.rs ---
//! Slot generation: office hours in, ordered start times out.

use advisory_config::OfficeHoursConfig;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::ScheduleError;

const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A wall-clock time with minute granularity, formatted as `HH:mm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    /// Truncates seconds and below.
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self(time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }

    /// Anchors this time on a calendar day.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }

    /// Display label used by the slot grid, e.g. `02:30 PM`.
    pub fn label_12h(&self) -> String {
        self.0.format("%I:%M %p").to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIME_FORMAT))
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
            .map(Self)
            .map_err(|_| ScheduleError::InvalidTime(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Parses a `YYYY-MM-DD` calendar day.
pub fn parse_date(s: &str) -> Result<NaiveDate, ScheduleError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| ScheduleError::InvalidDate(s.to_string()))
}

/// Formats a calendar day as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The daily window in which slots are offered.
///
/// `end_hour` is inclusive: a slot starting exactly at `end_hour:00` is offered.
/// `start_hour > end_hour` is accepted and produces no slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfficeHours {
    start_hour: u32,
    end_hour: u32,
    step_minutes: u32,
}

impl OfficeHours {
    pub fn new(start_hour: u32, end_hour: u32, step_minutes: u32) -> Result<Self, ScheduleError> {
        if start_hour > 23 || end_hour > 23 {
            return Err(ScheduleError::InvalidOfficeHours(format!(
                "hours must be within 0..=23, got {}..={}",
                start_hour, end_hour
            )));
        }
        if step_minutes == 0 {
            return Err(ScheduleError::InvalidOfficeHours(
                "step_minutes must be positive".to_string(),
            ));
        }
        Ok(Self {
            start_hour,
            end_hour,
            step_minutes,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    pub fn start(&self) -> TimeOfDay {
        TimeOfDay(NaiveTime::MIN + Duration::hours(self.start_hour.into()))
    }

    pub fn end(&self) -> TimeOfDay {
        TimeOfDay(NaiveTime::MIN + Duration::hours(self.end_hour.into()))
    }

    /// True when no slot can be generated.
    pub fn is_empty(&self) -> bool {
        self.start_hour > self.end_hour
    }

    /// Whether `time` falls inside the closed window `[start, end]`.
    pub fn contains(&self, time: TimeOfDay) -> bool {
        !self.is_empty() && self.start() <= time && time <= self.end()
    }
}

impl Default for OfficeHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 23,
            step_minutes: 30,
        }
    }
}

impl TryFrom<&OfficeHoursConfig> for OfficeHours {
    type Error = ScheduleError;

    fn try_from(config: &OfficeHoursConfig) -> Result<Self, Self::Error> {
        Self::new(config.start_hour, config.end_hour, config.step_minutes)
    }
}

/// Generates the candidate start times for `date`.
///
/// Starts at `start_hour:00` and advances by `step_minutes` while the current time is at or
/// before `end_hour:00`. The result is strictly increasing; when the step does not divide the
/// window the last slot is the largest one not past the end.
pub fn generate_slots(date: NaiveDate, office_hours: &OfficeHours) -> Vec<TimeOfDay> {
    let start = office_hours.start().on(date);
    let end = office_hours.end().on(date);
    let step = Duration::minutes(office_hours.step_minutes.into());

    let mut slots = Vec::new();
    let mut current = start;
    while current <= end {
        slots.push(TimeOfDay(current.time()));
        current += step;
    }

    debug!(
        "Generated {} slots for {} ({:02}:00-{:02}:00 every {} min)",
        slots.len(),
        date,
        office_hours.start_hour,
        office_hours.end_hour,
        office_hours.step_minutes
    );
    slots
}
