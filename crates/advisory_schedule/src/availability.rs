// --- File: crates/advisory_schedule/src/availability.rs ---
//! Booked registry and slot classification.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::ScheduleError;
use crate::slots::{format_date, parse_date, TimeOfDay};

/// Times already taken, keyed by calendar day.
///
/// Serializes as the ISO table `{"YYYY-MM-DD": ["HH:mm", ...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookedRegistry {
    entries: BTreeMap<NaiveDate, BTreeSet<TimeOfDay>>,
}

/// Registry handle shared between sessions. The lock is never held across an await.
pub type SharedRegistry = Arc<RwLock<BookedRegistry>>;

impl BookedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from an ISO table as found in configuration files.
    pub fn from_iso_table(table: &BTreeMap<String, Vec<String>>) -> Result<Self, ScheduleError> {
        let mut registry = Self::new();
        for (date, times) in table {
            let date = parse_date(date)?;
            for time in times {
                registry.insert(date, time.parse()?);
            }
        }
        Ok(registry)
    }

    pub fn to_iso_table(&self) -> BTreeMap<String, Vec<String>> {
        self.entries
            .iter()
            .map(|(date, times)| {
                (
                    format_date(*date),
                    times.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    /// The demo bookings shown by the marketing site: today, tomorrow and three days out.
    pub fn demo(today: NaiveDate) -> Self {
        let seed: [(i64, [(u32, u32); 3]); 3] = [
            (0, [(11, 0), (14, 30), (18, 0)]),
            (1, [(9, 30), (12, 0), (16, 30)]),
            (3, [(10, 0), (10, 30), (20, 0)]),
        ];

        let mut registry = Self::new();
        for (offset, times) in seed {
            let date = today + Duration::days(offset);
            for (hour, minute) in times {
                if let Some(time) = TimeOfDay::new(hour, minute) {
                    registry.insert(date, time);
                }
            }
        }
        registry
    }

    /// Records a booking. Returns false when the time was already taken.
    pub fn insert(&mut self, date: NaiveDate, time: TimeOfDay) -> bool {
        self.entries.entry(date).or_default().insert(time)
    }

    /// Adds every entry of `other`.
    pub fn merge(&mut self, other: BookedRegistry) {
        for (date, times) in other.entries {
            self.entries.entry(date).or_default().extend(times);
        }
    }

    pub fn is_booked(&self, date: NaiveDate, time: TimeOfDay) -> bool {
        self.entries
            .get(&date)
            .is_some_and(|times| times.contains(&time))
    }

    /// Booked times for `date`, ascending.
    pub fn booked_on(&self, date: NaiveDate) -> Vec<TimeOfDay> {
        self.entries
            .get(&date)
            .map(|times| times.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.keys().copied()
    }

    /// Total number of booked slots across all days.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(RwLock::new(self))
    }
}

pub(crate) fn read_registry(registry: &SharedRegistry) -> RwLockReadGuard<'_, BookedRegistry> {
    registry.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_registry(registry: &SharedRegistry) -> RwLockWriteGuard<'_, BookedRegistry> {
    registry.write().unwrap_or_else(PoisonError::into_inner)
}

/// Derived availability of one slot. Never stored.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Available,
    Booked,
    Past,
}

impl SlotStatus {
    pub fn is_selectable(self) -> bool {
        self == SlotStatus::Available
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotStatus::Available => "available",
            SlotStatus::Booked => "booked",
            SlotStatus::Past => "past",
        })
    }
}

/// Classifies one slot.
///
/// Booked wins over Past. A slot on today's date at or before `now` is Past.
pub fn classify(
    date: NaiveDate,
    time: TimeOfDay,
    registry: &BookedRegistry,
    now: NaiveDateTime,
) -> SlotStatus {
    if registry.is_booked(date, time) {
        SlotStatus::Booked
    } else if date == now.date() && time.on(date) <= now {
        SlotStatus::Past
    } else {
        SlotStatus::Available
    }
}

/// A slot with its status and display label, as rendered by the widget.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotView {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "14:30"))]
    pub time: TimeOfDay,
    #[cfg_attr(feature = "openapi", schema(example = "02:30 PM"))]
    pub label: String,
    pub status: SlotStatus,
}

/// Classifies a whole sequence, keeping its order.
pub fn annotate(
    date: NaiveDate,
    slots: &[TimeOfDay],
    registry: &BookedRegistry,
    now: NaiveDateTime,
) -> Vec<SlotView> {
    let views: Vec<SlotView> = slots
        .iter()
        .map(|&time| SlotView {
            time,
            label: time.label_12h(),
            status: classify(date, time, registry, now),
        })
        .collect();

    debug!(
        "Annotated {} slots for {}: {} available",
        views.len(),
        date,
        views.iter().filter(|v| v.status.is_selectable()).count()
    );
    views
}
