// --- File: crates/advisory_schedule/src/settings.rs ---
use advisory_config::{InputModeConfig, ScheduleConfig};
use chrono::NaiveDate;
use serde::Serialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::availability::BookedRegistry;
use crate::error::ScheduleError;
use crate::slots::OfficeHours;

/// How the visitor picks a time of day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Only generated slots can be chosen.
    #[default]
    SlotGrid,
    /// Any minute inside office hours can be chosen.
    DateTimePicker,
}

impl From<InputModeConfig> for InputMode {
    fn from(config: InputModeConfig) -> Self {
        match config {
            InputModeConfig::SlotGrid => InputMode::SlotGrid,
            InputModeConfig::DateTimePicker => InputMode::DateTimePicker,
        }
    }
}

/// Validated scheduling parameters shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSettings {
    pub office_hours: OfficeHours,
    pub page_size: usize,
    pub submit_delay: Duration,
    pub input_mode: InputMode,
    pub auto_select_first_available: bool,
    /// Zero disables idle eviction.
    pub session_idle_ttl: Duration,
    pub session_sweep_interval: Duration,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            office_hours: OfficeHours::default(),
            page_size: 9,
            submit_delay: Duration::from_millis(450),
            input_mode: InputMode::SlotGrid,
            auto_select_first_available: false,
            session_idle_ttl: Duration::from_secs(30 * 60),
            session_sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ScheduleSettings {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, ScheduleError> {
        let office_hours = OfficeHours::try_from(&config.office_hours)?;
        if office_hours.is_empty() {
            warn!(
                "Office hours {}..={} produce no slots",
                office_hours.start_hour(),
                office_hours.end_hour()
            );
        }
        if config.page_size == 0 {
            return Err(ScheduleError::InvalidPageSize);
        }
        Ok(Self {
            office_hours,
            page_size: config.page_size,
            submit_delay: Duration::from_millis(config.submit_delay_ms),
            input_mode: config.input_mode.into(),
            auto_select_first_available: config.auto_select_first_available,
            session_idle_ttl: Duration::from_secs(config.session_idle_ttl_secs),
            session_sweep_interval: Duration::from_secs(config.session_sweep_secs),
        })
    }

    pub fn with_office_hours(mut self, office_hours: OfficeHours) -> Self {
        self.office_hours = office_hours;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_input_mode(mut self, input_mode: InputMode) -> Self {
        self.input_mode = input_mode;
        self
    }

    pub fn with_auto_select(mut self, enabled: bool) -> Self {
        self.auto_select_first_available = enabled;
        self
    }

    pub fn with_session_idle_ttl(mut self, ttl: Duration) -> Self {
        self.session_idle_ttl = ttl;
        self
    }

    pub fn with_session_sweep_interval(mut self, interval: Duration) -> Self {
        self.session_sweep_interval = interval;
        self
    }
}

/// Builds the initial registry: demo bookings relative to `today` when enabled, plus the
/// configured ISO table.
pub fn seed_registry(
    config: &ScheduleConfig,
    today: NaiveDate,
) -> Result<BookedRegistry, ScheduleError> {
    let mut registry = if config.seed_demo_bookings {
        BookedRegistry::demo(today)
    } else {
        BookedRegistry::new()
    };
    if let Some(table) = &config.booked {
        registry.merge(BookedRegistry::from_iso_table(table)?);
    }
    info!("Booked registry seeded with {} slots", registry.len());
    Ok(registry)
}
