use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Static Site Config ---
// The marketing pages are prebuilt assets served as-is.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SiteConfig {
    pub static_dir: String,
}

// --- Schedule Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct OfficeHoursConfig {
    pub start_hour: u32,
    pub end_hour: u32, // inclusive: last offered start
    pub step_minutes: u32,
}

impl Default for OfficeHoursConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 23,
            step_minutes: 30,
        }
    }
}

/// How the widget lets a visitor choose the time of day.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputModeConfig {
    /// Pick one of the generated slots.
    #[default]
    SlotGrid,
    /// Free date-time picker, any minute inside office hours.
    DateTimePicker,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub office_hours: OfficeHoursConfig,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    #[serde(default)]
    pub input_mode: InputModeConfig,
    #[serde(default)]
    pub auto_select_first_available: bool,
    #[serde(default = "default_true")]
    pub seed_demo_bookings: bool,
    // Sessions untouched for this long are dropped; 0 keeps them until closed
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,
    #[serde(default = "default_session_sweep_secs")]
    pub session_sweep_secs: u64,
    // "YYYY-MM-DD" -> ["HH:mm", ...]
    #[serde(default)]
    pub booked: Option<BTreeMap<String, Vec<String>>>,
}

fn default_page_size() -> usize {
    9
}

fn default_submit_delay_ms() -> u64 {
    450
}

fn default_session_idle_ttl_secs() -> u64 {
    1800
}

fn default_session_sweep_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            office_hours: OfficeHoursConfig::default(),
            page_size: default_page_size(),
            submit_delay_ms: default_submit_delay_ms(),
            input_mode: InputModeConfig::default(),
            auto_select_first_available: false,
            seed_demo_bookings: true,
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
            session_sweep_secs: default_session_sweep_secs(),
            booked: None,
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    #[serde(default)]
    pub site: Option<SiteConfig>,

    #[serde(default)]
    pub schedule: ScheduleConfig,
}
