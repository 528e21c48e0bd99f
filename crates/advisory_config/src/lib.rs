use config::{Config, ConfigError, Environment, File, FileFormat};
use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
pub mod models;
pub use models::*;

/// Environment prefix used for overrides, e.g. `ADVISORY__SCHEDULE__PAGE_SIZE=12`.
pub const ENV_PREFIX: &str = "ADVISORY";

/// Loads the layered application configuration.
///
/// Sources, later ones winning:
/// 1. `<CONFIG_DIR>/default.{toml,yaml,json}`
/// 2. `<CONFIG_DIR>/<RUN_ENV>.{toml,yaml,json}` (`RUN_ENV` defaults to `debug`)
/// 3. `ADVISORY__*` environment variables
///
/// `CONFIG_DIR` defaults to `./config`. Every file is optional; missing sections fall
/// back to their serde defaults.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));
    load_config_from(&config_dir)
}

/// Same as [`load_config`] but reads the files from an explicit directory.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!(
        "Loading config: default={}, env={}",
        default_path.display(),
        env_path.display()
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    builder.build()?.try_deserialize()
}

/// Parses configuration from an in-memory TOML document. Used by tests and tools that
/// embed their settings.
pub fn load_config_from_toml(source: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(source, FileFormat::Toml))
        .build()?
        .try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file name comes from `DOTENV_OVERRIDE`, else from the first command line argument
/// when it starts with `.env`, else `.env`. Loading happens at most once per process.
///
/// Returns the path that was (or would have been) loaded.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_schedule_defaults() {
        let config = load_config_from_toml(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8086
            "#,
        )
        .expect("minimal config should parse");

        assert_eq!(config.server.port, 8086);
        assert_eq!(config.schedule.office_hours.start_hour, 9);
        assert_eq!(config.schedule.office_hours.end_hour, 23);
        assert_eq!(config.schedule.office_hours.step_minutes, 30);
        assert_eq!(config.schedule.page_size, 9);
        assert_eq!(config.schedule.submit_delay_ms, 450);
        assert_eq!(config.schedule.input_mode, InputModeConfig::SlotGrid);
        assert!(!config.schedule.auto_select_first_available);
        assert!(config.schedule.seed_demo_bookings);
        assert_eq!(config.schedule.session_idle_ttl_secs, 1800);
        assert_eq!(config.schedule.session_sweep_secs, 60);
        assert!(config.schedule.booked.is_none());
        assert!(config.site.is_none());
    }

    #[test]
    fn test_schedule_section_overrides() {
        let config = load_config_from_toml(
            r#"
            [server]
            host = "0.0.0.0"
            port = 80

            [site]
            static_dir = "dist"

            [schedule]
            page_size = 12
            input_mode = "date_time_picker"
            auto_select_first_available = true
            seed_demo_bookings = false
            session_idle_ttl_secs = 0

            [schedule.office_hours]
            start_hour = 8
            end_hour = 17
            step_minutes = 15

            [schedule.booked]
            "2025-05-05" = ["09:00", "10:30"]
            "#,
        )
        .expect("full config should parse");

        let schedule = &config.schedule;
        assert_eq!(schedule.page_size, 12);
        assert_eq!(schedule.input_mode, InputModeConfig::DateTimePicker);
        assert!(schedule.auto_select_first_available);
        assert!(!schedule.seed_demo_bookings);
        assert_eq!(schedule.session_idle_ttl_secs, 0);
        assert_eq!(schedule.session_sweep_secs, 60);
        assert_eq!(schedule.office_hours.start_hour, 8);
        assert_eq!(schedule.office_hours.step_minutes, 15);
        let booked = schedule.booked.as_ref().expect("booked table");
        assert_eq!(booked["2025-05-05"], vec!["09:00", "10:30"]);
        assert_eq!(config.site.unwrap().static_dir, "dist");
    }

    #[test]
    fn test_missing_server_section_is_an_error() {
        assert!(load_config_from_toml("[schedule]\npage_size = 3\n").is_err());
    }
}
