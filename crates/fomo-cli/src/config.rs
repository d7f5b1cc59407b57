use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use fomo_core::models::{default_groups, NewGroupData};
use fomo_core::ordering::{SortCriterion, DEFAULT_SPOTLIGHT_SIZE};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const DEFAULT_DATABASE_PATH: &str = "fomo.db";

/// Settings read from `config.toml` and `FOMO_*` environment variables.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    pub database_path: String,
    /// Criterion used when `--sort` is not given
    pub default_sort: SortCriterion,
    /// IANA timezone in which recurrence offsets and end dates are evaluated
    pub timezone: String,
    /// Number of tasks in the board spotlight
    pub spotlight_size: usize,
    /// Groups created at startup when missing; these cannot be deleted
    pub default_groups: Vec<NewGroupData>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            default_sort: SortCriterion::default(),
            timezone: detect_system_timezone(),
            spotlight_size: DEFAULT_SPOTLIGHT_SIZE,
            default_groups: default_groups(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("FOMO_"))
            .extract()
    }
}

/// Validates that a timezone string is a valid IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<Tz, String> {
    Tz::from_str(timezone).map_err(|_| {
        format!(
            "Invalid timezone: '{}'. Use IANA timezone names like 'Europe/Warsaw'",
            timezone
        )
    })
}

/// Detects the system timezone, falling back to UTC if detection fails
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if validate_timezone(&tz).is_ok() {
            return tz;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(tz) = std::fs::read_to_string("/etc/timezone") {
            let tz = tz.trim();
            if validate_timezone(tz).is_ok() {
                return tz.to_string();
            }
        }
    }

    if let Ok(local_tz) = iana_time_zone::get_timezone() {
        if validate_timezone(&local_tz).is_ok() {
            return local_tz;
        }
    }

    "UTC".to_string()
}
