// File: ./src/config.rs
// Handles engine configuration loading, saving, and defaults.
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

fn default_timezone() -> String {
    "America/New_York".to_string()
}

fn default_true() -> bool {
    true
}

fn default_window_days() -> u32 {
    35
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// IANA zone all calendar-day arithmetic happens in. Listings must
    /// agree with the locale events are displayed in, so "today" and
    /// weekday math never use UTC day boundaries.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Gates the sparse-expansion auditor at the pipeline level.
    #[serde(default = "default_true")]
    pub audit_expansions: bool,

    /// Window length used when a caller asks for "the upcoming dates"
    /// without explicit bounds.
    #[serde(default = "default_window_days")]
    pub default_window_days: u32,

    /// Hard cap on occurrences per expansion, if any.
    #[serde(default)]
    pub max_occurrences: Option<u32>,

    /// Whether listings keep cancelled dates (shown with a toggle) or drop
    /// them outright.
    #[serde(default = "default_true")]
    pub include_cancelled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            audit_expansions: true,
            default_window_days: 35,
            max_occurrences: None,
            include_cancelled: true,
        }
    }
}

impl EngineConfig {
    /// Load the configuration from a TOML file.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;
        let config: EngineConfig = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str).map_err(|e| {
            anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e)
        })?;
        Ok(())
    }

    /// Resolves the configured zone name.
    pub fn tz(&self) -> Result<Tz> {
        Tz::from_str(&self.timezone)
            .map_err(|_| anyhow::anyhow!("Unknown timezone '{}' in config", self.timezone))
    }

    /// Civil date for an injected instant. The reference instant is always
    /// passed in by the caller; the engine itself never reads a clock, so
    /// every computation stays reproducible in tests.
    pub fn civil_date(&self, instant: DateTime<Utc>) -> Result<NaiveDate> {
        Ok(instant.with_timezone(&self.tz()?).date_naive())
    }
}
