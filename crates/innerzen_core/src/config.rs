use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::calendar::Calendar;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InnerZenConfig {
    pub engagement: EngagementConfig,
    pub journal: JournalConfig,
    pub calendar: CalendarConfig,
    pub storage: StorageConfig,
}

impl InnerZenConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: InnerZenConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if the file is missing or invalid, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("INNERZEN_DB_PATH") {
            self.storage.db_path = v;
        }
        if let Ok(v) = std::env::var("INNERZEN_NAMESPACE") {
            self.storage.namespace = v;
        }
        if let Ok(v) = std::env::var("INNERZEN_UTC_OFFSET_MINUTES") {
            if let Ok(n) = v.parse() {
                self.calendar.utc_offset_minutes = n;
            }
        }
        if let Ok(v) = std::env::var("INNERZEN_ANALYSIS_DELAY_MS") {
            if let Ok(n) = v.parse() {
                self.journal.analysis_delay_ms = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// How a read-only streak query treats a day with no entry yet.
    pub today_policy: TodayPolicy,
}

/// What a missing entry for *today* means to the streak walk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodayPolicy {
    /// Today is not over yet: skip it and start counting from yesterday.
    #[default]
    Skippable,
    /// No entry today means the streak is already broken.
    Breaking,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Minimum number of characters (after trimming) for an entry to be accepted.
    pub min_chars: usize,
    /// Simulated latency of the analysis step.
    pub analysis_delay_ms: u64,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            min_chars: 10,
            analysis_delay_ms: 2000,
        }
    }
}

impl JournalConfig {
    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub utc_offset_minutes: i32,
}

impl CalendarConfig {
    pub fn calendar(&self) -> Calendar {
        Calendar::with_offset_minutes(self.utc_offset_minutes)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Key prefix shared by every persisted value.
    pub namespace: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "innerzen.db".to_string(),
            namespace: "innerzen".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
