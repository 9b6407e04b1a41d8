//! Tracker settings.
//!
//! Defaults reproduce the shipped app. A JSON file can override any subset.

use std::time::Duration;

use otobus_transit::TravelMode;
use otobus_transit::provider::great_circle::MIN_LEG_LENGTH;
use serde::Deserialize;

use crate::region::MapRegion;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Time between simulated position updates
    pub tick_interval_ms: u64,
    pub travel_mode: TravelMode,
    /// Longest leg the offline route provider produces
    pub max_leg_length_m: f64,
    /// City store file, relative to the app's data directory
    pub database_file: String,
    /// Region shown before a route is known
    pub initial_region: MapRegion,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 5_000,
            travel_mode: TravelMode::Automobile,
            max_leg_length_m: 10_000.0,
            database_file: "cities.sqlite".into(),
            initial_region: MapRegion::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }

        if !(self.max_leg_length_m.is_finite() && self.max_leg_length_m >= MIN_LEG_LENGTH) {
            return Err(ConfigError::Invalid(format!(
                "max_leg_length_m must be at least {MIN_LEG_LENGTH}m, got {}",
                self.max_leg_length_m
            )));
        }

        if self.database_file.is_empty() {
            return Err(ConfigError::Invalid("database_file must not be empty".into()));
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
