//! Serialisable fetch options
//!
//! The outer configuration surface: two switches and an overall timeout, plus
//! optional racer tuning. Field names follow the camelCase wire form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::core::FetchConfig;
use super::core::defaults::DEFAULT_OVERALL_TIMEOUT;
use super::validation::{ConfigResult, ConfigurationError, Validator};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchOptions {
    pub race_enabled: bool,
    #[serde(rename = "preferIPv4")]
    pub prefer_ipv4: bool,
    pub overall_timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stagger_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            race_enabled: false,
            prefer_ipv4: false,
            overall_timeout_ms: u64::try_from(DEFAULT_OVERALL_TIMEOUT.as_millis()).unwrap_or(10_000),
            stagger_delay_ms: None,
            attempt_timeout_ms: None,
        }
    }
}

impl FetchOptions {
    /// Parse options from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidParameter` if the JSON is malformed.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ConfigurationError::InvalidParameter(format!("invalid options JSON: {e}")))
    }

    /// Apply these options on top of `base` and validate the result.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the merged configuration.
    pub fn apply_to(&self, base: FetchConfig) -> ConfigResult<FetchConfig> {
        let mut config = base
            .with_race(self.race_enabled)
            .with_prefer_ipv4(self.prefer_ipv4)
            .with_overall_timeout(Duration::from_millis(self.overall_timeout_ms));

        if let Some(ms) = self.stagger_delay_ms {
            config = config.with_stagger_delay(Duration::from_millis(ms));
        }
        if let Some(ms) = self.attempt_timeout_ms {
            config = config.with_attempt_timeout(Some(Duration::from_millis(ms)));
        }

        config.validate()?;
        Ok(config)
    }

    /// Convert into a validated configuration with default tuning.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the resulting configuration.
    pub fn into_config(self) -> ConfigResult<FetchConfig> {
        self.apply_to(FetchConfig::default())
    }
}
