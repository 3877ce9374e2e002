//! Configuration validation

use std::time::Duration;

use super::core::FetchConfig;

/// Configuration validation result type
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid timeout value: {0}")]
    InvalidTimeout(String),

    #[error("Invalid configuration parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration conflict: {0}")]
    Conflict(String),
}

/// Configuration validation trait
pub trait Validator {
    /// Validates the configuration settings
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` describing the first problem found.
    fn validate(&self) -> ConfigResult<()>;
}

/// Common configuration validation utilities
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate timeout duration
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidTimeout` if the duration is zero or
    /// exceeds one hour.
    pub fn validate_timeout(timeout: Duration, name: &str) -> ConfigResult<()> {
        if timeout.is_zero() {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot be zero"
            )));
        }

        if timeout.as_secs() > 3600 {
            return Err(ConfigurationError::InvalidTimeout(format!(
                "{name} cannot exceed 1 hour"
            )));
        }

        Ok(())
    }
}

impl Validator for FetchConfig {
    fn validate(&self) -> ConfigResult<()> {
        ConfigValidator::validate_timeout(self.overall_timeout, "overall timeout")?;
        ConfigValidator::validate_timeout(self.stagger_delay, "stagger delay")?;

        if let Some(attempt_timeout) = self.attempt_timeout {
            ConfigValidator::validate_timeout(attempt_timeout, "attempt timeout")?;
            if self.stagger_delay > attempt_timeout {
                return Err(ConfigurationError::Conflict(format!(
                    "stagger delay ({} ms) exceeds attempt timeout ({} ms)",
                    self.stagger_delay.as_millis(),
                    attempt_timeout.as_millis()
                )));
            }
        }

        if let Some(keepalive) = self.tcp_keepalive {
            ConfigValidator::validate_timeout(keepalive, "tcp keepalive")?;
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigurationError::InvalidParameter(
                "user agent cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(FetchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_overall_timeout_rejected() {
        let config = FetchConfig::default().with_overall_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTimeout(_))
        ));
    }

    #[test]
    fn test_stagger_longer_than_attempt_timeout_conflicts() {
        let config = FetchConfig::default()
            .with_stagger_delay(Duration::from_secs(2))
            .with_attempt_timeout(Some(Duration::from_secs(1)));
        assert!(matches!(config.validate(), Err(ConfigurationError::Conflict(_))));
    }

    #[test]
    fn test_unbounded_attempts_skip_conflict_check() {
        let config = FetchConfig::default()
            .with_stagger_delay(Duration::from_secs(2))
            .with_attempt_timeout(None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_user_agent_rejected() {
        let config = FetchConfig::default().with_user_agent("  ");
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidParameter(_))
        ));
    }
}
