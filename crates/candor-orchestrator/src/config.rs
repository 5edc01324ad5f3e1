//! Configuration for the Orchestrator

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum wall-clock time for a single model call (seconds)
    ///
    /// A timeout counts against the spec's retry budget like a validation
    /// failure.
    pub call_timeout_secs: u64,

    /// Fixed delay between retry attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Maximum assembled prompt length (characters)
    pub max_prompt_chars: usize,
}

impl OrchestratorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the retry delay as a Duration
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.max_prompt_chars == 0 {
            return Err("max_prompt_chars must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Patient preset: longer timeouts for slow models or long documents
    pub fn patient() -> Self {
        Self {
            call_timeout_secs: 300,
            retry_delay_ms: 2_000,
            max_prompt_chars: 200_000,
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for OrchestratorConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            call_timeout_secs: 90,
            retry_delay_ms: 1_000,
            max_prompt_chars: 120_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(OrchestratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_patient_config_is_valid() {
        assert!(OrchestratorConfig::patient().validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_is_invalid() {
        let mut config = OrchestratorConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OrchestratorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = OrchestratorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.call_timeout_secs, parsed.call_timeout_secs);
        assert_eq!(config.retry_delay_ms, parsed.retry_delay_ms);
        assert_eq!(config.max_prompt_chars, parsed.max_prompt_chars);
    }
}
