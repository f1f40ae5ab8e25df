//! Configuration types and loading

use serde::{Deserialize, Serialize};

use crate::error::TsError;
use crate::pagination::DEFAULT_PAGE_SIZE;

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Workflow engine settings
    pub engine: EngineConfig,

    /// Log output settings
    pub logging: LoggingConfig,
}

/// How individual approver decisions combine into a timesheet outcome
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusRule {
    /// Approved once every approver approved; rejected on the first rejection
    #[default]
    Unanimous,
    /// The first recorded decision settles the timesheet
    FirstDecisionWins,
}

impl ConsensusRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusRule::Unanimous => "unanimous",
            ConsensusRule::FirstDecisionWins => "first_decision_wins",
        }
    }
}

impl std::str::FromStr for ConsensusRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "unanimous" | "all" => Ok(ConsensusRule::Unanimous),
            "first_decision_wins" | "first" => Ok(ConsensusRule::FirstDecisionWins),
            other => Err(ConfigError::InvalidValue {
                key: "TSA_CONSENSUS".to_string(),
                message: format!("unknown consensus rule '{}'", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Items per page in filtered views
    pub page_size: usize,
    pub consensus: ConsensusRule,
    /// Wire value meaning "no reason given"
    pub reason_sentinel: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            consensus: ConsensusRule::default(),
            reason_sentinel: "NA".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive string
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl From<ConfigError> for TsError {
    fn from(err: ConfigError) -> Self {
        TsError::Config(err.to_string())
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let parse_bool = |v: String| v == "true" || v == "1" || v == "yes";

        // Engine
        if let Some(size) = lookup("TSA_PAGE_SIZE") {
            let page_size: usize = size.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "TSA_PAGE_SIZE".to_string(),
                message: format!("'{}' is not a positive integer", size),
            })?;
            if page_size == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "TSA_PAGE_SIZE".to_string(),
                    message: "must be at least 1".to_string(),
                });
            }
            config.engine.page_size = page_size;
        }
        if let Some(rule) = lookup("TSA_CONSENSUS") {
            config.engine.consensus = rule.parse()?;
        }
        if let Some(sentinel) = lookup("TSA_REASON_SENTINEL") {
            config.engine.reason_sentinel = sentinel;
        }

        // Logging
        if let Some(filter) = lookup("TSA_LOG").or_else(|| lookup("RUST_LOG")) {
            config.logging.filter = filter;
        }
        if let Some(v) = lookup("TSA_LOG_JSON") {
            config.logging.json = parse_bool(v);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.engine.page_size, 5);
        assert_eq!(config.engine.consensus, ConsensusRule::Unanimous);
        assert_eq!(config.engine.reason_sentinel, "NA");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("TSA_PAGE_SIZE", "10"),
            ("TSA_CONSENSUS", "first-decision-wins"),
            ("TSA_LOG", "debug"),
            ("TSA_LOG_JSON", "1"),
        ]))
        .unwrap();

        assert_eq!(config.engine.page_size, 10);
        assert_eq!(config.engine.consensus, ConsensusRule::FirstDecisionWins);
        assert_eq!(config.logging.filter, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        let err = AppConfig::from_lookup(lookup_from(&[("TSA_PAGE_SIZE", "zero")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("TSA_PAGE_SIZE", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = AppConfig::from_lookup(lookup_from(&[("TSA_CONSENSUS", "majority")])).unwrap_err();
        assert_eq!(TsError::from(err).error_code(), "configuration_error");
    }
}
