use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the cost estimator
#[derive(Clone, Debug, PartialEq)]
pub struct EstimatorConfig {
    /// Region used when a request does not name one
    pub default_region: String,
    /// Estimation duration in months used when a request does not name one
    pub default_duration: u32,
    /// Upper bound for one pricing store round trip
    pub lookup_timeout: Duration,
    /// Optional JSON snapshot of pricing records
    pub pricing_file: Option<PathBuf>,
}

impl EstimatorConfig {
    pub fn with_pricing_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.pricing_file = Some(path.into());
        self
    }
}

impl FromEnv for EstimatorConfig {
    /// Reads from environment variables with sensible defaults:
    /// - ESTIMATOR_DEFAULT_REGION: defaults to us-east-1
    /// - ESTIMATOR_DEFAULT_DURATION: defaults to 12 (months, must be >= 1)
    /// - PRICING_LOOKUP_TIMEOUT_MS: defaults to 2000
    /// - PRICING_FILE: unset means built-in defaults only
    fn from_env() -> Result<Self, ConfigError> {
        let default_region = env_or_default("ESTIMATOR_DEFAULT_REGION", "us-east-1");
        if default_region.trim().is_empty() {
            return Err(ConfigError::ParseError {
                key: "ESTIMATOR_DEFAULT_REGION".to_string(),
                details: "region must not be empty".to_string(),
            });
        }

        let default_duration: u32 = env_parse("ESTIMATOR_DEFAULT_DURATION", 12)?;

        let timeout_ms: u64 = env_parse("PRICING_LOOKUP_TIMEOUT_MS", 2000)?;
        let pricing_file = env::var("PRICING_FILE")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            default_region,
            default_duration,
            lookup_timeout: Duration::from_millis(timeout_ms),
            pricing_file,
        })
    }
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_region: "us-east-1".to_string(),
            default_duration: 12,
            lookup_timeout: Duration::from_millis(2000),
            pricing_file: None,
        }
    }
}
