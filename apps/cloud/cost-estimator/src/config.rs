//! Configuration for the cost estimator

use core_config::{Environment, EstimatorConfig, FromEnv};
use eyre::{Result, WrapErr};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub estimator: EstimatorConfig,
}

impl Config {
    /// Load from the environment; `pricing_file` from the command line wins over `PRICING_FILE`
    pub fn load(pricing_file: Option<PathBuf>) -> Result<Self> {
        let mut estimator =
            EstimatorConfig::from_env().wrap_err("Invalid estimator configuration")?;
        if let Some(path) = pricing_file {
            estimator = estimator.with_pricing_file(path);
        }

        Ok(Self {
            environment: Environment::from_env(),
            estimator,
        })
    }
}
