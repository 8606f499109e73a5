//! Compiled-in fallback pricing.
//!
//! These values are part of the output contract: an estimate resolved entirely from
//! defaults must produce the same numbers downstream reports were built against.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::RateUnit;

/// Hourly price used when neither the store nor the table knows the key
pub const FALLBACK_HOURLY: f64 = 0.05;

/// Per-GB price used when neither the store nor the table knows the key
pub const FALLBACK_PER_GB: f64 = 0.023;

/// Rates applied directly by the calculators, never looked up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedRates {
    /// RDS storage, per GB-month
    pub database_storage_per_gb: f64,
    /// RDS backup storage, per GB-month
    pub database_backup_per_gb: f64,
    /// Billed hours per month for database instances
    pub database_instance_hours: f64,
    /// Data transfer out, per GB
    pub data_transfer_per_gb: f64,
    /// CloudFront, per GB
    pub cloud_front_per_gb: f64,
    /// Per request
    pub per_request: f64,
}

impl Default for FixedRates {
    fn default() -> Self {
        Self {
            database_storage_per_gb: 0.115,
            database_backup_per_gb: 0.095,
            database_instance_hours: 730.0,
            data_transfer_per_gb: 0.09,
            cloud_front_per_gb: 0.085,
            per_request: 0.000_000_4,
        }
    }
}

/// Immutable default price tables, keyed by service then type key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDefaults {
    pub hourly: HashMap<String, HashMap<String, f64>>,
    pub per_gb: HashMap<String, HashMap<String, f64>>,
    pub fallback_hourly: f64,
    pub fallback_per_gb: f64,
    pub fixed: FixedRates,
}

fn table(entries: Vec<(&str, Vec<(&str, f64)>)>) -> HashMap<String, HashMap<String, f64>> {
    entries
        .into_iter()
        .map(|(service, prices)| {
            let prices = prices
                .into_iter()
                .map(|(key, price)| (key.to_string(), price))
                .collect();
            (service.to_string(), prices)
        })
        .collect()
}

impl Default for PricingDefaults {
    fn default() -> Self {
        let hourly = table(vec![
            (
                "EC2",
                vec![
                    ("t3.micro", 0.0104),
                    ("t3.small", 0.0208),
                    ("t3.medium", 0.0416),
                    ("t3.large", 0.0832),
                    ("m5.large", 0.096),
                    ("m5.xlarge", 0.192),
                ],
            ),
            ("Lambda", vec![("default", 0.000_016_666_7)]),
            (
                "RDS",
                vec![
                    ("db.t3.micro", 0.017),
                    ("db.t3.small", 0.034),
                    ("db.m5.large", 0.192),
                ],
            ),
            // per million requests
            ("DynamoDB", vec![("on-demand", 1.25)]),
        ]);

        let per_gb = table(vec![
            (
                "S3",
                vec![("standard", 0.023), ("ia", 0.0125), ("glacier", 0.004)],
            ),
            ("EBS", vec![("gp3", 0.08), ("io2", 0.125)]),
        ]);

        Self {
            hourly,
            per_gb,
            fallback_hourly: FALLBACK_HOURLY,
            fallback_per_gb: FALLBACK_PER_GB,
            fixed: FixedRates::default(),
        }
    }
}

impl PricingDefaults {
    /// Defaults with empty tables: every lookup returns the catch-all price
    pub fn catch_all_only() -> Self {
        Self {
            hourly: HashMap::new(),
            per_gb: HashMap::new(),
            ..Self::default()
        }
    }

    /// Add or replace one table entry
    pub fn with_rate(mut self, unit: RateUnit, service: &str, type_key: &str, price: f64) -> Self {
        let table = match unit {
            RateUnit::Hourly => &mut self.hourly,
            RateUnit::PerGb => &mut self.per_gb,
        };
        table
            .entry(service.to_string())
            .or_default()
            .insert(type_key.to_string(), price);
        self
    }

    pub fn with_fixed_rates(mut self, fixed: FixedRates) -> Self {
        self.fixed = fixed;
        self
    }

    /// Table entry for the key, if any
    pub fn lookup(&self, service: &str, type_key: &str, unit: RateUnit) -> Option<f64> {
        let table = match unit {
            RateUnit::Hourly => &self.hourly,
            RateUnit::PerGb => &self.per_gb,
        };
        table.get(service).and_then(|prices| prices.get(type_key)).copied()
    }

    /// Table entry for the key, or the catch-all for the unit
    pub fn rate(&self, service: &str, type_key: &str, unit: RateUnit) -> f64 {
        self.lookup(service, type_key, unit).unwrap_or(match unit {
            RateUnit::Hourly => self.fallback_hourly,
            RateUnit::PerGb => self.fallback_per_gb,
        })
    }
}
