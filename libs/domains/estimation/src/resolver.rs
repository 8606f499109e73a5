//! Pricing resolution with guaranteed fallback.
//!
//! ```text
//! RequirementSet ──► prefetch ──► PricingStore::get_many (one round trip, bounded)
//!                       │
//!                       ▼
//!                  PriceSheet ──► calculators (pure, synchronous)
//! ```
//!
//! A store miss, a store error and a timeout all end the same way: the price comes from
//! [`PricingDefaults`]. Nothing in this module returns an error.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::defaults::{FixedRates, PricingDefaults};
use crate::models::{PriceKey, PricingRecord, RateUnit, RequirementSet};
use crate::repository::PricingStore;

/// Upper bound for a single store round trip
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

/// Resolves (service, type key, region) to a unit price
pub struct PricingResolver<S: PricingStore> {
    store: Arc<S>,
    defaults: Arc<PricingDefaults>,
    lookup_timeout: Duration,
}

impl<S: PricingStore> Clone for PricingResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            defaults: Arc::clone(&self.defaults),
            lookup_timeout: self.lookup_timeout,
        }
    }
}

impl<S: PricingStore> PricingResolver<S> {
    pub fn new(store: S) -> Self {
        Self::with_defaults(store, PricingDefaults::default())
    }

    pub fn with_defaults(store: S, defaults: PricingDefaults) -> Self {
        Self::from_shared(Arc::new(store), Arc::new(defaults))
    }

    pub fn from_shared(store: Arc<S>, defaults: Arc<PricingDefaults>) -> Self {
        Self {
            store,
            defaults,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, lookup_timeout: Duration) -> Self {
        self.lookup_timeout = lookup_timeout;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn defaults(&self) -> &PricingDefaults {
        &self.defaults
    }

    pub fn lookup_timeout(&self) -> Duration {
        self.lookup_timeout
    }

    /// Fetch one record. Store errors and timeouts are logged and reported as `None`.
    pub async fn lookup(
        &self,
        service: &str,
        type_key: &str,
        region: &str,
    ) -> Option<PricingRecord> {
        match timeout(self.lookup_timeout, self.store.get(service, type_key, region)).await {
            Ok(Ok(record)) => record,
            Ok(Err(e)) => {
                warn!(
                    service,
                    type_key,
                    region,
                    error = %e,
                    "Pricing lookup failed, using default"
                );
                None
            }
            Err(_) => {
                warn!(
                    service,
                    type_key,
                    region,
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Pricing lookup timed out, using default"
                );
                None
            }
        }
    }

    /// Unit price for the key. Never fails.
    pub async fn resolve(
        &self,
        service: &str,
        type_key: &str,
        region: &str,
        unit: RateUnit,
    ) -> f64 {
        match self.lookup(service, type_key, region).await.and_then(|r| r.rate(unit)) {
            Some(price) => price,
            None => {
                debug!(service, type_key, region, %unit, "No stored price, using default");
                self.defaults.rate(service, type_key, unit)
            }
        }
    }

    /// Resolve every price a requirement set needs in one store round trip.
    pub async fn prefetch(&self, requirements: &RequirementSet, region: &str) -> PriceSheet {
        let wanted = required_rates(requirements);
        if wanted.is_empty() {
            return PriceSheet::from_defaults(Arc::clone(&self.defaults), region);
        }

        let keys: Vec<PriceKey> = wanted
            .iter()
            .map(|(service, type_key, _)| PriceKey::new(service, type_key, region))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let records = match timeout(self.lookup_timeout, self.store.get_many(&keys)).await {
            Ok(Ok(records)) => records,
            Ok(Err(e)) => {
                warn!(
                    region,
                    keys = keys.len(),
                    error = %e,
                    "Batch pricing lookup failed, using defaults"
                );
                Vec::new()
            }
            Err(_) => {
                warn!(
                    region,
                    keys = keys.len(),
                    timeout_ms = self.lookup_timeout.as_millis() as u64,
                    "Batch pricing lookup timed out, using defaults"
                );
                Vec::new()
            }
        };

        let records: HashMap<PriceKey, PricingRecord> =
            records.into_iter().map(|r| (r.key(), r)).collect();

        let mut rates = HashMap::with_capacity(wanted.len());
        let mut fallback_count = 0;
        for (service, type_key, unit) in wanted {
            let key = PriceKey::new(&service, &type_key, region);
            let price = match records.get(&key).and_then(|r| r.rate(unit)) {
                Some(price) => price,
                None => {
                    debug!(%key, %unit, "No stored price, using default");
                    fallback_count += 1;
                    self.defaults.rate(&service, &type_key, unit)
                }
            };
            rates.insert((service, type_key, unit), price);
        }

        debug!(
            region,
            resolved = rates.len(),
            fallbacks = fallback_count,
            "Prefetched prices"
        );

        PriceSheet {
            region: region.to_string(),
            rates,
            defaults: Arc::clone(&self.defaults),
            fallback_count,
        }
    }
}

/// Distinct (service, type key, unit) triples needed to price a requirement set
fn required_rates(requirements: &RequirementSet) -> BTreeSet<(String, String, RateUnit)> {
    let compute = requirements
        .compute
        .iter()
        .map(|c| (c.service.clone(), c.instance_type.clone(), RateUnit::Hourly));
    let storage = requirements
        .storage
        .iter()
        .map(|s| (s.service.clone(), s.storage_type.clone(), RateUnit::PerGb));
    let database = requirements
        .database
        .iter()
        .map(|d| (d.service.clone(), d.instance_type.clone(), RateUnit::Hourly));

    compute.chain(storage).chain(database).collect()
}

/// In-memory snapshot of resolved prices for one region
#[derive(Debug, Clone)]
pub struct PriceSheet {
    region: String,
    rates: HashMap<(String, String, RateUnit), f64>,
    defaults: Arc<PricingDefaults>,
    fallback_count: usize,
}

impl PriceSheet {
    /// Sheet that prices everything from the default tables
    pub fn from_defaults(defaults: Arc<PricingDefaults>, region: &str) -> Self {
        Self {
            region: region.to_string(),
            rates: HashMap::new(),
            defaults,
            fallback_count: 0,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn rate(&self, service: &str, type_key: &str, unit: RateUnit) -> f64 {
        self.rates
            .get(&(service.to_string(), type_key.to_string(), unit))
            .copied()
            .unwrap_or_else(|| self.defaults.rate(service, type_key, unit))
    }

    pub fn hourly(&self, service: &str, type_key: &str) -> f64 {
        self.rate(service, type_key, RateUnit::Hourly)
    }

    pub fn per_gb(&self, service: &str, type_key: &str) -> f64 {
        self.rate(service, type_key, RateUnit::PerGb)
    }

    pub fn fixed(&self) -> &FixedRates {
        &self.defaults.fixed
    }

    /// Number of prefetched prices that came from the default tables
    pub fn fallback_count(&self) -> usize {
        self.fallback_count
    }
}
