use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EstimationResult;
use crate::models::{Estimation, PriceKey, PricingFilter, PricingRecord};

/// External source of pricing records.
///
/// Implementations may fail; the resolver turns every failure into a default price,
/// so callers of the engine never see these errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PricingStore: Send + Sync {
    /// Get the record for one (service, type key, region) triple
    async fn get(
        &self,
        service: &str,
        type_key: &str,
        region: &str,
    ) -> EstimationResult<Option<PricingRecord>>;

    /// Get all records for the given keys in one round trip. Missing keys are omitted.
    async fn get_many(&self, keys: &[PriceKey]) -> EstimationResult<Vec<PricingRecord>> {
        let mut records = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = self.get(&key.service, &key.type_key, &key.region).await? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// List records matching a filter
    async fn list(&self, filter: PricingFilter) -> EstimationResult<Vec<PricingRecord>>;
}

/// Persistence boundary for completed estimations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EstimationRepository: Send + Sync {
    /// Store a completed estimation
    async fn save(&self, estimation: Estimation) -> EstimationResult<Estimation>;

    /// Get an estimation by ID
    async fn get_by_id(&self, id: Uuid) -> EstimationResult<Option<Estimation>>;

    /// Most recent estimations first
    async fn list_recent(&self, limit: usize) -> EstimationResult<Vec<Estimation>>;
}
