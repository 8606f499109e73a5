//! In-memory implementations of the store and repository traits.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EstimationError, EstimationResult};
use crate::models::{Estimation, PriceKey, PricingFilter, PricingRecord};
use crate::repository::{EstimationRepository, PricingStore};

/// Pricing store backed by a map, usually loaded from a JSON snapshot
#[derive(Debug, Default)]
pub struct InMemoryPricingStore {
    records: RwLock<HashMap<PriceKey, PricingRecord>>,
}

impl InMemoryPricingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records replace earlier ones with the same key
    pub fn from_records(records: impl IntoIterator<Item = PricingRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.key(), r)).collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Parse a JSON array of pricing records
    pub fn from_json(json: &str) -> EstimationResult<Self> {
        let records: Vec<PricingRecord> = serde_json::from_str(json)
            .map_err(|e| {
                EstimationError::PricingStore(format!("invalid pricing snapshot: {}", e))
            })?;
        Ok(Self::from_records(records))
    }

    pub async fn insert(&self, record: PricingRecord) {
        self.records.write().await.insert(record.key(), record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl PricingStore for InMemoryPricingStore {
    async fn get(
        &self,
        service: &str,
        type_key: &str,
        region: &str,
    ) -> EstimationResult<Option<PricingRecord>> {
        let key = PriceKey::new(service, type_key, region);
        Ok(self.records.read().await.get(&key).cloned())
    }

    async fn get_many(&self, keys: &[PriceKey]) -> EstimationResult<Vec<PricingRecord>> {
        let records = self.records.read().await;
        Ok(keys.iter().filter_map(|k| records.get(k).cloned()).collect())
    }

    async fn list(&self, filter: PricingFilter) -> EstimationResult<Vec<PricingRecord>> {
        let mut records: Vec<PricingRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.key().cmp(&b.key()));
        Ok(records)
    }
}

/// Estimation repository that keeps records for the lifetime of the process
#[derive(Debug, Default)]
pub struct InMemoryEstimationRepository {
    estimations: RwLock<Vec<Estimation>>,
}

impl InMemoryEstimationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn count(&self) -> usize {
        self.estimations.read().await.len()
    }
}

#[async_trait]
impl EstimationRepository for InMemoryEstimationRepository {
    async fn save(&self, estimation: Estimation) -> EstimationResult<Estimation> {
        let mut estimations = self.estimations.write().await;
        if estimations.iter().any(|e| e.id() == estimation.id()) {
            return Err(EstimationError::Repository(format!(
                "estimation {} already exists",
                estimation.id()
            )));
        }
        estimations.push(estimation.clone());
        Ok(estimation)
    }

    async fn get_by_id(&self, id: Uuid) -> EstimationResult<Option<Estimation>> {
        Ok(self
            .estimations
            .read()
            .await
            .iter()
            .find(|e| e.id() == id)
            .cloned())
    }

    async fn list_recent(&self, limit: usize) -> EstimationResult<Vec<Estimation>> {
        let mut estimations = self.estimations.read().await.clone();
        estimations.sort_by_key(|e| std::cmp::Reverse(e.created_at()));
        estimations.truncate(limit);
        Ok(estimations)
    }
}
