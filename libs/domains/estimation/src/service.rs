use std::sync::Arc;
use uuid::Uuid;

use crate::engine::CostEngine;
use crate::error::{EstimationError, EstimationResult};
use crate::models::{
    CalculateRequest, CompareRequest, ComparisonResult, Estimation, PricingFilter, PricingRecord,
};
use crate::repository::{EstimationRepository, PricingStore};

/// Service for cost estimations: wraps the engine and records every completed calculation
pub struct EstimationService<S: PricingStore, R: EstimationRepository> {
    engine: CostEngine<S>,
    repository: Arc<R>,
}

impl<S: PricingStore, R: EstimationRepository> Clone for EstimationService<S, R> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<S: PricingStore, R: EstimationRepository> EstimationService<S, R> {
    /// Create a new estimation service
    pub fn new(engine: CostEngine<S>, repository: R) -> Self {
        Self {
            engine,
            repository: Arc::new(repository),
        }
    }

    pub fn engine(&self) -> &CostEngine<S> {
        &self.engine
    }

    /// Calculate an estimation and persist it exactly once
    pub async fn calculate(&self, request: CalculateRequest) -> EstimationResult<Estimation> {
        let estimation = self.engine.calculate(request).await?;
        let saved = self.repository.save(estimation).await?;

        tracing::info!(estimation_id = %saved.id(), "Saved cost estimation");
        Ok(saved)
    }

    /// Compare configurations. Comparisons are never persisted.
    pub async fn compare(&self, request: CompareRequest) -> EstimationResult<ComparisonResult> {
        self.engine.compare(request).await
    }

    /// Get a stored estimation by ID
    pub async fn get_by_id(&self, id: Uuid) -> EstimationResult<Estimation> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| EstimationError::NotFound(id.to_string()))
    }

    /// Most recent estimations first
    pub async fn list_recent(&self, limit: usize) -> EstimationResult<Vec<Estimation>> {
        self.repository.list_recent(limit).await
    }

    /// Pricing records known to the store
    pub async fn pricing_data(
        &self,
        filter: PricingFilter,
    ) -> EstimationResult<Vec<PricingRecord>> {
        self.engine.resolver().store().list(filter).await
    }
}
