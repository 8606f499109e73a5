use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::aggregator::aggregate;
use crate::calculator::{compute_costs, database_costs, network_costs, storage_costs};
use crate::error::{EstimationError, EstimationResult};
use crate::models::{CalculateRequest, CostEstimate, Estimation, RequirementSet};
use crate::recommendations::RecommendationRules;
use crate::repository::PricingStore;
use crate::resolver::{PriceSheet, PricingResolver};

/// Stateless calculation pipeline: resolve prices, price each category,
/// aggregate, then apply recommendation rules.
pub struct CostEngine<S: PricingStore> {
    resolver: PricingResolver<S>,
    rules: Arc<RecommendationRules>,
}

impl<S: PricingStore> Clone for CostEngine<S> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<S: PricingStore> CostEngine<S> {
    pub fn new(resolver: PricingResolver<S>) -> Self {
        Self {
            resolver,
            rules: Arc::new(RecommendationRules::default()),
        }
    }

    pub fn with_rules(mut self, rules: RecommendationRules) -> Self {
        self.rules = Arc::new(rules);
        self
    }

    pub fn resolver(&self) -> &PricingResolver<S> {
        &self.resolver
    }

    pub fn rules(&self) -> &RecommendationRules {
        &self.rules
    }

    /// Price a requirement set against an already resolved price sheet
    pub fn price(&self, requirements: &RequirementSet, prices: &PriceSheet) -> CostEstimate {
        let summary = aggregate(
            compute_costs(&requirements.compute, prices),
            storage_costs(&requirements.storage, prices),
            database_costs(&requirements.database, prices),
            network_costs(&requirements.network, prices.fixed()),
        );
        let recommendations = self.rules.recommend(&summary.breakdown);

        CostEstimate {
            total_monthly_cost: summary.total_monthly_cost,
            total_annual_cost: summary.total_annual_cost,
            cost_breakdown: summary.breakdown,
            recommendations,
            pricing_fallbacks: prices.fallback_count(),
        }
    }

    /// Calculate-only path: no validation, no persistence
    pub async fn estimate(&self, requirements: &RequirementSet, region: &str) -> CostEstimate {
        let prices = self.resolver.prefetch(requirements, region).await;
        self.price(requirements, &prices)
    }

    /// Validate a request and produce an immutable estimation record
    #[instrument(skip_all, fields(region = %request.region, duration = request.duration))]
    pub async fn calculate(&self, request: CalculateRequest) -> EstimationResult<Estimation> {
        if request.requirements.is_none() {
            return Err(EstimationError::Validation(
                "Infrastructure requirements are required".to_string(),
            ));
        }
        request.validate()?;

        let CalculateRequest {
            requirements,
            region,
            duration,
        } = request;
        let requirements = requirements.unwrap_or_default();

        let estimate = self.estimate(&requirements, &region).await;
        let estimation = Estimation::new(requirements, region, duration, estimate);

        info!(
            estimation_id = %estimation.id(),
            total_monthly_cost = %estimation.total_monthly_cost(),
            recommendations = estimation.recommendations().len(),
            pricing_fallbacks = estimation.pricing_fallbacks(),
            "Cost calculation completed"
        );

        Ok(estimation)
    }
}
