//! Side-by-side pricing of several configurations.

use futures::future::join_all;
use tracing::{info, instrument};
use validator::Validate;

use crate::engine::CostEngine;
use crate::error::{EstimationError, EstimationResult};
use crate::models::{
    ComparisonInsights, ComparisonResult, CompareRequest, ConfigurationComparison,
    RequirementSet,
};
use crate::repository::PricingStore;

/// Fewest configurations a comparison accepts
pub const MIN_CONFIGURATIONS: usize = 2;

const MONTHS_PER_YEAR: i64 = 12;

impl<S: PricingStore> CostEngine<S> {
    /// Price every configuration and rank them by monthly cost.
    ///
    /// The request is rejected before any pricing work if it has fewer than
    /// [`MIN_CONFIGURATIONS`] entries or any entry is invalid. Nothing is persisted.
    #[instrument(
        skip_all,
        fields(region = %request.region, configurations = request.configurations.len())
    )]
    pub async fn compare(&self, request: CompareRequest) -> EstimationResult<ComparisonResult> {
        if request.configurations.len() < MIN_CONFIGURATIONS {
            return Err(EstimationError::Comparison(format!(
                "At least {} configurations required for comparison",
                MIN_CONFIGURATIONS
            )));
        }

        let CompareRequest {
            configurations,
            region,
        } = request;

        let mut named: Vec<(String, RequirementSet)> = Vec::with_capacity(configurations.len());
        for (index, config) in configurations.into_iter().enumerate() {
            config.validate()?;
            let name = config
                .name
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| format!("Configuration {}", index + 1));
            let requirements = config.requirements.ok_or_else(|| {
                EstimationError::Validation(format!(
                    "Infrastructure requirements are required for '{}'",
                    name
                ))
            })?;
            named.push((name, requirements));
        }

        let estimates = join_all(
            named
                .iter()
                .map(|(_, requirements)| self.estimate(requirements, &region)),
        )
        .await;

        let comparisons: Vec<ConfigurationComparison> = named
            .into_iter()
            .zip(estimates)
            .map(|((name, _), estimate)| ConfigurationComparison {
                name,
                total_monthly_cost: estimate.total_monthly_cost,
                total_annual_cost: estimate.total_annual_cost,
                cost_breakdown: estimate.cost_breakdown,
                recommendations: estimate.recommendations,
            })
            .collect();

        let insights = derive_insights(&comparisons).ok_or_else(|| {
            EstimationError::Internal("comparison produced no results".to_string())
        })?;

        info!(
            most_cost_effective = %insights.most_cost_effective,
            percentage_savings = insights.percentage_savings,
            "Configuration comparison completed"
        );

        Ok(ComparisonResult {
            recommended_configuration: insights.most_cost_effective.clone(),
            comparisons,
            insights,
        })
    }
}

/// Rank comparisons by monthly cost. Ties keep input order. `None` for an empty slice.
pub fn derive_insights(comparisons: &[ConfigurationComparison]) -> Option<ComparisonInsights> {
    let mut ranked: Vec<&ConfigurationComparison> = comparisons.iter().collect();
    ranked.sort_by_key(|c| c.total_monthly_cost);

    let cheapest = *ranked.first()?;
    let most_expensive = *ranked.last()?;

    let difference = most_expensive
        .total_monthly_cost
        .saturating_sub(cheapest.total_monthly_cost);
    let percentage_savings = if most_expensive.total_monthly_cost.is_zero() {
        0
    } else {
        (difference.cents() as f64 / most_expensive.total_monthly_cost.cents() as f64 * 100.0)
            .round() as i64
    };

    Some(ComparisonInsights {
        most_cost_effective: cheapest.name.clone(),
        most_expensive: most_expensive.name.clone(),
        monthly_savings: difference,
        annual_savings: difference.times(MONTHS_PER_YEAR),
        percentage_savings,
        summary: format!(
            "{} is {}% more cost-effective than {}",
            cheapest.name, percentage_savings, most_expensive.name
        ),
    })
}
