//! Command implementations. Each returns the JSON document printed on stdout.

use core_config::EstimatorConfig;
use domain_estimation::{
    CalculateRequest, CompareRequest, ConfigurationInput, CostEngine, EstimationService,
    InMemoryEstimationRepository, InMemoryPricingStore, PricingDefaults, PricingFilter,
    PricingResolver, RecommendationRules, RequirementSet,
};
use eyre::{Result, WrapErr};
use observability::EstimationMetrics;
use serde::Deserialize;
use serde_json::{Value, json};
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub type Estimator = EstimationService<InMemoryPricingStore, InMemoryEstimationRepository>;

/// Body of a calculate input file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateInput {
    #[serde(default)]
    pub requirements: Option<RequirementSet>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
}

/// Body of a compare input file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareInput {
    #[serde(default)]
    pub configurations: Vec<ConfigurationInput>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Build the service, loading the pricing snapshot when one is configured
pub async fn build_service(config: &EstimatorConfig) -> Result<Estimator> {
    let store = match &config.pricing_file {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .wrap_err_with(|| format!("Failed to read pricing file {}", path.display()))?;
            let store = InMemoryPricingStore::from_json(&json)
                .wrap_err_with(|| format!("Failed to load pricing file {}", path.display()))?;
            info!(path = %path.display(), records = store.len().await, "Loaded pricing snapshot");
            store
        }
        None => InMemoryPricingStore::new(),
    };

    let resolver = PricingResolver::new(store).with_timeout(config.lookup_timeout);
    Ok(EstimationService::new(
        CostEngine::new(resolver),
        InMemoryEstimationRepository::new(),
    ))
}

/// Read a file, or stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .wrap_err("Failed to read input from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read {}", path.display()))
}

pub async fn calculate(
    service: &Estimator,
    config: &EstimatorConfig,
    input: &str,
    region: Option<String>,
    duration: Option<u32>,
) -> Result<Value> {
    let input: CalculateInput =
        serde_json::from_str(input).wrap_err("Calculate input is not valid JSON")?;

    let request = CalculateRequest {
        requirements: input.requirements,
        region: region
            .or(input.region)
            .unwrap_or_else(|| config.default_region.clone()),
        duration: duration.or(input.duration).unwrap_or(config.default_duration),
    };

    let started = Instant::now();
    let estimation = match service.calculate(request).await {
        Ok(estimation) => estimation,
        Err(e) => {
            EstimationMetrics::record_rejected("calculate", e.code());
            return Err(e).wrap_err("Cost calculation failed");
        }
    };
    EstimationMetrics::record_calculation(
        started.elapsed(),
        estimation.total_monthly_cost().cents(),
        estimation.recommendations().len(),
        estimation.pricing_fallbacks(),
    );

    Ok(serde_json::to_value(&estimation)?)
}

pub async fn compare(
    service: &Estimator,
    config: &EstimatorConfig,
    input: &str,
    region: Option<String>,
) -> Result<Value> {
    let input: CompareInput =
        serde_json::from_str(input).wrap_err("Compare input is not valid JSON")?;
    let configurations = input.configurations.len();

    let request = CompareRequest::new(input.configurations).with_region(
        region
            .or(input.region)
            .unwrap_or_else(|| config.default_region.clone()),
    );

    let started = Instant::now();
    let result = match service.compare(request).await {
        Ok(result) => result,
        Err(e) => {
            EstimationMetrics::record_rejected("compare", e.code());
            return Err(e).wrap_err("Configuration comparison failed");
        }
    };
    EstimationMetrics::record_comparison(configurations, started.elapsed());

    Ok(serde_json::to_value(&result)?)
}

/// Built-in price tables and recommendation rules
pub fn defaults() -> Result<Value> {
    Ok(json!({
        "pricing": serde_json::to_value(PricingDefaults::default())?,
        "recommendationRules": serde_json::to_value(RecommendationRules::default())?,
    }))
}

pub async fn pricing(service: &Estimator, filter: PricingFilter) -> Result<Value> {
    let records = service
        .pricing_data(filter)
        .await
        .wrap_err("Failed to list pricing data")?;
    Ok(serde_json::to_value(records)?)
}
