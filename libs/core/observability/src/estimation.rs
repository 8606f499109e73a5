//! Estimation-specific metrics.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

/// Estimation metrics recorder
pub struct EstimationMetrics;

impl EstimationMetrics {
    /// Record a completed calculation
    pub fn record_calculation(
        duration: Duration,
        monthly_cost_cents: i64,
        recommendations: usize,
        pricing_fallbacks: usize,
    ) {
        counter!("estimations_total", "outcome" => "success").increment(1);
        histogram!("estimation_duration_seconds").record(duration.as_secs_f64());
        gauge!("estimation_monthly_cost_usd").set(monthly_cost_cents as f64 / 100.0);
        counter!("estimation_recommendations_total").increment(recommendations as u64);
        Self::record_pricing_fallbacks(pricing_fallbacks);

        tracing::debug!(
            duration_ms = duration.as_millis() as u64,
            monthly_cost_cents,
            recommendations,
            pricing_fallbacks,
            "Recorded calculation metrics"
        );
    }

    /// Record a completed comparison
    pub fn record_comparison(configurations: usize, duration: Duration) {
        counter!("comparisons_total", "outcome" => "success").increment(1);
        histogram!("comparison_duration_seconds").record(duration.as_secs_f64());

        tracing::debug!(
            configurations,
            duration_ms = duration.as_millis() as u64,
            "Recorded comparison metrics"
        );
    }

    /// Record rates that fell back to built-in defaults
    pub fn record_pricing_fallbacks(count: usize) {
        if count > 0 {
            counter!("pricing_fallbacks_total").increment(count as u64);
        }
    }

    /// Record a request rejected with a domain error code
    pub fn record_rejected(operation: &str, code: &str) {
        counter!(
            "estimation_requests_rejected_total",
            "operation" => operation.to_string(),
            "code" => code.to_string()
        )
        .increment(1);
        let total = match operation {
            "compare" => "comparisons_total",
            _ => "estimations_total",
        };
        counter!(total, "outcome" => "rejected").increment(1);
    }
}
