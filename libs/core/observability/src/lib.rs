//! Observability utilities for the cost estimator.
//!
//! This crate provides:
//! - Prometheus metrics recording and text export
//! - Estimation metrics for calculations, comparisons and pricing fallbacks
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, render_metrics, EstimationMetrics};
//!
//! init_metrics();
//! EstimationMetrics::record_calculation(elapsed, 15684, 0, 2);
//! println!("{}", render_metrics());
//! ```

pub mod estimation;

pub use estimation::EstimationMetrics;

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::{info, warn};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Safe to call more than once; the first call installs the recorder.
/// Returns the PrometheusHandle for rendering metrics.
pub fn init_metrics() -> &'static PrometheusHandle {
    METRICS_HANDLE.get_or_init(|| {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        match metrics::set_global_recorder(recorder) {
            Ok(()) => info!("Prometheus metrics recorder initialized"),
            Err(e) => warn!(error = %e, "Global metrics recorder already installed"),
        }

        register_metric_descriptions();

        handle
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Render all recorded metrics in the Prometheus text format
pub fn render_metrics() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

/// Register metric descriptions for documentation
fn register_metric_descriptions() {
    use metrics::describe_counter;
    use metrics::describe_gauge;
    use metrics::describe_histogram;

    describe_counter!(
        "estimations_total",
        "Total cost calculations by outcome"
    );
    describe_histogram!(
        "estimation_duration_seconds",
        "Cost calculation duration in seconds"
    );
    describe_gauge!(
        "estimation_monthly_cost_usd",
        "Monthly cost of the last calculation in USD"
    );
    describe_counter!(
        "estimation_recommendations_total",
        "Recommendations emitted by calculations"
    );
    describe_counter!(
        "pricing_fallbacks_total",
        "Rates resolved from built-in defaults instead of the pricing store"
    );
    describe_counter!(
        "comparisons_total",
        "Total configuration comparisons by outcome"
    );
    describe_histogram!(
        "comparison_duration_seconds",
        "Configuration comparison duration in seconds"
    );
    describe_counter!(
        "estimation_requests_rejected_total",
        "Requests rejected by operation and error code"
    );
}
