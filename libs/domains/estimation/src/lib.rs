//! Estimation Domain
//!
//! Turns a declarative description of cloud infrastructure into monthly and annual
//! cost figures, a per-category breakdown, optimization recommendations and
//! side-by-side comparisons of alternative configurations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Persists calculations, read access to stored estimations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Engine    │  ← calculate / compare: prefetch → calculators → aggregate → recommend
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Resolver   │  ← Store lookup with timeout, falls back to built-in defaults
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← PricingStore + EstimationRepository traits, in-memory impls
//! └─────────────┘
//! ```
//!
//! Pricing lookups never fail a calculation: any store error, timeout or missing
//! record resolves to a default price.

pub mod aggregator;
pub mod calculator;
pub mod comparator;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod memory;
pub mod models;
pub mod recommendations;
pub mod repository;
pub mod resolver;
pub mod service;

// Re-export commonly used types
pub use comparator::{MIN_CONFIGURATIONS, derive_insights};
pub use defaults::{FixedRates, PricingDefaults};
pub use engine::CostEngine;
pub use error::{EstimationError, EstimationResult};
pub use memory::{InMemoryEstimationRepository, InMemoryPricingStore};
pub use models::{
    Amount, CalculateRequest, CompareRequest, ComparisonInsights, ComparisonResult,
    ComputeRequirement, ConfigurationComparison, ConfigurationInput, CostBreakdown, CostCategory,
    CostEstimate, DatabaseRequirement, Estimation, NetworkRequirement, PriceKey, PricingFilter,
    PricingRecord, Priority, RateUnit, Recommendation, RecommendationType, RequirementSet,
    StorageRequirement,
};
pub use recommendations::{RecommendationRule, RecommendationRules};
pub use repository::{EstimationRepository, PricingStore};
pub use resolver::{PriceSheet, PricingResolver};
pub use service::EstimationService;
