use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Region used when a request does not name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Estimation duration (months) used when a request does not name one
pub const DEFAULT_DURATION_MONTHS: u32 = 12;

/// Hours in a billing month (~30.4 days * 24 hours)
pub const HOURS_PER_MONTH: f64 = 730.0;

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MONTHS
}

fn default_quantity() -> u32 {
    1
}

fn default_hours_per_month() -> f64 {
    HOURS_PER_MONTH
}

fn default_access_pattern() -> String {
    "standard".to_string()
}

// ============================================================================
// Money
// ============================================================================

/// Non-negative USD amount held in whole cents.
///
/// Serialized as a plain JSON number with at most two decimal places
/// (`3037` cents becomes `30.37`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    cents: i64,
}

impl Amount {
    pub const ZERO: Amount = Amount { cents: 0 };

    /// Largest priced amount. Twelve times it still fits in an `i64`, so
    /// annual figures derived from a saturated monthly one stay exact.
    pub const MAX: Amount = Amount {
        cents: i64::MAX / 12,
    };

    /// Create an amount from whole cents, clamped to `0..=MAX`
    pub fn from_cents(cents: i64) -> Self {
        Self {
            cents: cents.clamp(0, Self::MAX.cents),
        }
    }

    /// Round a dollar value to the nearest cent, half away from zero.
    ///
    /// NaN and negative inputs clamp to zero; infinite or oversized inputs
    /// saturate at [`Amount::MAX`].
    pub fn from_dollars(value: f64) -> Self {
        if value.is_nan() || value <= 0.0 {
            return Self::ZERO;
        }
        let cents = (value * 100.0).round();
        if cents >= Self::MAX.cents as f64 {
            return Self::MAX;
        }
        Self::from_cents(cents as i64)
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn to_dollars(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Multiply by a whole factor (e.g. 12 for annual figures).
    ///
    /// Not capped at [`Amount::MAX`]: annual totals may exceed it.
    pub fn times(&self, factor: i64) -> Self {
        Self {
            cents: self.cents.saturating_mul(factor).max(0),
        }
    }

    /// `self - other`, floored at zero
    pub fn saturating_sub(&self, other: Amount) -> Self {
        Self::from_cents(self.cents - other.cents)
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount::from_cents(self.cents.saturating_add(rhs.cents))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| acc + a)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_dollars())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Ok(Amount::from_dollars(value))
    }
}

// ============================================================================
// Requirements
// ============================================================================

/// One compute resource (EC2 instances, Lambda, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ComputeRequirement {
    pub service: String,
    pub instance_type: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default = "default_hours_per_month")]
    #[validate(range(min = 0.0))]
    pub hours_per_month: f64,
}

/// One storage resource (S3 bucket, EBS volume, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StorageRequirement {
    pub service: String,
    pub storage_type: String,
    #[serde(rename = "sizeGB")]
    #[validate(range(min = 0.0))]
    pub size_gb: f64,
    #[serde(default = "default_access_pattern")]
    pub access_pattern: String,
}

/// One database resource (RDS instance, DynamoDB table, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRequirement {
    pub service: String,
    pub instance_type: String,
    #[serde(rename = "storageGB", default)]
    #[validate(range(min = 0.0))]
    pub storage_gb: f64,
    #[serde(rename = "backupGB", default)]
    #[validate(range(min = 0.0))]
    pub backup_gb: f64,
}

/// Network usage for the whole requirement set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRequirement {
    #[serde(rename = "dataTransferGB", default)]
    #[validate(range(min = 0.0))]
    pub data_transfer_gb: f64,
    #[serde(rename = "cloudFrontGB", default)]
    #[validate(range(min = 0.0))]
    pub cloud_front_gb: f64,
    #[serde(default)]
    pub requests: u64,
}

/// Infrastructure requirements for one estimate. Absent categories are empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequirementSet {
    #[serde(default)]
    #[validate(nested)]
    pub compute: Vec<ComputeRequirement>,
    #[serde(default)]
    #[validate(nested)]
    pub storage: Vec<StorageRequirement>,
    #[serde(default)]
    #[validate(nested)]
    pub database: Vec<DatabaseRequirement>,
    #[serde(default)]
    #[validate(nested)]
    pub network: NetworkRequirement,
}

// ============================================================================
// Pricing
// ============================================================================

/// Whether a price is charged per hour or per GB-month
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RateUnit {
    Hourly,
    PerGb,
}

/// Lookup key for a pricing record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceKey {
    pub service: String,
    pub type_key: String,
    pub region: String,
}

impl PriceKey {
    pub fn new(
        service: impl Into<String>,
        type_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            type_key: type_key.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.service, self.type_key, self.region)
    }
}

/// Price published by the pricing store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRecord {
    pub service: String,
    #[serde(alias = "instanceType", alias = "storageType")]
    pub type_key: String,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    #[serde(rename = "pricePerGB", default, skip_serializing_if = "Option::is_none")]
    pub price_per_gb: Option<f64>,
}

impl PricingRecord {
    pub fn key(&self) -> PriceKey {
        PriceKey::new(&self.service, &self.type_key, &self.region)
    }

    /// Usable rate for the given unit; missing, negative and non-finite prices yield `None`
    pub fn rate(&self, unit: RateUnit) -> Option<f64> {
        let price = match unit {
            RateUnit::Hourly => self.price_per_hour,
            RateUnit::PerGb => self.price_per_gb,
        };
        price.filter(|p| p.is_finite() && *p >= 0.0)
    }
}

/// Query filters for listing pricing records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingFilter {
    pub service: Option<String>,
    pub type_key: Option<String>,
    pub region: Option<String>,
}

impl PricingFilter {
    pub fn matches(&self, record: &PricingRecord) -> bool {
        self.service.as_ref().is_none_or(|s| *s == record.service)
            && self.type_key.as_ref().is_none_or(|t| *t == record.type_key)
            && self.region.as_ref().is_none_or(|r| *r == record.region)
    }
}

// ============================================================================
// Cost results
// ============================================================================

/// Resource category of a cost line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CostCategory {
    Compute,
    Storage,
    Database,
    Network,
}

/// Monthly cost of one category plus its itemized detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult<D> {
    pub monthly: Amount,
    pub details: D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputeDetail {
    pub service: String,
    pub instance_type: String,
    pub quantity: u32,
    pub hours_per_month: f64,
    pub hourly_cost: f64,
    pub monthly_cost: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageDetail {
    pub service: String,
    pub storage_type: String,
    #[serde(rename = "sizeGB")]
    pub size_gb: f64,
    pub access_pattern: String,
    #[serde(rename = "pricePerGB")]
    pub price_per_gb: f64,
    pub monthly_cost: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseDetail {
    pub service: String,
    pub instance_type: String,
    pub instance_cost: Amount,
    pub storage_cost: Amount,
    pub backup_cost: Amount,
    pub monthly_cost: Amount,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDetail {
    pub data_transfer_cost: Amount,
    pub cloud_front_cost: Amount,
    pub requests_cost: Amount,
}

/// One amount per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCosts {
    pub compute: Amount,
    pub storage: Amount,
    pub database: Amount,
    pub network: Amount,
}

impl CategoryCosts {
    pub fn get(&self, category: CostCategory) -> Amount {
        match category {
            CostCategory::Compute => self.compute,
            CostCategory::Storage => self.storage,
            CostCategory::Database => self.database,
            CostCategory::Network => self.network,
        }
    }

    pub fn total(&self) -> Amount {
        self.compute + self.storage + self.database + self.network
    }

    pub fn times(&self, factor: i64) -> Self {
        Self {
            compute: self.compute.times(factor),
            storage: self.storage.times(factor),
            database: self.database.times(factor),
            network: self.network.times(factor),
        }
    }
}

/// Itemized detail per category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostDetails {
    pub compute: Vec<ComputeDetail>,
    pub storage: Vec<StorageDetail>,
    pub database: Vec<DatabaseDetail>,
    pub network: NetworkDetail,
}

/// Full cost breakdown of an estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub monthly: CategoryCosts,
    pub annual: CategoryCosts,
    pub details: CostDetails,
}

// ============================================================================
// Recommendations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RecommendationType {
    CostOptimization,
    Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Optimization suggestion derived from a cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: CostCategory,
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub potential_savings: Amount,
    pub priority: Priority,
}

// ============================================================================
// Estimation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EstimationStatus {
    #[default]
    Completed,
}

/// Priced result of one estimate, without request metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimate {
    pub total_monthly_cost: Amount,
    pub total_annual_cost: Amount,
    pub cost_breakdown: CostBreakdown,
    pub recommendations: Vec<Recommendation>,
    /// Rates that came from built-in defaults instead of the pricing store
    #[serde(default)]
    pub pricing_fallbacks: usize,
}

/// Immutable record produced by one calculate invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimation {
    estimation_id: Uuid,
    requirements: RequirementSet,
    region: String,
    duration: u32,
    total_monthly_cost: Amount,
    total_annual_cost: Amount,
    cost_breakdown: CostBreakdown,
    recommendations: Vec<Recommendation>,
    #[serde(default)]
    pricing_fallbacks: usize,
    created_at: DateTime<Utc>,
    status: EstimationStatus,
}

impl Estimation {
    pub fn new(
        requirements: RequirementSet,
        region: String,
        duration: u32,
        estimate: CostEstimate,
    ) -> Self {
        Self {
            estimation_id: Uuid::now_v7(),
            requirements,
            region,
            duration,
            total_monthly_cost: estimate.total_monthly_cost,
            total_annual_cost: estimate.total_annual_cost,
            cost_breakdown: estimate.cost_breakdown,
            recommendations: estimate.recommendations,
            pricing_fallbacks: estimate.pricing_fallbacks,
            created_at: Utc::now(),
            status: EstimationStatus::Completed,
        }
    }

    pub fn id(&self) -> Uuid {
        self.estimation_id
    }

    pub fn requirements(&self) -> &RequirementSet {
        &self.requirements
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn total_monthly_cost(&self) -> Amount {
        self.total_monthly_cost
    }

    pub fn total_annual_cost(&self) -> Amount {
        self.total_annual_cost
    }

    pub fn cost_breakdown(&self) -> &CostBreakdown {
        &self.cost_breakdown
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    pub fn pricing_fallbacks(&self) -> usize {
        self.pricing_fallbacks
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> EstimationStatus {
        self.status
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Input of a calculate call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    #[validate(nested)]
    pub requirements: Option<RequirementSet>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_duration")]
    pub duration: u32,
}

impl CalculateRequest {
    pub fn new(requirements: RequirementSet) -> Self {
        Self {
            requirements: Some(requirements),
            region: default_region(),
            duration: default_duration(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_duration(mut self, duration: u32) -> Self {
        self.duration = duration;
        self
    }
}

/// One named configuration to compare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationInput {
    #[serde(default)]
    pub name: Option<String>,
    #[validate(nested)]
    pub requirements: Option<RequirementSet>,
    #[serde(default)]
    pub duration: Option<u32>,
}

impl ConfigurationInput {
    pub fn new(name: impl Into<String>, requirements: RequirementSet) -> Self {
        Self {
            name: Some(name.into()),
            requirements: Some(requirements),
            duration: None,
        }
    }
}

/// Input of a compare call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub configurations: Vec<ConfigurationInput>,
    #[serde(default = "default_region")]
    pub region: String,
}

impl CompareRequest {
    pub fn new(configurations: Vec<ConfigurationInput>) -> Self {
        Self {
            configurations,
            region: default_region(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}

// ============================================================================
// Comparison
// ============================================================================

/// Priced result for one compared configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationComparison {
    pub name: String,
    pub total_monthly_cost: Amount,
    pub total_annual_cost: Amount,
    pub cost_breakdown: CostBreakdown,
    pub recommendations: Vec<Recommendation>,
}

/// Ranking derived from a set of configuration comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonInsights {
    pub most_cost_effective: String,
    pub most_expensive: String,
    pub monthly_savings: Amount,
    pub annual_savings: Amount,
    pub percentage_savings: i64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub comparisons: Vec<ConfigurationComparison>,
    pub insights: ComparisonInsights,
    pub recommended_configuration: String,
}
