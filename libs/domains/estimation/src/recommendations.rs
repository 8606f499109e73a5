//! Threshold rules that turn a cost breakdown into optimization suggestions.

use serde::{Deserialize, Serialize};

use crate::models::{
    Amount, CostBreakdown, CostCategory, Priority, Recommendation, RecommendationType,
};

/// Fires when a category's monthly cost is strictly above `threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRule {
    pub category: CostCategory,
    pub kind: RecommendationType,
    pub title: String,
    pub description: String,
    pub threshold: Amount,
    /// Share of the category's monthly cost reported as potential savings
    pub savings_ratio: f64,
    pub priority: Priority,
}

impl RecommendationRule {
    fn evaluate(&self, breakdown: &CostBreakdown) -> Option<Recommendation> {
        let monthly = breakdown.monthly.get(self.category);
        if monthly <= self.threshold {
            return None;
        }

        Some(Recommendation {
            category: self.category,
            kind: self.kind,
            title: self.title.clone(),
            description: self.description.clone(),
            potential_savings: Amount::from_dollars(monthly.to_dollars() * self.savings_ratio),
            priority: self.priority,
        })
    }
}

/// Ordered rule set; output order always follows rule order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRules {
    rules: Vec<RecommendationRule>,
}

impl Default for RecommendationRules {
    fn default() -> Self {
        Self::new(vec![
            RecommendationRule {
                category: CostCategory::Compute,
                kind: RecommendationType::CostOptimization,
                title: "Consider Reserved Instances".to_string(),
                description:
                    "Save up to 75% on compute costs with 1-year or 3-year Reserved Instances"
                        .to_string(),
                threshold: Amount::from_dollars(500.0),
                savings_ratio: 0.4,
                priority: Priority::High,
            },
            RecommendationRule {
                category: CostCategory::Storage,
                kind: RecommendationType::CostOptimization,
                title: "Implement Storage Lifecycle Policies".to_string(),
                description: "Move infrequently accessed data to cheaper storage classes"
                    .to_string(),
                threshold: Amount::from_dollars(200.0),
                savings_ratio: 0.3,
                priority: Priority::Medium,
            },
            RecommendationRule {
                category: CostCategory::Database,
                kind: RecommendationType::Performance,
                title: "Optimize Database Instance Size".to_string(),
                description: "Right-size database instances based on actual usage patterns"
                    .to_string(),
                threshold: Amount::from_dollars(300.0),
                savings_ratio: 0.25,
                priority: Priority::High,
            },
        ])
    }
}

impl RecommendationRules {
    pub fn new(rules: Vec<RecommendationRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RecommendationRule] {
        &self.rules
    }

    /// Evaluate every rule in order; zero, some or all may fire
    pub fn recommend(&self, breakdown: &CostBreakdown) -> Vec<Recommendation> {
        self.rules
            .iter()
            .filter_map(|rule| rule.evaluate(breakdown))
            .collect()
    }
}
