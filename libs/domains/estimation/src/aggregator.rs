use serde::{Deserialize, Serialize};

use crate::models::{
    Amount, CategoryCosts, CategoryResult, ComputeDetail, CostBreakdown, CostDetails,
    DatabaseDetail, NetworkDetail, StorageDetail,
};

const MONTHS_PER_YEAR: i64 = 12;

/// Totals and breakdown of one estimate, before recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total_monthly_cost: Amount,
    pub total_annual_cost: Amount,
    pub breakdown: CostBreakdown,
}

/// Combine the four category results into totals and a full breakdown.
///
/// Annual figures are exactly twelve times the monthly ones.
pub fn aggregate(
    compute: CategoryResult<Vec<ComputeDetail>>,
    storage: CategoryResult<Vec<StorageDetail>>,
    database: CategoryResult<Vec<DatabaseDetail>>,
    network: CategoryResult<NetworkDetail>,
) -> CostSummary {
    let monthly = CategoryCosts {
        compute: compute.monthly,
        storage: storage.monthly,
        database: database.monthly,
        network: network.monthly,
    };
    let total_monthly_cost = monthly.total();

    CostSummary {
        total_monthly_cost,
        total_annual_cost: total_monthly_cost.times(MONTHS_PER_YEAR),
        breakdown: CostBreakdown {
            monthly,
            annual: monthly.times(MONTHS_PER_YEAR),
            details: CostDetails {
                compute: compute.details,
                storage: storage.details,
                database: database.details,
                network: network.details,
            },
        },
    }
}
