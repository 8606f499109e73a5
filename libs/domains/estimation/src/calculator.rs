//! Category calculators.
//!
//! Pure functions over a [`PriceSheet`]. Every detail row is rounded to the cent on its own,
//! and each category total is the unrounded sum of its items rounded once. Existing reports
//! were produced with this per-stage rounding, so totals can differ by a cent from the sum
//! of the displayed rows.

use crate::defaults::FixedRates;
use crate::models::{
    Amount, CategoryResult, ComputeDetail, ComputeRequirement, DatabaseDetail,
    DatabaseRequirement, NetworkDetail, NetworkRequirement, StorageDetail, StorageRequirement,
};
use crate::resolver::PriceSheet;

/// Compute: hourly price * hours per month * quantity
pub fn compute_costs(
    requirements: &[ComputeRequirement],
    prices: &PriceSheet,
) -> CategoryResult<Vec<ComputeDetail>> {
    let mut total = 0.0;
    let details = requirements
        .iter()
        .map(|req| {
            let hourly_cost = prices.hourly(&req.service, &req.instance_type);
            let monthly_cost = hourly_cost * req.hours_per_month * f64::from(req.quantity);
            total += monthly_cost;

            ComputeDetail {
                service: req.service.clone(),
                instance_type: req.instance_type.clone(),
                quantity: req.quantity,
                hours_per_month: req.hours_per_month,
                hourly_cost,
                monthly_cost: Amount::from_dollars(monthly_cost),
            }
        })
        .collect();

    CategoryResult {
        monthly: Amount::from_dollars(total),
        details,
    }
}

/// Storage: per-GB price * size
pub fn storage_costs(
    requirements: &[StorageRequirement],
    prices: &PriceSheet,
) -> CategoryResult<Vec<StorageDetail>> {
    let mut total = 0.0;
    let details = requirements
        .iter()
        .map(|req| {
            let price_per_gb = prices.per_gb(&req.service, &req.storage_type);
            let monthly_cost = price_per_gb * req.size_gb;
            total += monthly_cost;

            StorageDetail {
                service: req.service.clone(),
                storage_type: req.storage_type.clone(),
                size_gb: req.size_gb,
                access_pattern: req.access_pattern.clone(),
                price_per_gb,
                monthly_cost: Amount::from_dollars(monthly_cost),
            }
        })
        .collect();

    CategoryResult {
        monthly: Amount::from_dollars(total),
        details,
    }
}

/// Database: instance hours plus fixed-rate storage and backup
pub fn database_costs(
    requirements: &[DatabaseRequirement],
    prices: &PriceSheet,
) -> CategoryResult<Vec<DatabaseDetail>> {
    let fixed = prices.fixed();
    let mut total = 0.0;
    let details = requirements
        .iter()
        .map(|req| {
            let instance_cost =
                prices.hourly(&req.service, &req.instance_type) * fixed.database_instance_hours;
            let storage_cost = req.storage_gb * fixed.database_storage_per_gb;
            let backup_cost = req.backup_gb * fixed.database_backup_per_gb;
            let monthly_cost = instance_cost + storage_cost + backup_cost;
            total += monthly_cost;

            DatabaseDetail {
                service: req.service.clone(),
                instance_type: req.instance_type.clone(),
                instance_cost: Amount::from_dollars(instance_cost),
                storage_cost: Amount::from_dollars(storage_cost),
                backup_cost: Amount::from_dollars(backup_cost),
                monthly_cost: Amount::from_dollars(monthly_cost),
            }
        })
        .collect();

    CategoryResult {
        monthly: Amount::from_dollars(total),
        details,
    }
}

/// Network: data transfer + CloudFront + requests, all at fixed rates
pub fn network_costs(
    requirement: &NetworkRequirement,
    fixed: &FixedRates,
) -> CategoryResult<NetworkDetail> {
    let data_transfer_cost = requirement.data_transfer_gb * fixed.data_transfer_per_gb;
    let cloud_front_cost = requirement.cloud_front_gb * fixed.cloud_front_per_gb;
    let requests_cost = requirement.requests as f64 * fixed.per_request;

    CategoryResult {
        monthly: Amount::from_dollars(data_transfer_cost + cloud_front_cost + requests_cost),
        details: NetworkDetail {
            data_transfer_cost: Amount::from_dollars(data_transfer_cost),
            cloud_front_cost: Amount::from_dollars(cloud_front_cost),
            requests_cost: Amount::from_dollars(requests_cost),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::PricingDefaults;
    use std::sync::Arc;

    fn default_sheet() -> PriceSheet {
        PriceSheet::from_defaults(Arc::new(PricingDefaults::default()), "us-east-1")
    }

    fn compute(instance_type: &str, quantity: u32, hours: f64) -> ComputeRequirement {
        ComputeRequirement {
            service: "EC2".to_string(),
            instance_type: instance_type.to_string(),
            quantity,
            hours_per_month: hours,
        }
    }

    #[test]
    fn test_compute_single_t3_medium() {
        let result = compute_costs(&[compute("t3.medium", 1, 730.0)], &default_sheet());

        assert_eq!(result.monthly.cents(), 3037);
        assert_eq!(result.details.len(), 1);
        assert_eq!(result.details[0].hourly_cost, 0.0416);
        assert_eq!(result.details[0].monthly_cost.cents(), 3037);
    }

    #[test]
    fn test_compute_quantity_and_hours() {
        let result = compute_costs(
            &[compute("t3.micro", 3, 730.0), compute("m5.large", 2, 100.0)],
            &default_sheet(),
        );

        // 0.0104 * 730 * 3 = 22.776, 0.096 * 100 * 2 = 19.2
        assert_eq!(result.details[0].monthly_cost.cents(), 2278);
        assert_eq!(result.details[1].monthly_cost.cents(), 1920);
        assert_eq!(result.monthly.cents(), 4198);
    }

    #[test]
    fn test_compute_unknown_instance_uses_catch_all() {
        let result = compute_costs(&[compute("x1e.32xlarge", 1, 730.0)], &default_sheet());
        assert_eq!(result.details[0].hourly_cost, 0.05);
        assert_eq!(result.monthly.cents(), 3650);
    }

    #[test]
    fn test_category_total_rounds_once_over_unrounded_items() {
        // 0.0104 * 1.4 = 0.01456 per row, shown as 0.01; three rows sum to 0.04368, shown as 0.04
        let items = vec![compute("t3.micro", 1, 1.4); 3];
        let result = compute_costs(&items, &default_sheet());

        let rows: i64 = result.details.iter().map(|d| d.monthly_cost.cents()).sum();
        assert_eq!(rows, 3);
        assert_eq!(result.monthly.cents(), 4);
    }

    #[test]
    fn test_storage_s3_standard() {
        let result = storage_costs(
            &[StorageRequirement {
                service: "S3".to_string(),
                storage_type: "standard".to_string(),
                size_gb: 1000.0,
                access_pattern: "standard".to_string(),
            }],
            &default_sheet(),
        );

        assert_eq!(result.monthly.cents(), 2300);
        assert_eq!(result.details[0].price_per_gb, 0.023);
        assert_eq!(result.details[0].access_pattern, "standard");
    }

    #[test]
    fn test_storage_uses_per_gb_table() {
        let result = storage_costs(
            &[StorageRequirement {
                service: "EBS".to_string(),
                storage_type: "gp3".to_string(),
                size_gb: 500.0,
                access_pattern: "frequent".to_string(),
            }],
            &default_sheet(),
        );
        assert_eq!(result.monthly.cents(), 4000);
    }

    #[test]
    fn test_database_rds_small() {
        let result = database_costs(
            &[DatabaseRequirement {
                service: "RDS".to_string(),
                instance_type: "db.t3.small".to_string(),
                storage_gb: 100.0,
                backup_gb: 50.0,
            }],
            &default_sheet(),
        );

        let detail = &result.details[0];
        assert_eq!(detail.instance_cost.cents(), 2482);
        assert_eq!(detail.storage_cost.cents(), 1150);
        assert_eq!(detail.backup_cost.cents(), 475);
        assert_eq!(detail.monthly_cost.cents(), 4107);
        assert_eq!(result.monthly.cents(), 4107);
    }

    #[test]
    fn test_database_unknown_instance_uses_flat_default() {
        let result = database_costs(
            &[DatabaseRequirement {
                service: "Aurora".to_string(),
                instance_type: "db.r6g.large".to_string(),
                storage_gb: 0.0,
                backup_gb: 0.0,
            }],
            &default_sheet(),
        );
        // 0.05 * 730
        assert_eq!(result.monthly.cents(), 3650);
    }

    #[test]
    fn test_network_costs() {
        let result = network_costs(
            &NetworkRequirement {
                data_transfer_gb: 500.0,
                cloud_front_gb: 200.0,
                requests: 1_000_000,
            },
            &FixedRates::default(),
        );

        assert_eq!(result.details.data_transfer_cost.cents(), 4500);
        assert_eq!(result.details.cloud_front_cost.cents(), 1700);
        assert_eq!(result.details.requests_cost.cents(), 40);
        assert_eq!(result.monthly.cents(), 6240);
    }

    #[test]
    fn test_empty_categories_are_zero() {
        let sheet = default_sheet();
        assert!(compute_costs(&[], &sheet).monthly.is_zero());
        assert!(storage_costs(&[], &sheet).monthly.is_zero());
        assert!(database_costs(&[], &sheet).monthly.is_zero());
        assert!(network_costs(&NetworkRequirement::default(), sheet.fixed()).monthly.is_zero());
    }
}
