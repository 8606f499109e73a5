//! Integration tests for the Estimation domain
//!
//! These tests drive the public API end to end with the in-memory store and
//! repository, plus stores that fail or hang, to ensure:
//! - Reference workloads price to the expected cents
//! - Pricing store problems never surface to callers
//! - Calculations are persisted and comparisons are not

use async_trait::async_trait;
use domain_estimation::*;
use std::time::Duration;

// ============================================================================
// Fixtures
// ============================================================================

struct FailingStore;

#[async_trait]
impl PricingStore for FailingStore {
    async fn get(
        &self,
        _service: &str,
        _type_key: &str,
        _region: &str,
    ) -> EstimationResult<Option<PricingRecord>> {
        Err(EstimationError::PricingStore("connection refused".to_string()))
    }

    async fn list(&self, _filter: PricingFilter) -> EstimationResult<Vec<PricingRecord>> {
        Err(EstimationError::PricingStore("connection refused".to_string()))
    }
}

struct HangingStore;

#[async_trait]
impl PricingStore for HangingStore {
    async fn get(
        &self,
        _service: &str,
        _type_key: &str,
        _region: &str,
    ) -> EstimationResult<Option<PricingRecord>> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(None)
    }

    async fn list(&self, _filter: PricingFilter) -> EstimationResult<Vec<PricingRecord>> {
        Ok(vec![])
    }
}

const REFERENCE_WORKLOAD: &str = r#"{
    "compute": [{ "service": "EC2", "instanceType": "t3.medium", "quantity": 1, "hoursPerMonth": 730 }],
    "storage": [{ "service": "S3", "storageType": "standard", "sizeGB": 1000 }],
    "database": [{ "service": "RDS", "instanceType": "db.t3.small", "storageGB": 100, "backupGB": 50 }],
    "network": { "dataTransferGB": 500, "cloudFrontGB": 200, "requests": 1000000 }
}"#;

fn reference_workload() -> RequirementSet {
    serde_json::from_str(REFERENCE_WORKLOAD).unwrap()
}

fn ec2(instance_type: &str, quantity: u32) -> RequirementSet {
    RequirementSet {
        compute: vec![ComputeRequirement {
            service: "EC2".to_string(),
            instance_type: instance_type.to_string(),
            quantity,
            hours_per_month: 730.0,
        }],
        ..Default::default()
    }
}

fn in_memory_service() -> EstimationService<InMemoryPricingStore, InMemoryEstimationRepository> {
    let engine = CostEngine::new(PricingResolver::new(InMemoryPricingStore::new()));
    EstimationService::new(engine, InMemoryEstimationRepository::new())
}

// ============================================================================
// Calculation
// ============================================================================

#[tokio::test]
async fn test_reference_workload_with_default_prices() {
    let service = in_memory_service();
    let estimation = service
        .calculate(CalculateRequest::new(reference_workload()))
        .await
        .unwrap();

    let monthly = &estimation.cost_breakdown().monthly;
    assert_eq!(monthly.compute, Amount::from_cents(3037));
    assert_eq!(monthly.storage, Amount::from_cents(2300));
    assert_eq!(monthly.database, Amount::from_cents(4107));
    assert_eq!(monthly.network, Amount::from_cents(6240));
    assert_eq!(estimation.total_monthly_cost(), Amount::from_cents(15684));
    assert_eq!(estimation.total_annual_cost(), Amount::from_cents(188208));

    let network = &estimation.cost_breakdown().details.network;
    assert_eq!(network.data_transfer_cost.cents(), 4500);
    assert_eq!(network.cloud_front_cost.cents(), 1700);
    assert_eq!(network.requests_cost.cents(), 40);
}

#[tokio::test]
async fn test_annual_is_twelve_times_monthly() {
    let service = in_memory_service();
    let workloads = vec![
        reference_workload(),
        ec2("t3.micro", 7),
        ec2("m5.xlarge", 3),
        ec2("unknown.type", 2),
        RequirementSet::default(),
    ];

    for requirements in workloads {
        let estimation = service
            .calculate(CalculateRequest::new(requirements))
            .await
            .unwrap();

        assert_eq!(
            estimation.total_annual_cost(),
            estimation.total_monthly_cost().times(12)
        );
        let breakdown = estimation.cost_breakdown();
        assert_eq!(breakdown.annual, breakdown.monthly.times(12));
        assert_eq!(breakdown.monthly.total(), estimation.total_monthly_cost());
    }
}

#[tokio::test]
async fn test_stored_prices_take_precedence() {
    let store = InMemoryPricingStore::from_json(
        r#"[
            { "service": "EC2", "instanceType": "t3.medium", "region": "us-east-1", "pricePerHour": 0.05 },
            { "service": "S3", "storageType": "standard", "region": "us-east-1", "pricePerGB": 0.02 }
        ]"#,
    )
    .unwrap();
    let engine = CostEngine::new(PricingResolver::new(store));

    let estimate = engine.estimate(&reference_workload(), "us-east-1").await;
    assert_eq!(estimate.cost_breakdown.monthly.compute.cents(), 3650);
    assert_eq!(estimate.cost_breakdown.monthly.storage.cents(), 2000);

    // Same keys in another region fall back to defaults
    let estimate = engine.estimate(&reference_workload(), "eu-west-1").await;
    assert_eq!(estimate.cost_breakdown.monthly.compute.cents(), 3037);
    assert_eq!(estimate.cost_breakdown.monthly.storage.cents(), 2300);
}

#[tokio::test]
async fn test_failing_store_never_fails_calculation() {
    let engine = CostEngine::new(PricingResolver::new(FailingStore));
    let estimation = engine
        .calculate(CalculateRequest::new(reference_workload()))
        .await
        .unwrap();

    assert_eq!(estimation.total_monthly_cost().cents(), 15684);
}

#[tokio::test]
async fn test_hanging_store_times_out_to_defaults() {
    let resolver =
        PricingResolver::new(HangingStore).with_timeout(Duration::from_millis(50));
    let engine = CostEngine::new(resolver);

    let estimate = tokio::time::timeout(
        Duration::from_secs(5),
        engine.estimate(&ec2("t3.medium", 1), "us-east-1"),
    )
    .await
    .expect("lookup timeout should bound the calculation");

    assert_eq!(estimate.total_monthly_cost.cents(), 3037);
}

#[tokio::test]
async fn test_unknown_keys_use_catch_all_rates() {
    let service = in_memory_service();
    let requirements = RequirementSet {
        compute: vec![ComputeRequirement {
            service: "GKE".to_string(),
            instance_type: "e2-standard-4".to_string(),
            quantity: 1,
            hours_per_month: 100.0,
        }],
        storage: vec![StorageRequirement {
            service: "GCS".to_string(),
            storage_type: "nearline".to_string(),
            size_gb: 100.0,
            access_pattern: "standard".to_string(),
        }],
        ..Default::default()
    };

    let estimation = service
        .calculate(CalculateRequest::new(requirements))
        .await
        .unwrap();

    // 0.05 * 100 and 0.023 * 100
    assert_eq!(estimation.cost_breakdown().monthly.compute.cents(), 500);
    assert_eq!(estimation.cost_breakdown().monthly.storage.cents(), 230);
}

#[tokio::test]
async fn test_expensive_workload_gets_all_recommendations() {
    let service = in_memory_service();
    let requirements = RequirementSet {
        compute: vec![ComputeRequirement {
            service: "EC2".to_string(),
            instance_type: "m5.xlarge".to_string(),
            quantity: 4,
            hours_per_month: 730.0,
        }],
        storage: vec![StorageRequirement {
            service: "S3".to_string(),
            storage_type: "standard".to_string(),
            size_gb: 10_000.0,
            access_pattern: "standard".to_string(),
        }],
        database: vec![DatabaseRequirement {
            service: "RDS".to_string(),
            instance_type: "db.m5.large".to_string(),
            storage_gb: 1000.0,
            backup_gb: 500.0,
        }],
        network: NetworkRequirement::default(),
    };

    let estimation = service
        .calculate(CalculateRequest::new(requirements))
        .await
        .unwrap();

    let kinds: Vec<_> = estimation
        .recommendations()
        .iter()
        .map(|r| (r.category, r.priority))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (CostCategory::Compute, Priority::High),
            (CostCategory::Storage, Priority::Medium),
            (CostCategory::Database, Priority::High),
        ]
    );
}

#[tokio::test]
async fn test_calculated_estimations_are_retrievable() {
    let service = in_memory_service();
    let first = service
        .calculate(CalculateRequest::new(ec2("t3.small", 1)))
        .await
        .unwrap();
    let second = service
        .calculate(CalculateRequest::new(ec2("t3.large", 1)).with_duration(36))
        .await
        .unwrap();

    let fetched = service.get_by_id(first.id()).await.unwrap();
    assert_eq!(fetched, first);

    let recent = service.list_recent(10).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert!(recent.iter().any(|e| e.id() == second.id() && e.duration() == 36));

    let missing = service.get_by_id(uuid::Uuid::now_v7()).await;
    assert!(matches!(missing, Err(EstimationError::NotFound(_))));
}

// ============================================================================
// Comparison
// ============================================================================

#[tokio::test]
async fn test_compare_three_configurations() {
    let service = in_memory_service();
    let request = CompareRequest::new(vec![
        ConfigurationInput::new("Medium", ec2("t3.medium", 2)),
        ConfigurationInput::new("Micro fleet", ec2("t3.micro", 4)),
        ConfigurationInput::new("Large", ec2("m5.large", 2)),
    ]);

    let result = service.compare(request).await.unwrap();

    let names: Vec<_> = result.comparisons.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Medium", "Micro fleet", "Large"]);
    assert_eq!(result.insights.most_cost_effective, "Micro fleet");
    assert_eq!(result.insights.most_expensive, "Large");
    assert_eq!(result.recommended_configuration, "Micro fleet");

    // 0.0104 * 730 * 4 = 30.368 -> 30.37, 0.096 * 730 * 2 = 140.16
    assert_eq!(result.insights.monthly_savings.cents(), 14016 - 3037);
    assert_eq!(result.insights.annual_savings.cents(), (14016 - 3037) * 12);
    assert_eq!(result.insights.percentage_savings, 78);
    assert_eq!(
        result.insights.summary,
        "Micro fleet is 78% more cost-effective than Large"
    );
}

#[tokio::test]
async fn test_compare_rejects_single_configuration() {
    let service = in_memory_service();
    let result = service
        .compare(CompareRequest::new(vec![ConfigurationInput::new(
            "Only",
            ec2("t3.micro", 1),
        )]))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.code(), "CALC_002");
    assert!(err.is_client_error());
}

#[tokio::test]
async fn test_compare_deserialized_request() {
    let request: CompareRequest = serde_json::from_str(
        r#"{
            "configurations": [
                { "name": "Current", "requirements": { "compute": [{ "service": "EC2", "instanceType": "t3.large" }] } },
                { "requirements": { "compute": [{ "service": "EC2", "instanceType": "t3.medium" }] } }
            ]
        }"#,
    )
    .unwrap();
    assert_eq!(request.region, "us-east-1");

    let result = in_memory_service().compare(request).await.unwrap();
    assert_eq!(result.recommended_configuration, "Configuration 2");
    assert_eq!(result.insights.percentage_savings, 50);
}

// ============================================================================
// Pricing data
// ============================================================================

#[tokio::test]
async fn test_pricing_data_listing() {
    let store = InMemoryPricingStore::from_records(vec![
        PricingRecord {
            service: "EC2".to_string(),
            type_key: "t3.micro".to_string(),
            region: "us-east-1".to_string(),
            price_per_hour: Some(0.0104),
            price_per_gb: None,
        },
        PricingRecord {
            service: "S3".to_string(),
            type_key: "standard".to_string(),
            region: "us-east-1".to_string(),
            price_per_hour: None,
            price_per_gb: Some(0.023),
        },
    ]);
    let service = EstimationService::new(
        CostEngine::new(PricingResolver::new(store)),
        InMemoryEstimationRepository::new(),
    );

    let all = service.pricing_data(PricingFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let ec2_only = service
        .pricing_data(PricingFilter {
            service: Some("EC2".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(ec2_only.len(), 1);
    assert_eq!(ec2_only[0].type_key, "t3.micro");
}
