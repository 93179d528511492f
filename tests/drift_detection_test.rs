mod common;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use custodia_core::alerts::AlertSeverity;
use custodia_core::allocations::{
    AllocationRepository, AllocationService, AllocationServiceTrait, AllocationType, NewAllocation,
};
use custodia_core::db::DbPool;
use custodia_core::drift::{DriftService, DriftServiceTrait, DriftSeverity};
use custodia_core::fx::UsdOnlyConverter;
use custodia_core::holdings::{AssetType, HoldingRepository};
use custodia_core::utils::clock::SystemClock;
use custodia_core::valuation::{ValuationRepository, ValuationService};

fn detector(pool: &Arc<DbPool>) -> impl DriftServiceTrait {
    let allocation_repo = Arc::new(AllocationRepository::new(pool.clone()));
    let valuation = Arc::new(ValuationService::new(
        allocation_repo.clone(),
        Arc::new(HoldingRepository::new(pool.clone())),
        Arc::new(ValuationRepository::new(pool.clone())),
        Arc::new(UsdOnlyConverter),
        Arc::new(SystemClock),
    ));
    DriftService::new(allocation_repo, valuation)
}

fn create_allocation(
    pool: &Arc<DbPool>,
    client_id: &str,
    asset_id: &str,
    allocation_type: AllocationType,
    value: Decimal,
) {
    let ledger = AllocationService::new(
        Arc::new(AllocationRepository::new(pool.clone())),
        Arc::new(HoldingRepository::new(pool.clone())),
        Arc::new(SystemClock),
    );
    ledger
        .create_allocation(NewAllocation {
            id: None,
            client_id: client_id.to_string(),
            asset_type: AssetType::Wallet,
            asset_id: asset_id.to_string(),
            allocation_type,
            allocation_value: value,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            notes: None,
        })
        .expect("allocation should be created");
}

#[test]
fn allocation_at_target_produces_no_findings() {
    let pool = common::setup_db("drift-at-target");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(10000), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::Percentage, dec!(100));

    let findings = detector(&pool).detect_drift(dec!(10)).unwrap();
    assert!(findings.is_empty(), "got {:?}", findings);
}

#[test]
fn portfolio_composition_change_surfaces_percentage_drift() {
    let pool = common::setup_db("drift-composition");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_holding(&pool, "wallet-2", "0xdef456");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(10000), Utc::now());
    common::seed_wallet_balance(&pool, "wallet-2", "BTC", dec!(20000), Utc::now());
    // 25% of wallet-1 targets $2,500, but the fixed slice on wallet-2 swells
    // the client total to $20,000: realized share lands at 12.5%
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::Percentage, dec!(25));
    create_allocation(&pool, "client-1", "wallet-2", AllocationType::FixedAmount, dec!(17500));

    let findings = detector(&pool).detect_drift(dec!(10)).unwrap();

    assert_eq!(findings.len(), 1, "got {:?}", findings);
    let finding = &findings[0];
    assert_eq!(finding.asset_id, "wallet-1");
    assert_eq!(finding.target_percentage, dec!(25));
    assert_eq!(finding.current_percentage, dec!(12.5));
    assert_eq!(finding.drift_percentage, dec!(12.5));
    assert_eq!(finding.severity, DriftSeverity::High);
    assert_eq!(finding.alert_severity, AlertSeverity::Medium);
    assert!(finding.recommended_action.is_some());
}

#[test]
fn fixed_amount_drift_caps_current_value_at_the_holding() {
    let pool = common::setup_db("drift-fixed-capped");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(500), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::FixedAmount, dec!(1000));

    let findings = detector(&pool).detect_drift(dec!(10)).unwrap();

    assert_eq!(findings.len(), 1);
    let finding = &findings[0];
    assert_eq!(finding.current_value, dec!(500));
    assert_eq!(finding.target_percentage, dec!(200));
    assert_eq!(finding.current_percentage, dec!(100));
    assert_eq!(finding.drift_percentage, dec!(100));
    assert_eq!(finding.alert_severity, AlertSeverity::High);
    assert_eq!(
        finding.recommended_action.as_deref(),
        Some("Increase allocation by $500")
    );
}

#[test]
fn zero_value_holdings_are_skipped_not_errors() {
    let pool = common::setup_db("drift-zero-holding");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    // no balances seeded: the holding is worth nothing
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::FixedAmount, dec!(1000));

    let findings = detector(&pool).detect_drift(dec!(10)).unwrap();
    assert!(findings.is_empty());
}
