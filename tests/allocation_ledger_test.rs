mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use custodia_core::allocations::{
    AllocationRepository, AllocationService, AllocationServiceTrait, AllocationType, NewAllocation,
};
use custodia_core::db::DbPool;
use custodia_core::errors::{Error, ValidationError};
use custodia_core::holdings::{AssetType, HoldingRepository};
use custodia_core::utils::clock::SystemClock;

fn ledger(pool: &Arc<DbPool>) -> AllocationService<AllocationRepository, HoldingRepository> {
    AllocationService::new(
        Arc::new(AllocationRepository::new(pool.clone())),
        Arc::new(HoldingRepository::new(pool.clone())),
        Arc::new(SystemClock),
    )
}

fn percentage_allocation(client_id: &str, asset_id: &str, value: Decimal) -> NewAllocation {
    NewAllocation {
        id: None,
        client_id: client_id.to_string(),
        asset_type: AssetType::Wallet,
        asset_id: asset_id.to_string(),
        allocation_type: AllocationType::Percentage,
        allocation_value: value,
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        notes: None,
    }
}

#[test]
fn one_active_allocation_per_client_asset_pairing() {
    let pool = common::setup_db("alloc-conflict");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    let ledger = ledger(&pool);

    let first = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-1", dec!(25)))
        .expect("first allocation should be created");

    let err = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-1", dec!(40)))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)), "got {:?}", err);

    // ending the first record frees the pairing for a replacement
    ledger
        .end_allocation(&first.id, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
        .expect("ending an active allocation should succeed");

    let replacement = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-1", dec!(40)))
        .expect("a new allocation should be allowed after the old one ends");
    assert_ne!(first.id, replacement.id);

    let active = ledger.get_active_allocations(Some("client-1")).unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].allocation_value, dec!(40));
}

#[test]
fn ending_is_one_way() {
    let pool = common::setup_db("alloc-end-twice");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    let ledger = ledger(&pool);

    let allocation = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-1", dec!(10)))
        .unwrap();
    let end_date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

    let ended = ledger.end_allocation(&allocation.id, end_date).unwrap();
    assert_eq!(ended.end_date, Some(end_date));

    let err = ledger.end_allocation(&allocation.id, end_date).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[test]
fn ending_a_missing_record_is_not_found() {
    let pool = common::setup_db("alloc-end-missing");
    let ledger = ledger(&pool);

    let err = ledger
        .end_allocation("no-such-id", NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[test]
fn end_date_cannot_precede_start_date() {
    let pool = common::setup_db("alloc-end-before-start");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    let ledger = ledger(&pool);

    let allocation = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-1", dec!(10)))
        .unwrap();

    let err = ledger
        .end_allocation(&allocation.id, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap())
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
}

#[test]
fn out_of_range_values_name_the_offending_field() {
    let pool = common::setup_db("alloc-bounds");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    let ledger = ledger(&pool);

    let err = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-1", dec!(150)))
        .unwrap_err();
    match err {
        Error::Validation(ValidationError::OutOfRange { field, .. }) => {
            assert_eq!(field, "allocationValue");
        }
        other => panic!("expected a validation error, got {:?}", other),
    }

    let mut fixed = percentage_allocation("client-1", "wallet-1", dec!(-5));
    fixed.allocation_type = AllocationType::FixedAmount;
    let err = ledger.create_allocation(fixed).unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
}

#[test]
fn allocations_require_an_existing_holding() {
    let pool = common::setup_db("alloc-missing-holding");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    let ledger = ledger(&pool);

    let err = ledger
        .create_allocation(percentage_allocation("client-1", "wallet-ghost", dec!(25)))
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}
