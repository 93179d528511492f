mod common;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use custodia_core::allocations::{
    AllocationRepository, AllocationService, AllocationServiceTrait, AllocationType, NewAllocation,
};
use custodia_core::db::DbPool;
use custodia_core::fx::UsdOnlyConverter;
use custodia_core::holdings::{AssetType, HoldingRepository};
use custodia_core::utils::clock::SystemClock;
use custodia_core::valuation::{
    ValuationRepository, ValuationService, ValuationServiceTrait,
};

type Valuation = ValuationService<AllocationRepository, HoldingRepository, ValuationRepository>;

fn valuation(pool: &Arc<DbPool>) -> Valuation {
    ValuationService::new(
        Arc::new(AllocationRepository::new(pool.clone())),
        Arc::new(HoldingRepository::new(pool.clone())),
        Arc::new(ValuationRepository::new(pool.clone())),
        Arc::new(UsdOnlyConverter),
        Arc::new(SystemClock),
    )
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

fn metric_rows(pool: &DbPool, client: &str) -> Vec<(NaiveDate, String)> {
    use custodia_core::schema::performance_metrics;

    let mut conn = pool.get().unwrap();
    performance_metrics::table
        .filter(performance_metrics::client_id.eq(client))
        .select((
            performance_metrics::metric_date,
            performance_metrics::total_value,
        ))
        .load::<(NaiveDate, String)>(&mut conn)
        .unwrap()
}

#[test]
fn percentage_allocation_values_its_share() {
    let pool = common::setup_db("valuation-percentage");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(6000), Utc::now());
    common::seed_wallet_balance(&pool, "wallet-1", "USDC", dec!(4000), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::Percentage, dec!(25));

    let result = valuation(&pool).value_client_portfolio("client-1").unwrap();

    assert_eq!(result.total_value, dec!(2500));
    assert_eq!(result.allocations.len(), 1);
    assert_eq!(result.allocations[0].holding_value, dec!(10000));
    assert_eq!(result.allocations[0].allocated_value, dec!(2500));
}

#[test]
fn fixed_amount_is_valued_uncapped() {
    let pool = common::setup_db("valuation-fixed-uncapped");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(500), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::FixedAmount, dec!(1000));

    let result = valuation(&pool).value_client_portfolio("client-1").unwrap();

    // the attributed value keeps its face amount even though the holding is
    // worth less right now
    assert_eq!(result.total_value, dec!(1000));
    assert_eq!(result.allocations[0].holding_value, dec!(500));
}

#[test]
fn same_day_reruns_update_one_metric_row() {
    let pool = common::setup_db("valuation-idempotent");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(10000), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::Percentage, dec!(50));

    let service = valuation(&pool);
    let first = service.value_client_portfolio("client-1").unwrap();
    let second = service.value_client_portfolio("client-1").unwrap();

    assert_eq!(first.total_value, second.total_value);

    let rows = metric_rows(&pool, "client-1");
    assert_eq!(rows.len(), 1, "rerun must update, not duplicate: {:?}", rows);
    assert_eq!(rows[0].1, "5000");
}

#[test]
fn consolidated_totals_combine_metrics_and_raw_holdings() {
    let pool = common::setup_db("valuation-consolidated");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_client(&pool, "client-2", "Harbor Trust");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_holding(&pool, "wallet-2", "0xdef456");
    common::seed_account_holding(&pool, "acct-1", "First Meridian Bank");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(10000), Utc::now());
    common::seed_wallet_balance(&pool, "wallet-2", "BTC", dec!(20000), Utc::now());
    common::seed_account_balance(&pool, "acct-1", "USD", dec!(5000), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::Percentage, dec!(100));
    create_allocation(&pool, "client-2", "wallet-2", AllocationType::Percentage, dec!(50));

    let service = valuation(&pool);
    service.value_client_portfolio("client-1").unwrap();
    service.value_client_portfolio("client-2").unwrap();

    let consolidated = service.value_consolidated().unwrap();
    assert_eq!(consolidated.total_aum, dec!(20000));
    assert_eq!(consolidated.total_holding_value, dec!(35000));
}

#[test]
fn pnl_is_zero_without_an_earlier_metric() {
    let pool = common::setup_db("valuation-pnl-first-run");
    common::seed_client(&pool, "client-1", "Meridian Family Office");
    common::seed_wallet_holding(&pool, "wallet-1", "0xabc123");
    common::seed_wallet_balance(&pool, "wallet-1", "ETH", dec!(8000), Utc::now());
    create_allocation(&pool, "client-1", "wallet-1", AllocationType::Percentage, dec!(100));

    let service = valuation(&pool);
    service.value_client_portfolio("client-1").unwrap();

    use custodia_core::schema::performance_metrics;
    let mut conn = pool.get().unwrap();
    let pnl: String = performance_metrics::table
        .filter(performance_metrics::client_id.eq("client-1"))
        .select(performance_metrics::pnl)
        .first(&mut conn)
        .unwrap();
    assert_eq!(pnl, "0");
}
