#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use custodia_core::db::{self, DbPool};
use custodia_core::holdings::{
    AccountBalanceDb, AccountHoldingDb, NewAccountBalance, NewWalletBalance, WalletBalanceDb,
    WalletHoldingDb,
};

pub fn get_test_db_path(test_id: &str) -> String {
    let now = chrono::Local::now();
    now.format(&format!("./tests/output/%Y%m%d/%H%M%S-{}/", test_id))
        .to_string()
}

/// Stands up a fresh SQLite database with the schema applied
pub fn setup_db(test_id: &str) -> Arc<DbPool> {
    let dir = get_test_db_path(test_id);
    let db_path = db::init(&dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");
    pool
}

pub fn seed_client(pool: &DbPool, id: &str, name: &str) {
    use custodia_core::schema::clients;

    let now = Utc::now().to_rfc3339();
    let row = custodia_core::clients::ClientDb {
        id: id.to_string(),
        name: name.to_string(),
        status: "ACTIVE".to_string(),
        created_at: now.clone(),
        updated_at: now,
    };
    let mut conn = pool.get().expect("Failed to get database connection");
    diesel::insert_into(clients::table)
        .values(&row)
        .execute(&mut conn)
        .expect("Failed to seed client");
}

pub fn seed_wallet_holding(pool: &DbPool, id: &str, address: &str) {
    use custodia_core::schema::wallet_holdings;

    let now = Utc::now().to_rfc3339();
    let row = WalletHoldingDb {
        id: id.to_string(),
        address: address.to_string(),
        chains: r#"["ethereum"]"#.to_string(),
        is_active: true,
        sync_status: None,
        last_synced_at: None,
        created_at: now.clone(),
        updated_at: now,
    };
    let mut conn = pool.get().expect("Failed to get database connection");
    diesel::insert_into(wallet_holdings::table)
        .values(&row)
        .execute(&mut conn)
        .expect("Failed to seed wallet holding");
}

pub fn seed_account_holding(pool: &DbPool, id: &str, institution: &str) {
    use custodia_core::schema::account_holdings;

    let now = Utc::now().to_rfc3339();
    let row = AccountHoldingDb {
        id: id.to_string(),
        institution_name: institution.to_string(),
        external_ref: None,
        is_active: true,
        sync_status: None,
        last_synced_at: None,
        created_at: now.clone(),
        updated_at: now,
    };
    let mut conn = pool.get().expect("Failed to get database connection");
    diesel::insert_into(account_holdings::table)
        .values(&row)
        .execute(&mut conn)
        .expect("Failed to seed account holding");
}

/// Inserts or overwrites one wallet snapshot with an explicit refresh time
pub fn seed_wallet_balance(
    pool: &DbPool,
    holding_id: &str,
    token_id: &str,
    usd_value: Decimal,
    as_of: DateTime<Utc>,
) {
    use custodia_core::schema::wallet_balances;

    let snapshot = NewWalletBalance {
        chain: "ethereum".to_string(),
        token_id: token_id.to_string(),
        balance: Decimal::ONE,
        usd_value: Some(usd_value),
    };
    let row = WalletBalanceDb::from_new(holding_id, &snapshot, as_of);
    let mut conn = pool.get().expect("Failed to get database connection");
    diesel::insert_into(wallet_balances::table)
        .values(&row)
        .on_conflict((
            wallet_balances::holding_id,
            wallet_balances::chain,
            wallet_balances::token_id,
        ))
        .do_update()
        .set((
            wallet_balances::balance.eq(row.balance.clone()),
            wallet_balances::usd_value.eq(row.usd_value.clone()),
            wallet_balances::updated_at.eq(row.updated_at.clone()),
        ))
        .execute(&mut conn)
        .expect("Failed to seed wallet balance");
}

pub fn seed_account_balance(
    pool: &DbPool,
    holding_id: &str,
    currency: &str,
    amount: Decimal,
    as_of: DateTime<Utc>,
) {
    use custodia_core::schema::account_balances;

    let snapshot = NewAccountBalance {
        balance_type: "CURRENT".to_string(),
        currency: currency.to_string(),
        amount,
    };
    let row = AccountBalanceDb::from_new(holding_id, &snapshot, as_of);
    let mut conn = pool.get().expect("Failed to get database connection");
    diesel::insert_into(account_balances::table)
        .values(&row)
        .on_conflict((
            account_balances::holding_id,
            account_balances::balance_type,
        ))
        .do_update()
        .set((
            account_balances::currency.eq(row.currency.clone()),
            account_balances::amount.eq(row.amount.clone()),
            account_balances::updated_at.eq(row.updated_at.clone()),
        ))
        .execute(&mut conn)
        .expect("Failed to seed account balance");
}
