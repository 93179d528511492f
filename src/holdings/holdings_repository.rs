use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::{get_connection, DbPool, DbTransactionExecutor};
use crate::errors::Result;
use crate::holdings::holdings_model::{
    AccountBalance, AccountBalanceDb, AccountHolding, AccountHoldingDb, AssetType,
    NewAccountBalance, NewWalletBalance, SyncStatus, WalletBalance, WalletBalanceDb, WalletHolding,
    WalletHoldingDb,
};
use crate::holdings::holdings_traits::HoldingRepositoryTrait;
use crate::schema::{account_balances, account_holdings, wallet_balances, wallet_holdings};
use crate::utils::time_utils::parse_timestamp;

pub struct HoldingRepository {
    pool: Arc<DbPool>,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        HoldingRepository { pool }
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn get_active_wallet_holdings(&self) -> Result<Vec<WalletHolding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = wallet_holdings::table
            .filter(wallet_holdings::is_active.eq(true))
            .load::<WalletHoldingDb>(&mut conn)?;
        Ok(rows.into_iter().map(WalletHolding::from).collect())
    }

    fn get_active_account_holdings(&self) -> Result<Vec<AccountHolding>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = account_holdings::table
            .filter(account_holdings::is_active.eq(true))
            .load::<AccountHoldingDb>(&mut conn)?;
        Ok(rows.into_iter().map(AccountHolding::from).collect())
    }

    fn holding_exists(&self, asset_type: AssetType, asset_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let found = match asset_type {
            AssetType::Wallet => wallet_holdings::table
                .find(asset_id)
                .select(wallet_holdings::id)
                .first::<String>(&mut conn)
                .optional()?,
            AssetType::Account => account_holdings::table
                .find(asset_id)
                .select(account_holdings::id)
                .first::<String>(&mut conn)
                .optional()?,
        };
        Ok(found.is_some())
    }

    fn get_wallet_balances(&self, holding_id: &str) -> Result<Vec<WalletBalance>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = wallet_balances::table
            .filter(wallet_balances::holding_id.eq(holding_id))
            .load::<WalletBalanceDb>(&mut conn)?;
        Ok(rows.into_iter().map(WalletBalance::from).collect())
    }

    fn get_account_balances(&self, holding_id: &str) -> Result<Vec<AccountBalance>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = account_balances::table
            .filter(account_balances::holding_id.eq(holding_id))
            .load::<AccountBalanceDb>(&mut conn)?;
        Ok(rows.into_iter().map(AccountBalance::from).collect())
    }

    fn record_wallet_sync(
        &self,
        holding_id: &str,
        balances: &[NewWalletBalance],
        synced_at: DateTime<Utc>,
    ) -> Result<usize> {
        self.pool.execute(
            |conn| -> std::result::Result<usize, diesel::result::Error> {
                let mut written = 0;
                for snapshot in balances {
                    let row = WalletBalanceDb::from_new(holding_id, snapshot, synced_at);
                    written += diesel::insert_into(wallet_balances::table)
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
                        .execute(conn)?;
                }

                diesel::update(wallet_holdings::table.find(holding_id))
                    .set((
                        wallet_holdings::sync_status
                            .eq(Some(SyncStatus::Synced.as_str().to_string())),
                        wallet_holdings::last_synced_at.eq(Some(synced_at.to_rfc3339())),
                        wallet_holdings::updated_at.eq(synced_at.to_rfc3339()),
                    ))
                    .execute(conn)?;

                Ok(written)
            },
        )
    }

    fn record_account_sync(
        &self,
        holding_id: &str,
        balance: Option<&NewAccountBalance>,
        synced_at: DateTime<Utc>,
    ) -> Result<usize> {
        self.pool.execute(
            |conn| -> std::result::Result<usize, diesel::result::Error> {
                let mut written = 0;
                if let Some(snapshot) = balance {
                    let row = AccountBalanceDb::from_new(holding_id, snapshot, synced_at);
                    written += diesel::insert_into(account_balances::table)
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
                        .execute(conn)?;
                }

                diesel::update(account_holdings::table.find(holding_id))
                    .set((
                        account_holdings::sync_status
                            .eq(Some(SyncStatus::Synced.as_str().to_string())),
                        account_holdings::last_synced_at.eq(Some(synced_at.to_rfc3339())),
                        account_holdings::updated_at.eq(synced_at.to_rfc3339()),
                    ))
                    .execute(conn)?;

                Ok(written)
            },
        )
    }

    fn mark_sync_failed(
        &self,
        asset_type: AssetType,
        holding_id: &str,
        failed_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        match asset_type {
            AssetType::Wallet => {
                diesel::update(wallet_holdings::table.find(holding_id))
                    .set((
                        wallet_holdings::sync_status
                            .eq(Some(SyncStatus::Failed.as_str().to_string())),
                        wallet_holdings::updated_at.eq(failed_at.to_rfc3339()),
                    ))
                    .execute(&mut conn)?;
            }
            AssetType::Account => {
                diesel::update(account_holdings::table.find(holding_id))
                    .set((
                        account_holdings::sync_status
                            .eq(Some(SyncStatus::Failed.as_str().to_string())),
                        account_holdings::updated_at.eq(failed_at.to_rfc3339()),
                    ))
                    .execute(&mut conn)?;
            }
        }
        Ok(())
    }

    fn latest_balance_update(
        &self,
        asset_type: AssetType,
        holding_id: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let mut conn = get_connection(&self.pool)?;
        let newest: Option<String> = match asset_type {
            AssetType::Wallet => wallet_balances::table
                .filter(wallet_balances::holding_id.eq(holding_id))
                .select(diesel::dsl::max(wallet_balances::updated_at))
                .first::<Option<String>>(&mut conn)?,
            AssetType::Account => account_balances::table
                .filter(account_balances::holding_id.eq(holding_id))
                .select(diesel::dsl::max(account_balances::updated_at))
                .first::<Option<String>>(&mut conn)?,
        };
        Ok(newest.map(|s| parse_timestamp(&s)))
    }
}
