use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::DECIMAL_PRECISION;
use crate::utils::time_utils::{parse_timestamp, parse_timestamp_opt};

/// Which kind of holding an allocation points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    Wallet,
    Account,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Wallet => "WALLET",
            AssetType::Account => "ACCOUNT",
        }
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WALLET" => Ok(AssetType::Wallet),
            "ACCOUNT" => Ok(AssetType::Account),
            _ => Err(format!("Unknown asset type: {}", s)),
        }
    }
}

/// Outcome of the most recent balance refresh for a holding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Synced,
    Failed,
}

impl SyncStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "SYNCED",
            SyncStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for SyncStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYNCED" => Ok(SyncStatus::Synced),
            "FAILED" => Ok(SyncStatus::Failed),
            _ => Err(format!("Unknown sync status: {}", s)),
        }
    }
}

/// On-chain wallet held in custody, tracked across one or more chains
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletHolding {
    pub id: String,
    pub address: String,
    pub chains: Vec<String>,
    pub is_active: bool,
    pub sync_status: Option<SyncStatus>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Traditional financial account at an external institution
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountHolding {
    pub id: String,
    pub institution_name: String,
    pub external_ref: Option<String>,
    pub is_active: bool,
    pub sync_status: Option<SyncStatus>,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Current balance of one (chain, token) pair inside a wallet. Overwritten
/// in place on every sync; there is no balance history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub id: String,
    pub holding_id: String,
    pub chain: String,
    pub token_id: String,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub balance: Decimal,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde_option")]
    pub usd_value: Option<Decimal>,
    pub updated_at: DateTime<Utc>,
}

/// Current balance snapshot for an account holding, keyed by balance type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub id: String,
    pub holding_id: String,
    pub balance_type: String,
    pub currency: String,
    #[serde(with = "crate::utils::decimal_serde::decimal_serde")]
    pub amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Incoming wallet snapshot from the balance source, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewWalletBalance {
    pub chain: String,
    pub token_id: String,
    pub balance: Decimal,
    pub usd_value: Option<Decimal>,
}

/// Incoming account snapshot from the balance source, not yet persisted
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccountBalance {
    pub balance_type: String,
    pub currency: String,
    pub amount: Decimal,
}

/// Database model for wallet holdings
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::wallet_holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletHoldingDb {
    pub id: String,
    pub address: String,
    pub chains: String,
    pub is_active: bool,
    pub sync_status: Option<String>,
    pub last_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<WalletHoldingDb> for WalletHolding {
    fn from(db: WalletHoldingDb) -> Self {
        WalletHolding {
            id: db.id,
            address: db.address,
            chains: serde_json::from_str(&db.chains).unwrap_or_default(),
            is_active: db.is_active,
            sync_status: db
                .sync_status
                .as_deref()
                .and_then(|s| SyncStatus::from_str(s).ok()),
            last_synced_at: parse_timestamp_opt(db.last_synced_at.as_deref()),
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

/// Database model for account holdings
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::account_holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountHoldingDb {
    pub id: String,
    pub institution_name: String,
    pub external_ref: Option<String>,
    pub is_active: bool,
    pub sync_status: Option<String>,
    pub last_synced_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AccountHoldingDb> for AccountHolding {
    fn from(db: AccountHoldingDb) -> Self {
        AccountHolding {
            id: db.id,
            institution_name: db.institution_name,
            external_ref: db.external_ref,
            is_active: db.is_active,
            sync_status: db
                .sync_status
                .as_deref()
                .and_then(|s| SyncStatus::from_str(s).ok()),
            last_synced_at: parse_timestamp_opt(db.last_synced_at.as_deref()),
            created_at: parse_timestamp(&db.created_at),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

/// Database model for wallet balance snapshots
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::wallet_balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletBalanceDb {
    pub id: String,
    pub holding_id: String,
    pub chain: String,
    pub token_id: String,
    pub balance: String,
    pub usd_value: Option<String>,
    pub updated_at: String,
}

impl From<WalletBalanceDb> for WalletBalance {
    fn from(db: WalletBalanceDb) -> Self {
        WalletBalance {
            id: db.id,
            holding_id: db.holding_id,
            chain: db.chain,
            token_id: db.token_id,
            balance: Decimal::from_str(&db.balance).unwrap_or_default(),
            usd_value: db
                .usd_value
                .as_deref()
                .and_then(|v| Decimal::from_str(v).ok()),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

impl WalletBalanceDb {
    pub fn from_new(holding_id: &str, snapshot: &NewWalletBalance, as_of: DateTime<Utc>) -> Self {
        WalletBalanceDb {
            id: uuid::Uuid::new_v4().to_string(),
            holding_id: holding_id.to_string(),
            chain: snapshot.chain.clone(),
            token_id: snapshot.token_id.clone(),
            balance: snapshot.balance.round_dp(DECIMAL_PRECISION).to_string(),
            usd_value: snapshot
                .usd_value
                .map(|v| v.round_dp(DECIMAL_PRECISION).to_string()),
            updated_at: as_of.to_rfc3339(),
        }
    }
}

/// Database model for account balance snapshots
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::account_balances)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountBalanceDb {
    pub id: String,
    pub holding_id: String,
    pub balance_type: String,
    pub currency: String,
    pub amount: String,
    pub updated_at: String,
}

impl From<AccountBalanceDb> for AccountBalance {
    fn from(db: AccountBalanceDb) -> Self {
        AccountBalance {
            id: db.id,
            holding_id: db.holding_id,
            balance_type: db.balance_type,
            currency: db.currency,
            amount: Decimal::from_str(&db.amount).unwrap_or_default(),
            updated_at: parse_timestamp(&db.updated_at),
        }
    }
}

impl AccountBalanceDb {
    pub fn from_new(holding_id: &str, snapshot: &NewAccountBalance, as_of: DateTime<Utc>) -> Self {
        AccountBalanceDb {
            id: uuid::Uuid::new_v4().to_string(),
            holding_id: holding_id.to_string(),
            balance_type: snapshot.balance_type.clone(),
            currency: snapshot.currency.clone(),
            amount: snapshot.amount.round_dp(DECIMAL_PRECISION).to_string(),
            updated_at: as_of.to_rfc3339(),
        }
    }
}
