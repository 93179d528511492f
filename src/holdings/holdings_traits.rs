use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::holdings::holdings_model::{
    AccountBalance, AccountHolding, AssetType, NewAccountBalance, NewWalletBalance, WalletBalance,
    WalletHolding,
};

/// Trait for holding repository operations
pub trait HoldingRepositoryTrait: Send + Sync {
    /// All wallet holdings still under custody
    fn get_active_wallet_holdings(&self) -> Result<Vec<WalletHolding>>;

    /// All account holdings still under custody
    fn get_active_account_holdings(&self) -> Result<Vec<AccountHolding>>;

    /// Whether a holding of the given kind exists
    fn holding_exists(&self, asset_type: AssetType, asset_id: &str) -> Result<bool>;

    /// Current wallet snapshots for one holding
    fn get_wallet_balances(&self, holding_id: &str) -> Result<Vec<WalletBalance>>;

    /// Current account snapshots for one holding
    fn get_account_balances(&self, holding_id: &str) -> Result<Vec<AccountBalance>>;

    /// Persist a successful wallet refresh: upsert every snapshot by its
    /// natural key and stamp the holding, atomically.
    fn record_wallet_sync(
        &self,
        holding_id: &str,
        balances: &[NewWalletBalance],
        synced_at: DateTime<Utc>,
    ) -> Result<usize>;

    /// Persist a successful account refresh. `None` stamps the sync without
    /// touching snapshots (the institution reported nothing new).
    fn record_account_sync(
        &self,
        holding_id: &str,
        balance: Option<&NewAccountBalance>,
        synced_at: DateTime<Utc>,
    ) -> Result<usize>;

    /// Flag a holding whose refresh failed, leaving its snapshots untouched
    fn mark_sync_failed(
        &self,
        asset_type: AssetType,
        holding_id: &str,
        failed_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Most recent snapshot write for a holding, for staleness checks
    fn latest_balance_update(
        &self,
        asset_type: AssetType,
        holding_id: &str,
    ) -> Result<Option<DateTime<Utc>>>;
}
