use async_trait::async_trait;

use crate::errors::Result;
use crate::holdings::holdings_model::{
    AccountHolding, NewAccountBalance, NewWalletBalance, WalletHolding,
};

/// Upstream balance provider the sync jobs pull from. Implementations live
/// outside this crate (blockchain indexers, open-finance connectors); the
/// engine only consumes the snapshots they return.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Current balances for every (chain, token) pair the wallet tracks.
    async fn wallet_balances(&self, holding: &WalletHolding) -> Result<Vec<NewWalletBalance>>;

    /// The account's current snapshot, if the institution reports one.
    async fn account_balance(&self, holding: &AccountHolding)
        -> Result<Option<NewAccountBalance>>;
}
