pub(crate) mod balance_source;
pub(crate) mod holdings_model;
pub(crate) mod holdings_repository;
pub(crate) mod holdings_traits;

// Re-export the public interface
pub use balance_source::BalanceSource;
pub use holdings_model::{
    AccountBalance, AccountBalanceDb, AccountHolding, AccountHoldingDb, AssetType,
    NewAccountBalance, NewWalletBalance, SyncStatus, WalletBalance, WalletBalanceDb, WalletHolding,
    WalletHoldingDb,
};
pub use holdings_repository::HoldingRepository;
pub use holdings_traits::HoldingRepositoryTrait;
