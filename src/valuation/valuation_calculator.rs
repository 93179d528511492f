use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::allocations::{Allocation, AllocationType};
use crate::errors::Result;
use crate::fx::FxConverter;
use crate::holdings::{AccountBalance, WalletBalance};

/// Values one allocation against its holding's current USD value.
///
/// Percentage allocations take their share of the holding. Fixed amounts are
/// attributed at face value even when the holding is currently worth less;
/// the drift path caps instead, and the divergence is deliberate.
pub fn value_allocation(allocation: &Allocation, holding_value_usd: Decimal) -> Decimal {
    match allocation.allocation_type {
        AllocationType::Percentage => holding_value_usd * allocation.allocation_value / dec!(100),
        AllocationType::FixedAmount => allocation.allocation_value,
    }
}

/// Aggregated USD value of a wallet: the sum over its snapshots. Snapshots
/// without a USD quote contribute nothing.
pub fn wallet_holding_value(balances: &[WalletBalance]) -> Decimal {
    balances.iter().filter_map(|b| b.usd_value).sum()
}

/// Aggregated USD value of an account holding's snapshots.
pub fn account_holding_value(
    balances: &[AccountBalance],
    fx: &dyn FxConverter,
) -> Result<Decimal> {
    let mut total = Decimal::ZERO;
    for balance in balances {
        total += fx.to_usd(balance.amount, &balance.currency)?;
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::fx::UsdOnlyConverter;
    use crate::holdings::AssetType;

    fn allocation(allocation_type: AllocationType, value: Decimal) -> Allocation {
        Allocation {
            id: "alloc-1".to_string(),
            client_id: "client-1".to_string(),
            asset_type: AssetType::Wallet,
            asset_id: "wallet-1".to_string(),
            allocation_type,
            allocation_value: value,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn wallet_balance(usd_value: Option<Decimal>) -> WalletBalance {
        WalletBalance {
            id: uuid::Uuid::new_v4().to_string(),
            holding_id: "wallet-1".to_string(),
            chain: "ethereum".to_string(),
            token_id: "ETH".to_string(),
            balance: dec!(1),
            usd_value,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn percentage_allocation_takes_its_share() {
        let alloc = allocation(AllocationType::Percentage, dec!(25));
        assert_eq!(value_allocation(&alloc, dec!(10000)), dec!(2500));
    }

    #[test]
    fn fixed_amount_is_not_capped_to_holding_value() {
        let alloc = allocation(AllocationType::FixedAmount, dec!(1000));
        assert_eq!(value_allocation(&alloc, dec!(500)), dec!(1000));
    }

    #[test]
    fn wallet_value_sums_priced_snapshots() {
        let balances = vec![
            wallet_balance(Some(dec!(600))),
            wallet_balance(None),
            wallet_balance(Some(dec!(300))),
        ];
        assert_eq!(wallet_holding_value(&balances), dec!(900));
    }

    #[test]
    fn account_value_converts_through_fx() {
        let balances = vec![AccountBalance {
            id: "b-1".to_string(),
            holding_id: "acct-1".to_string(),
            balance_type: "CURRENT".to_string(),
            currency: "USD".to_string(),
            amount: dec!(1234.56),
            updated_at: Utc::now(),
        }];
        let total = account_holding_value(&balances, &UsdOnlyConverter).unwrap();
        assert_eq!(total, dec!(1234.56));
    }
}
