use rust_decimal::Decimal;

use crate::errors::{CurrencyError, Error, Result};
use crate::fx::fx_traits::FxConverter;

/// Converter that only understands USD. Deployments holding non-USD account
/// balances plug a rate-backed implementation in instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdOnlyConverter;

impl FxConverter for UsdOnlyConverter {
    fn to_usd(&self, amount: Decimal, currency: &str) -> Result<Decimal> {
        if currency.eq_ignore_ascii_case("USD") {
            Ok(amount)
        } else {
            Err(Error::Currency(CurrencyError::Unsupported(
                currency.to_string(),
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn usd_passes_through() {
        let fx = UsdOnlyConverter;
        assert_eq!(fx.to_usd(dec!(150.25), "USD").unwrap(), dec!(150.25));
        assert_eq!(fx.to_usd(dec!(1), "usd").unwrap(), dec!(1));
    }

    #[test]
    fn other_currencies_are_rejected() {
        let fx = UsdOnlyConverter;
        assert!(matches!(
            fx.to_usd(dec!(100), "EUR"),
            Err(Error::Currency(CurrencyError::Unsupported(_)))
        ));
    }
}
