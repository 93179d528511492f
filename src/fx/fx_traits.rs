use rust_decimal::Decimal;

use crate::errors::Result;

/// Trait for converting account balances into USD. The engine values
/// everything in USD; rate acquisition belongs to an external collaborator.
pub trait FxConverter: Send + Sync {
    fn to_usd(&self, amount: Decimal, currency: &str) -> Result<Decimal>;
}
