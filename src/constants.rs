use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Aggregated USD value below which a holding raises a low-balance alert
pub const LOW_BALANCE_THRESHOLD_USD: Decimal = dec!(1000);

/// Drift percentage above which an alert is raised
pub const DEFAULT_DRIFT_THRESHOLD_PCT: Decimal = dec!(10);

/// Age of the newest balance refresh beyond which a holding counts as stale
pub const SYNC_STALENESS_HOURS: i64 = 24;

/// Drift classification boundaries (reporting)
pub const DRIFT_MEDIUM_PCT: Decimal = dec!(5);
pub const DRIFT_HIGH_PCT: Decimal = dec!(10);

/// Drift above this raises a high-severity alert instead of medium
pub const DRIFT_ALERT_HIGH_PCT: Decimal = dec!(20);
