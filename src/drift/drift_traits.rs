use rust_decimal::Decimal;

use crate::drift::drift_model::DriftFinding;
use crate::errors::Result;

/// Trait for drift detection operations
pub trait DriftServiceTrait: Send + Sync {
    /// One finding per active allocation whose realized share diverges from
    /// its target by more than `threshold` percentage points.
    fn detect_drift(&self, threshold: Decimal) -> Result<Vec<DriftFinding>>;
}
