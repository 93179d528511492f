pub(crate) mod drift_calculator;
pub(crate) mod drift_model;
pub(crate) mod drift_service;
pub(crate) mod drift_traits;

// Re-export the public interface
pub use drift_calculator::{
    alerting_severity, classify_severity, compute_drift, recommended_action, DriftComputation,
};
pub use drift_model::{DriftFinding, DriftSeverity};
pub use drift_service::DriftService;
pub use drift_traits::DriftServiceTrait;
