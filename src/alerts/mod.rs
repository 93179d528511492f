pub(crate) mod alerts_model;
pub(crate) mod alerts_repository;
pub(crate) mod alerts_service;
pub(crate) mod alerts_traits;

// Re-export the public interface
pub use alerts_model::{Alert, AlertDb, AlertSeverity, AlertStatus, AlertType};
pub use alerts_repository::AlertRepository;
pub use alerts_service::AlertService;
pub use alerts_traits::{AlertRepositoryTrait, AlertServiceTrait};
