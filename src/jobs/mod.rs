pub(crate) mod batch;
pub(crate) mod jobs_model;
pub(crate) mod jobs_service;
pub(crate) mod jobs_traits;
pub(crate) mod scheduler;

// Re-export the public interface
pub use batch::{for_each_isolated, for_each_isolated_async};
pub use jobs_model::{JobOutcome, JobRunStatus, JobType, RetryPolicy};
pub use jobs_service::JobOrchestrator;
pub use jobs_traits::JobOrchestratorTrait;
pub use scheduler::{run_with_retry, JobSchedule, JobScheduler};
