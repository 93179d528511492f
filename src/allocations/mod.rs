pub(crate) mod allocations_errors;
pub(crate) mod allocations_model;
pub(crate) mod allocations_repository;
pub(crate) mod allocations_service;
pub(crate) mod allocations_traits;

// Re-export the public interface
pub use allocations_model::{Allocation, AllocationDb, AllocationType, NewAllocation};
pub use allocations_repository::AllocationRepository;
pub use allocations_service::AllocationService;
pub use allocations_traits::{AllocationRepositoryTrait, AllocationServiceTrait};

// Re-export error types for convenience
pub use allocations_errors::AllocationError;
