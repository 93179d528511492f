pub(crate) mod valuation_calculator;
pub(crate) mod valuation_model;
pub(crate) mod valuation_repository;
pub(crate) mod valuation_service;
pub(crate) mod valuation_traits;

// Re-export the public interface
pub use valuation_calculator::{account_holding_value, value_allocation, wallet_holding_value};
pub use valuation_model::{
    AllocationValuation, ClientPortfolioValuation, ConsolidatedValuation, PerformanceMetric,
    PerformanceMetricDb,
};
pub use valuation_repository::ValuationRepository;
pub use valuation_service::ValuationService;
pub use valuation_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
