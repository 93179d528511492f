use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::holdings::AssetType;
use crate::valuation::valuation_model::{
    ClientPortfolioValuation, ConsolidatedValuation, PerformanceMetric,
};

/// Trait for performance metric repository operations
pub trait ValuationRepositoryTrait: Send + Sync {
    /// Write the metric for its (client, date) slot, replacing any earlier
    /// calculation from the same day.
    fn upsert_metric(&self, metric: PerformanceMetric) -> Result<PerformanceMetric>;

    /// The metric stored for one client on one date
    fn get_metric(&self, client_id: &str, date: NaiveDate) -> Result<Option<PerformanceMetric>>;

    /// The newest metric strictly before `date`, for the running P&L figure
    fn latest_metric_before(
        &self,
        client_id: &str,
        date: NaiveDate,
    ) -> Result<Option<PerformanceMetric>>;

    /// Every client's most recent metric
    fn latest_metrics_per_client(&self) -> Result<Vec<PerformanceMetric>>;
}

/// Trait for valuation engine operations
pub trait ValuationServiceTrait: Send + Sync {
    /// Value a client's active allocations and persist today's metric.
    /// Re-running on the same day updates the metric in place.
    fn value_client_portfolio(&self, client_id: &str) -> Result<ClientPortfolioValuation>;

    /// A client's attributed total without the metric side effect
    fn client_total_value(&self, client_id: &str) -> Result<Decimal>;

    /// Current USD value of one holding
    fn resolve_holding_value(&self, asset_type: AssetType, asset_id: &str) -> Result<Decimal>;

    /// System-wide totals: attributed AUM plus raw holding value
    fn value_consolidated(&self) -> Result<ConsolidatedValuation>;
}
