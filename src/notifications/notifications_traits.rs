use async_trait::async_trait;

use crate::alerts::Alert;
use crate::errors::Result;
use crate::valuation::ClientPortfolioValuation;

/// Fire-and-forget push channel. Delivery failures are logged by the caller
/// and never fail the job that triggered them.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_portfolio_recalculated(
        &self,
        valuation: &ClientPortfolioValuation,
    ) -> Result<()>;

    async fn notify_alert_raised(&self, alert: &Alert) -> Result<()>;
}
