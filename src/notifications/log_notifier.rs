use async_trait::async_trait;
use log::info;

use crate::alerts::Alert;
use crate::errors::Result;
use crate::notifications::notifications_traits::Notifier;
use crate::valuation::ClientPortfolioValuation;

/// Notifier that only writes to the log. Stands in wherever no push channel
/// is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_portfolio_recalculated(
        &self,
        valuation: &ClientPortfolioValuation,
    ) -> Result<()> {
        info!(
            "Portfolio recalculated for client {}: {} as of {}",
            valuation.client_id, valuation.total_value, valuation.as_of
        );
        Ok(())
    }

    async fn notify_alert_raised(&self, alert: &Alert) -> Result<()> {
        info!(
            "Alert {} ({}) raised: {}",
            alert.id,
            alert.alert_type.as_str(),
            alert.message
        );
        Ok(())
    }
}
