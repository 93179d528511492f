use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::performance_metrics;
use crate::valuation::valuation_model::{PerformanceMetric, PerformanceMetricDb};
use crate::valuation::valuation_traits::ValuationRepositoryTrait;

pub struct ValuationRepository {
    pool: Arc<DbPool>,
}

impl ValuationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ValuationRepository { pool }
    }
}

impl ValuationRepositoryTrait for ValuationRepository {
    fn upsert_metric(&self, metric: PerformanceMetric) -> Result<PerformanceMetric> {
        let mut conn = get_connection(&self.pool)?;
        let row = PerformanceMetricDb::from(metric);

        diesel::insert_into(performance_metrics::table)
            .values(&row)
            .on_conflict((
                performance_metrics::client_id,
                performance_metrics::metric_date,
            ))
            .do_update()
            .set((
                performance_metrics::total_value.eq(row.total_value.clone()),
                performance_metrics::pnl.eq(row.pnl.clone()),
                performance_metrics::calculated_at.eq(row.calculated_at.clone()),
            ))
            .execute(&mut conn)?;

        let stored = performance_metrics::table
            .filter(performance_metrics::client_id.eq(&row.client_id))
            .filter(performance_metrics::metric_date.eq(row.metric_date))
            .first::<PerformanceMetricDb>(&mut conn)
            .optional()?
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "Performance metric for client {} on {} not found after upsert",
                    row.client_id, row.metric_date
                ))
            })?;
        Ok(stored.into())
    }

    fn get_metric(&self, client_id: &str, date: NaiveDate) -> Result<Option<PerformanceMetric>> {
        let mut conn = get_connection(&self.pool)?;
        let row = performance_metrics::table
            .filter(performance_metrics::client_id.eq(client_id))
            .filter(performance_metrics::metric_date.eq(date))
            .first::<PerformanceMetricDb>(&mut conn)
            .optional()?;
        Ok(row.map(PerformanceMetric::from))
    }

    fn latest_metric_before(
        &self,
        client_id: &str,
        date: NaiveDate,
    ) -> Result<Option<PerformanceMetric>> {
        let mut conn = get_connection(&self.pool)?;
        let row = performance_metrics::table
            .filter(performance_metrics::client_id.eq(client_id))
            .filter(performance_metrics::metric_date.lt(date))
            .order(performance_metrics::metric_date.desc())
            .first::<PerformanceMetricDb>(&mut conn)
            .optional()?;
        Ok(row.map(PerformanceMetric::from))
    }

    fn latest_metrics_per_client(&self) -> Result<Vec<PerformanceMetric>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = performance_metrics::table
            .order(performance_metrics::metric_date.asc())
            .load::<PerformanceMetricDb>(&mut conn)?;

        // later rows win per client because of the ascending date order
        let mut latest: HashMap<String, PerformanceMetric> = HashMap::new();
        for row in rows {
            let metric = PerformanceMetric::from(row);
            latest.insert(metric.client_id.clone(), metric);
        }
        Ok(latest.into_values().collect())
    }
}
