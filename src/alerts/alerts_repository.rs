use std::sync::Arc;

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::alerts::alerts_model::{Alert, AlertDb, AlertSeverity, AlertStatus, AlertType};
use crate::alerts::alerts_traits::AlertRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::schema::alerts;

pub struct AlertRepository {
    pool: Arc<DbPool>,
}

impl AlertRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        AlertRepository { pool }
    }

    fn fetch(&self, alert_id: &str) -> Result<Alert> {
        let mut conn = get_connection(&self.pool)?;
        let row = alerts::table
            .find(alert_id)
            .first::<AlertDb>(&mut conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Alert {} not found", alert_id)))?;
        Ok(row.into())
    }
}

impl AlertRepositoryTrait for AlertRepository {
    fn find_open(&self, alert_type: AlertType, client_id: Option<&str>) -> Result<Option<Alert>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = alerts::table
            .into_boxed()
            .filter(alerts::alert_type.eq(alert_type.as_str()))
            .filter(alerts::status.ne(AlertStatus::Resolved.as_str()));
        query = match client_id {
            Some(client) => query.filter(alerts::client_id.eq(Some(client.to_string()))),
            None => query.filter(alerts::client_id.is_null()),
        };

        let row = query
            .order(alerts::created_at.desc())
            .first::<AlertDb>(&mut conn)
            .optional()?;
        Ok(row.map(Alert::from))
    }

    fn insert_alert(&self, row: AlertDb) -> Result<Alert> {
        let mut conn = get_connection(&self.pool)?;
        let inserted = diesel::insert_into(alerts::table)
            .values(&row)
            .returning(alerts::all_columns)
            .get_result::<AlertDb>(&mut conn)?;
        Ok(inserted.into())
    }

    fn refresh_alert(
        &self,
        alert_id: &str,
        severity: AlertSeverity,
        message: &str,
        metadata: &serde_json::Value,
        refreshed_at: DateTime<Utc>,
    ) -> Result<Alert> {
        let mut conn = get_connection(&self.pool)?;
        diesel::update(alerts::table.find(alert_id))
            .set((
                alerts::severity.eq(severity.as_str()),
                alerts::message.eq(message),
                alerts::metadata.eq(metadata.to_string()),
                alerts::created_at.eq(refreshed_at.to_rfc3339()),
            ))
            .execute(&mut conn)?;
        drop(conn);
        self.fetch(alert_id)
    }

    fn get_alerts(&self, status: Option<AlertStatus>) -> Result<Vec<Alert>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = alerts::table.into_boxed();
        if let Some(status) = status {
            query = query.filter(alerts::status.eq(status.as_str().to_string()));
        }

        let rows = query
            .order(alerts::created_at.desc())
            .load::<AlertDb>(&mut conn)?;
        Ok(rows.into_iter().map(Alert::from).collect())
    }

    fn set_status(
        &self,
        alert_id: &str,
        status: AlertStatus,
        actor: &str,
        at: DateTime<Utc>,
    ) -> Result<Alert> {
        let mut conn = get_connection(&self.pool)?;
        let affected = match status {
            AlertStatus::Acknowledged => diesel::update(alerts::table.find(alert_id))
                .set((
                    alerts::status.eq(status.as_str()),
                    alerts::acknowledged_by.eq(Some(actor.to_string())),
                    alerts::acknowledged_at.eq(Some(at.to_rfc3339())),
                ))
                .execute(&mut conn)?,
            AlertStatus::Resolved => diesel::update(alerts::table.find(alert_id))
                .set((
                    alerts::status.eq(status.as_str()),
                    alerts::resolved_by.eq(Some(actor.to_string())),
                    alerts::resolved_at.eq(Some(at.to_rfc3339())),
                ))
                .execute(&mut conn)?,
            AlertStatus::Dismissed | AlertStatus::Active => {
                diesel::update(alerts::table.find(alert_id))
                    .set(alerts::status.eq(status.as_str()))
                    .execute(&mut conn)?
            }
        };
        drop(conn);

        if affected == 0 {
            return Err(Error::NotFound(format!("Alert {} not found", alert_id)));
        }
        self.fetch(alert_id)
    }
}
