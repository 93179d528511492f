use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::allocations::allocations_model::{Allocation, AllocationDb};
use crate::allocations::allocations_traits::AllocationRepositoryTrait;
use crate::db::{get_connection, DbPool};
use crate::errors::{Error, Result};
use crate::holdings::AssetType;
use crate::schema::allocations;

pub struct AllocationRepository {
    pool: Arc<DbPool>,
}

impl AllocationRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        AllocationRepository { pool }
    }
}

impl AllocationRepositoryTrait for AllocationRepository {
    fn get_active_allocations(&self, client_id: Option<&str>) -> Result<Vec<Allocation>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = allocations::table
            .filter(allocations::end_date.is_null())
            .into_boxed();
        if let Some(client) = client_id {
            query = query.filter(allocations::client_id.eq(client.to_string()));
        }

        let rows = query.load::<AllocationDb>(&mut conn)?;
        Ok(rows.into_iter().map(Allocation::from).collect())
    }

    fn find_active_for_asset(
        &self,
        client_id: &str,
        asset_type: AssetType,
        asset_id: &str,
    ) -> Result<Option<Allocation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = allocations::table
            .filter(allocations::client_id.eq(client_id))
            .filter(allocations::asset_type.eq(asset_type.as_str()))
            .filter(allocations::asset_id.eq(asset_id))
            .filter(allocations::end_date.is_null())
            .first::<AllocationDb>(&mut conn)
            .optional()?;
        Ok(row.map(Allocation::from))
    }

    fn get_allocation(&self, allocation_id: &str) -> Result<Option<Allocation>> {
        let mut conn = get_connection(&self.pool)?;
        let row = allocations::table
            .find(allocation_id)
            .first::<AllocationDb>(&mut conn)
            .optional()?;
        Ok(row.map(Allocation::from))
    }

    fn insert_allocation(&self, row: AllocationDb) -> Result<Allocation> {
        let mut conn = get_connection(&self.pool)?;
        let inserted = diesel::insert_into(allocations::table)
            .values(&row)
            .returning(allocations::all_columns)
            .get_result::<AllocationDb>(&mut conn)
            .map_err(|e| match e {
                // the partial unique index is the backstop for the
                // one-active-record rule
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    Error::Conflict(
                        "An active allocation already exists for this client and asset"
                            .to_string(),
                    )
                }
                other => other.into(),
            })?;
        Ok(inserted.into())
    }

    fn end_allocation(
        &self,
        allocation_id: &str,
        end_date: NaiveDate,
        updated_at: DateTime<Utc>,
    ) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::update(
            allocations::table
                .find(allocation_id)
                .filter(allocations::end_date.is_null()),
        )
        .set((
            allocations::end_date.eq(Some(end_date)),
            allocations::updated_at.eq(updated_at.to_rfc3339()),
        ))
        .execute(&mut conn)?;
        Ok(affected)
    }
}
