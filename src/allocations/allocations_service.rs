use std::sync::Arc;

use chrono::NaiveDate;
use log::info;

use crate::allocations::allocations_errors::AllocationError;
use crate::allocations::allocations_model::{Allocation, AllocationDb, NewAllocation};
use crate::allocations::allocations_traits::{AllocationRepositoryTrait, AllocationServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use crate::holdings::HoldingRepositoryTrait;
use crate::utils::clock::Clock;

/// Owns the allocation record invariants: bounds on allocation values, one
/// active record per (client, asset) pairing, and one-way ending.
pub struct AllocationService<R: AllocationRepositoryTrait, H: HoldingRepositoryTrait> {
    allocation_repo: Arc<R>,
    holding_repo: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<R: AllocationRepositoryTrait, H: HoldingRepositoryTrait> AllocationService<R, H> {
    pub fn new(allocation_repo: Arc<R>, holding_repo: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        AllocationService {
            allocation_repo,
            holding_repo,
            clock,
        }
    }
}

impl<R: AllocationRepositoryTrait, H: HoldingRepositoryTrait> AllocationServiceTrait
    for AllocationService<R, H>
{
    fn get_active_allocations(&self, client_id: Option<&str>) -> Result<Vec<Allocation>> {
        self.allocation_repo.get_active_allocations(client_id)
    }

    fn create_allocation(&self, new_allocation: NewAllocation) -> Result<Allocation> {
        new_allocation.validate()?;

        if !self
            .holding_repo
            .holding_exists(new_allocation.asset_type, &new_allocation.asset_id)?
        {
            return Err(Error::NotFound(format!(
                "Holding {} not found",
                new_allocation.asset_id
            )));
        }

        if self
            .allocation_repo
            .find_active_for_asset(
                &new_allocation.client_id,
                new_allocation.asset_type,
                &new_allocation.asset_id,
            )?
            .is_some()
        {
            return Err(AllocationError::Conflict {
                client_id: new_allocation.client_id,
                asset_id: new_allocation.asset_id,
            }
            .into());
        }

        let row = AllocationDb::from_new(new_allocation, self.clock.now());
        let created = self.allocation_repo.insert_allocation(row)?;
        info!(
            "Created allocation {} for client {} on {} {}",
            created.id,
            created.client_id,
            created.asset_type.as_str(),
            created.asset_id
        );
        Ok(created)
    }

    fn end_allocation(&self, allocation_id: &str, end_date: NaiveDate) -> Result<Allocation> {
        let existing = self
            .allocation_repo
            .get_allocation(allocation_id)?
            .ok_or_else(|| Error::NotFound(format!("Allocation {} not found", allocation_id)))?;

        // ending is one-way; a second end is rejected, not absorbed
        if existing.end_date.is_some() {
            return Err(Error::NotFound(format!(
                "Allocation {} is already ended",
                allocation_id
            )));
        }

        if end_date < existing.start_date {
            return Err(Error::Validation(ValidationError::OutOfRange {
                field: "endDate".to_string(),
                message: "end date cannot precede the start date".to_string(),
            }));
        }

        let affected =
            self.allocation_repo
                .end_allocation(allocation_id, end_date, self.clock.now())?;
        if affected == 0 {
            return Err(Error::NotFound(format!(
                "Allocation {} is already ended",
                allocation_id
            )));
        }

        info!("Ended allocation {} as of {}", allocation_id, end_date);
        self.allocation_repo
            .get_allocation(allocation_id)?
            .ok_or_else(|| Error::NotFound(format!("Allocation {} not found", allocation_id)))
    }
}
