use chrono::{DateTime, NaiveDate, Utc};

use crate::allocations::allocations_model::{Allocation, AllocationDb, NewAllocation};
use crate::errors::Result;
use crate::holdings::AssetType;

/// Trait for allocation repository operations
pub trait AllocationRepositoryTrait: Send + Sync {
    /// All records with no end date, optionally scoped to one client
    fn get_active_allocations(&self, client_id: Option<&str>) -> Result<Vec<Allocation>>;

    /// The current allocation for a (client, asset) pairing, if any
    fn find_active_for_asset(
        &self,
        client_id: &str,
        asset_type: AssetType,
        asset_id: &str,
    ) -> Result<Option<Allocation>>;

    /// Get an allocation by ID
    fn get_allocation(&self, allocation_id: &str) -> Result<Option<Allocation>>;

    /// Insert a new active allocation row
    fn insert_allocation(&self, row: AllocationDb) -> Result<Allocation>;

    /// Stamp an end date on a still-active record. Returns the number of
    /// rows affected; zero means the record was missing or already ended.
    fn end_allocation(
        &self,
        allocation_id: &str,
        end_date: NaiveDate,
        updated_at: DateTime<Utc>,
    ) -> Result<usize>;
}

/// Trait for allocation ledger operations exposed to the CRUD surface
pub trait AllocationServiceTrait: Send + Sync {
    fn get_active_allocations(&self, client_id: Option<&str>) -> Result<Vec<Allocation>>;

    /// Create the current allocation for a (client, asset) pairing. Fails
    /// with a conflict while another active record exists for that pairing.
    fn create_allocation(&self, new_allocation: NewAllocation) -> Result<Allocation>;

    /// End an active allocation. Ending a missing or already-ended record
    /// is an error, not a no-op.
    fn end_allocation(&self, allocation_id: &str, end_date: NaiveDate) -> Result<Allocation>;
}
