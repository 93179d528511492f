use crate::clients::clients_model::Client;
use crate::errors::Result;

/// Trait for client repository operations
pub trait ClientRepositoryTrait: Send + Sync {
    /// Get all clients
    fn get_clients(&self) -> Result<Vec<Client>>;

    /// Get clients with an Active lifecycle status
    fn get_active_clients(&self) -> Result<Vec<Client>>;

    /// Get a client by ID
    fn get_client(&self, client_id: &str) -> Result<Client>;
}
