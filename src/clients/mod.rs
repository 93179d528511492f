pub(crate) mod clients_model;
pub(crate) mod clients_repository;
pub(crate) mod clients_traits;

// Re-export the public interface
pub use clients_model::{Client, ClientDb, ClientStatus};
pub use clients_repository::ClientRepository;
pub use clients_traits::ClientRepositoryTrait;
