pub(crate) mod fx_service;
pub(crate) mod fx_traits;

// Re-export the public interface
pub use fx_service::UsdOnlyConverter;
pub use fx_traits::FxConverter;
