pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::database_service::DatabaseService;
pub use app::seller_store::SellerStore;
pub use domain::error::{ErrorKind, StoreError, StoreResult};
pub use domain::seller::{SellerAction, SellerStatus};
