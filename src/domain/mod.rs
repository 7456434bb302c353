pub mod error;
pub mod seller;

pub use error::{ErrorKind, StoreError, StoreResult};
