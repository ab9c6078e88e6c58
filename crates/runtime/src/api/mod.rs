//! Public API surface for runtime consumers.
mod errors;
mod handle;

pub use errors::{RepositoryError, Result, RuntimeError};
pub use handle::RuntimeHandle;
