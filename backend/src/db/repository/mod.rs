//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`machine`]: CRUD operations for machine records

pub mod error;
pub mod machine;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use machine::MachineRepository;
