//! # Persistence Layer
//!
//! Job-status storage.
//!
//! - [`JobRepository`]: port
//! - `in_memory`: process-local implementation

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryJobRepository;
pub use traits::{JobRepository, RepositoryError, RepositoryResult};
