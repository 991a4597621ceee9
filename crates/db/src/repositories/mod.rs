//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod object_repo;
pub mod state_repo;

pub use object_repo::ObjectRepo;
pub use state_repo::StateRepo;
