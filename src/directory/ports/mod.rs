//! Port contracts for the service directory.
//!
//! Ports define infrastructure-agnostic interfaces; the backing store is
//! swappable as long as it honours [`ServiceRepository`].

pub mod repository;

pub use repository::{ServiceRepository, ServiceRepositoryError, ServiceRepositoryResult};
