//! Service directory: the authoritative store of registered services.
//!
//! Registering derives a slug identifier from the service name, lookups never
//! fail on absence, and removal happens only on explicit deregistration. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
