//! Health monitoring: active probes, cached results, and aggregation.
//!
//! A check moves a service out of `starting` into exactly one of `healthy`,
//! `degraded`, or `unhealthy`, overwriting its state bundle as a whole.
//!
//! - Classification and aggregation rules in [`domain`]
//! - The monitor and its periodic sweep in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
