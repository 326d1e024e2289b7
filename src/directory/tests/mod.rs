//! Unit tests for the service directory module.
//!
//! Domain value construction is covered separately from the orchestration
//! service so validation failures are easy to localise.
