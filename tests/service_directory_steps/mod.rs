//! Step definitions for service directory behaviour scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
