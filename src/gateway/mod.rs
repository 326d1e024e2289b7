//! Gateway: every call into a registered service goes through here.
//!
//! Only services that are `healthy` or `degraded` receive traffic, and every
//! outbound call carries a deadline.
//!
//! - Request, response, and broadcast values in [`domain`]
//! - The [`services::Gateway`] itself in [`services`]

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
