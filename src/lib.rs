//! Switchboard: a control plane for a dynamic fleet of network services.
//!
//! The crate tracks heterogeneous services (agents, web apps, mobile apps,
//! APIs), determines whether each one is available, mediates traffic to them
//! through a timeout-bounded gateway, and announces notable occurrences on a
//! bounded in-process event bus.
//!
//! # Architecture
//!
//! Each bounded context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure values and rules with no infrastructure dependencies
//! - **Ports**: Trait interfaces for storage and outbound calls
//! - **Adapters**: Concrete implementations of ports (in-memory, HTTP)
//!
//! # Modules
//!
//! - [`directory`]: Service registration and discovery
//! - [`health`]: Active checks, cached results, and aggregation
//! - [`gateway`]: Proxying, command dispatch, and broadcast
//! - [`events`]: Domain events and the bounded event bus
//! - [`transport`]: The outbound call port and its adapters
//! - [`control_plane`]: Wiring of all of the above
//! - [`config`]: Runtime configuration
//! - [`error`]: Stable error codes shared by every context

pub mod config;
pub mod control_plane;
pub mod directory;
pub mod error;
pub mod events;
pub mod gateway;
pub mod health;
pub mod transport;
