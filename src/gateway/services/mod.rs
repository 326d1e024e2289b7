//! Application services for proxying and dispatch.

mod dispatcher;

pub use dispatcher::{BROADCAST_PATH, COMMAND_PATH_PREFIX, Gateway, GatewayError, GatewayResult};
