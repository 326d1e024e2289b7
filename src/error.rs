//! Stable error codes shared by every bounded context.
//!
//! Each context defines its own error enum; all of them expose a `code()`
//! accessor returning an [`ErrorCode`] so callers at the system boundary can
//! map failures onto transport status codes without matching on variants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable, transport-independent classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input rejected during construction.
    Validation,
    /// The referenced service is not registered.
    NotFound,
    /// A registration collides with an existing entry under another name.
    Conflict,
    /// The target service is not in an eligible status.
    ServiceUnavailable,
    /// An outbound call exceeded its deadline.
    GatewayTimeout,
    /// The upstream service answered a command with status 400 or above.
    CommandDispatchFailed,
    /// Any other outbound transport failure.
    Transport,
    /// The directory backing store failed.
    Storage,
}

impl ErrorCode {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::GatewayTimeout => "GATEWAY_TIMEOUT",
            Self::CommandDispatchFailed => "COMMAND_DISPATCH_FAILED",
            Self::Transport => "TRANSPORT",
            Self::Storage => "STORAGE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
