//! Service type classification.

use super::ParseServiceKindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of network service a registration describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    /// An autonomous agent process.
    Agent,
    /// A browser-facing web application.
    WebApp,
    /// A backend serving a mobile application.
    MobileApp,
    /// A plain HTTP API.
    Api,
}

impl ServiceKind {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::WebApp => "web_app",
            Self::MobileApp => "mobile_app",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ServiceKind {
    type Error = ParseServiceKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "agent" => Ok(Self::Agent),
            "web_app" => Ok(Self::WebApp),
            "mobile_app" => Ok(Self::MobileApp),
            "api" => Ok(Self::Api),
            _ => Err(ParseServiceKindError(value.to_owned())),
        }
    }
}
