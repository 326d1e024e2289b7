//! Captured upstream responses and broadcast outcomes.

use crate::error::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Body of an upstream response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseBody {
    /// Structured body, decoded because the content type declared JSON.
    Json(Value),
    /// Raw text body.
    Text(String),
}

impl ResponseBody {
    /// Decodes a body as JSON when the content type says so and the bytes
    /// parse, and as (lossy UTF-8) text otherwise.
    #[must_use]
    pub fn decode(content_type: Option<&str>, bytes: &[u8]) -> Self {
        content_type
            .filter(|value| value.to_ascii_lowercase().contains("application/json"))
            .and_then(|_| serde_json::from_slice::<Value>(bytes).ok())
            .map_or_else(
                || Self::Text(String::from_utf8_lossy(bytes).into_owned()),
                Self::Json,
            )
    }

    /// Returns the decoded JSON, if the body was structured.
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Converts the body into a JSON value; text becomes a JSON string.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }
}

/// Response captured from a proxied call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// Upstream status code.
    pub status: u16,
    /// Upstream headers with lowercase names.
    pub headers: BTreeMap<String, String>,
    /// Decoded body.
    pub body: ResponseBody,
    /// Wall-clock time spent on the outbound call.
    pub elapsed_ms: u64,
}

impl ProxyResponse {
    /// Returns whether the upstream status is below 400.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// What happened to one leg of a broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BroadcastOutcome {
    /// The service answered.
    Delivered {
        /// Upstream status code.
        status: u16,
        /// Upstream body.
        body: Value,
    },
    /// The leg failed; siblings are unaffected.
    Failed {
        /// Stable error code.
        code: ErrorCode,
        /// Human-readable failure.
        message: String,
    },
}

impl BroadcastOutcome {
    /// Returns whether the leg reached the service.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}
