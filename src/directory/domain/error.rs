//! Error types for service directory domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing service directory domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DirectoryDomainError {
    /// The service name is empty after trimming.
    #[error("service name must not be empty")]
    EmptyServiceName,

    /// The name contains no ASCII alphanumeric characters to build an
    /// identifier from.
    #[error("service name '{0}' does not yield a usable identifier")]
    EmptyServiceId(String),

    /// The base URL does not parse as an absolute URL.
    #[error("base URL '{0}' is not a valid absolute URL")]
    InvalidBaseUrl(String),

    /// The health path contains characters that cannot appear in a path.
    #[error("health path '{0}' is not a valid URL path")]
    InvalidHealthPath(String),

    /// The version string is empty after trimming.
    #[error("service version must not be empty")]
    EmptyVersion,

    /// A capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyCapabilityName,
}

/// Error returned while parsing a service status from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service status: {0}")]
pub struct ParseServiceStatusError(pub String);

/// Error returned while parsing a service kind from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown service type: {0}")]
pub struct ParseServiceKindError(pub String);
