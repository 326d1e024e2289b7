//! Validated network location types for registered services.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Default path probed by active health checks.
pub const DEFAULT_HEALTH_PATH: &str = "/health";

/// Absolute base URL of a service, stored without a trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a validated base URL.
    ///
    /// The input is trimmed and trailing slashes are stripped before
    /// validation. Only absolute URLs that can carry a path are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidBaseUrl`] when the value is not
    /// an absolute hierarchical URL.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let normalized = raw.trim().trim_end_matches('/').to_owned();

        match Url::parse(&normalized) {
            Ok(parsed) if !parsed.cannot_be_a_base() && parsed.has_host() => Ok(Self(normalized)),
            _ => Err(DirectoryDomainError::InvalidBaseUrl(raw)),
        }
    }

    /// Returns the base URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds a destination URL from this base, a path, and query pairs.
    ///
    /// The path is appended verbatim (a leading `/` is added when missing);
    /// query pairs are percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] when the combined URL does not parse.
    pub fn join<'a, I>(&self, path: &str, query: I) -> Result<Url, url::ParseError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let separator = if path.starts_with('/') || path.is_empty() {
            ""
        } else {
            "/"
        };
        let mut destination = Url::parse(&format!("{}{separator}{path}", self.0))?;
        let mut pairs = query.into_iter().peekable();
        if pairs.peek().is_some() {
            destination.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(destination)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path probed by active health checks, always starting with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthPath(String);

impl HealthPath {
    /// Creates a validated health path.
    ///
    /// Blank input falls back to [`DEFAULT_HEALTH_PATH`]; a missing leading
    /// slash is added.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::InvalidHealthPath`] when the path
    /// contains whitespace or a fragment marker.
    pub fn new(value: impl Into<String>) -> Result<Self, DirectoryDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        if trimmed.chars().any(|c| c.is_whitespace() || c == '#') {
            return Err(DirectoryDomainError::InvalidHealthPath(raw));
        }

        if trimmed.starts_with('/') {
            Ok(Self(trimmed.to_owned()))
        } else {
            Ok(Self(format!("/{trimmed}")))
        }
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HealthPath {
    fn default() -> Self {
        Self(DEFAULT_HEALTH_PATH.to_owned())
    }
}

impl fmt::Display for HealthPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
