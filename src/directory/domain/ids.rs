//! Identifier type for registered services.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slug identifier derived from a service's display name.
///
/// The slug is the lowercased name with every run of non-alphanumeric
/// characters collapsed to a single dash and leading or trailing dashes
/// removed. Slugging is idempotent, so an existing identifier passed back
/// through [`ServiceId::new`] is unchanged.
///
/// # Examples
///
/// ```
/// use switchboard::directory::domain::ServiceId;
///
/// let id = ServiceId::new("Payment Agent").expect("valid name");
/// assert_eq!(id.as_str(), "payment-agent");
/// assert_eq!(ServiceId::new("payment-agent").expect("valid slug"), id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(String);

impl ServiceId {
    /// Derives an identifier from a display name or an existing slug.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyServiceName`] when the input is
    /// blank, or [`DirectoryDomainError::EmptyServiceId`] when it contains no
    /// ASCII alphanumeric characters.
    pub fn new(value: impl AsRef<str>) -> Result<Self, DirectoryDomainError> {
        let raw = value.as_ref();
        if raw.trim().is_empty() {
            return Err(DirectoryDomainError::EmptyServiceName);
        }

        let slug = slugify(raw);
        if slug.is_empty() {
            return Err(DirectoryDomainError::EmptyServiceId(raw.to_owned()));
        }
        Ok(Self(slug))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalizes a display name into a dash-separated lowercase slug.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

impl AsRef<str> for ServiceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ServiceId {
    type Error = DirectoryDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
