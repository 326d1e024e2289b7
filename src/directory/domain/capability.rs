//! Named capability descriptors advertised by services.

use super::DirectoryDomainError;
use serde::{Deserialize, Serialize};

/// A named, versioned capability a service offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capability {
    name: String,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Capability {
    /// Creates a validated capability.
    ///
    /// A blank version defaults to `1.0.0`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryDomainError::EmptyCapabilityName`] when the name is
    /// blank.
    pub fn new(
        raw_name: impl Into<String>,
        raw_version: impl Into<String>,
    ) -> Result<Self, DirectoryDomainError> {
        let name = raw_name.into().trim().to_owned();
        if name.is_empty() {
            return Err(DirectoryDomainError::EmptyCapabilityName);
        }

        let trimmed_version = raw_version.into().trim().to_owned();
        let version = if trimmed_version.is_empty() {
            "1.0.0".to_owned()
        } else {
            trimmed_version
        };

        Ok(Self {
            name,
            version,
            description: None,
        })
    }

    /// Adds a free-text description. Blank descriptions are ignored.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let normalized = description.into().trim().to_owned();
        if !normalized.is_empty() {
            self.description = Some(normalized);
        }
        self
    }

    /// Returns the capability name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the capability version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the optional description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
