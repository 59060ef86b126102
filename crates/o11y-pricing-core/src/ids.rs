//! Identifier types for o11y-pricing.
//!
//! Every metered axis of the catalog is keyed by a [`DimensionId`]. Ids are
//! short ASCII keys such as `metrics` or `k8sHostHours`; they are validated
//! once on construction so the rest of the engine can treat them as opaque.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Maximum length of a dimension id in bytes.
pub const MAX_DIMENSION_ID_LEN: usize = 64;

/// Well-known dimension ids of the built-in catalog.
pub mod dims {
    /// Active metrics series.
    pub const METRICS: &str = "metrics";
    /// Log ingestion in GB.
    pub const LOGS: &str = "logs";
    /// Trace ingestion in GB.
    pub const TRACES: &str = "traces";
    /// Continuous profiling in GB.
    pub const PROFILES: &str = "profiles";
    /// Kubernetes monitoring host-hours.
    pub const K8S_HOST_HOURS: &str = "k8sHostHours";
    /// Kubernetes monitoring container-hours.
    pub const K8S_CONTAINER_HOURS: &str = "k8sContainerHours";
    /// Application observability host-hours.
    pub const APP_HOST_HOURS: &str = "appHostHours";
    /// Frontend (RUM) sessions.
    pub const FRONTEND_SESSIONS: &str = "frontendSessions";
    /// Synthetic API check executions.
    pub const SYNTHETICS_API: &str = "syntheticsAPI";
    /// Synthetic browser check executions.
    pub const SYNTHETICS_BROWSER: &str = "syntheticsBrowser";
    /// Standard users.
    pub const USERS: &str = "users";
    /// Enterprise plugin users.
    pub const ENTERPRISE_USERS: &str = "enterpriseUsers";
    /// Incident response users.
    pub const IRM_USERS: &str = "irmUsers";
    /// k6 virtual-user hours.
    pub const K6: &str = "k6";
}

/// A pricing dimension identifier.
///
/// Ordering and hashing follow the underlying string, so a `DimensionId` can
/// be looked up in maps by `&str` through [`Borrow`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DimensionId(String);

impl DimensionId {
    /// Create a validated dimension id.
    ///
    /// # Errors
    ///
    /// Returns [`IdError`] if the id is empty, too long, or contains
    /// characters other than ASCII alphanumerics, `_` and `-`.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        let id = id.into();
        validate(&id)?;
        Ok(Self(id))
    }

    /// Build an id from a compile-time constant such as those in [`dims`].
    pub(crate) fn from_static(id: &'static str) -> Self {
        debug_assert!(validate(id).is_ok(), "invalid built-in dimension id {id}");
        Self(id.to_owned())
    }

    /// Return the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(id: &str) -> Result<(), IdError> {
    if id.is_empty() {
        return Err(IdError::Empty);
    }
    if id.len() > MAX_DIMENSION_ID_LEN {
        return Err(IdError::TooLong {
            len: id.len(),
            max: MAX_DIMENSION_ID_LEN,
        });
    }
    if let Some(c) = id
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
    {
        return Err(IdError::InvalidCharacter(c));
    }
    Ok(())
}

impl FromStr for DimensionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Debug for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DimensionId({})", self.0)
    }
}

impl fmt::Display for DimensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DimensionId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DimensionId> for String {
    fn from(id: DimensionId) -> Self {
        id.0
    }
}

impl AsRef<str> for DimensionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DimensionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The id was empty.
    #[error("dimension id must not be empty")]
    Empty,

    /// The id exceeded the maximum length.
    #[error("dimension id is {len} bytes, maximum is {max}")]
    TooLong {
        /// Actual length in bytes.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// The id contained a disallowed character.
    #[error("invalid character {0:?} in dimension id")]
    InvalidCharacter(char),
}
