//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`Oid`] - Git object identifier (the revision id of a commit)
//! - [`UtcTimestamp`] - Commit time normalized to UTC
//!
//! # Validation
//!
//! These types enforce validity at construction time. Invalid values
//! cannot be represented, preventing entire classes of bugs.
//!
//! # Examples
//!
//! ```
//! use pushrelay::core::types::Oid;
//!
//! let oid = Oid::new("ABC123DEF4567890ABC123DEF4567890ABC12345").unwrap();
//! assert_eq!(oid.as_str(), "abc123def4567890abc123def4567890abc12345");
//!
//! assert!(Oid::new("not-a-sha").is_err());
//! ```

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid object id: {0}")]
    InvalidOid(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

/// A validated Git object id.
///
/// Stored in canonical lowercase hex form. Both SHA-1 (40 characters) and
/// SHA-256 (64 characters) repositories are accepted.
///
/// # Example
///
/// ```
/// use pushrelay::core::types::Oid;
///
/// let oid = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
/// assert_eq!(oid.to_string(), "abc123def4567890abc123def4567890abc12345");
/// assert!(!oid.is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Oid(String);

impl Oid {
    /// The zero OID (40 zeros for SHA-1).
    const ZERO_SHA1: &'static str = "0000000000000000000000000000000000000000";

    /// Create a new validated object id.
    ///
    /// The OID is normalized to lowercase.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidOid` if the string is not a valid hex OID.
    pub fn new(oid: impl Into<String>) -> Result<Self, TypeError> {
        let oid = oid.into().to_ascii_lowercase();
        Self::validate(&oid)?;
        Ok(Self(oid))
    }

    /// Create the zero/null OID (40 zeros).
    ///
    /// Git uses this on the hook protocol to mean "the ref did not exist"
    /// (as `old`) or "the ref was deleted" (as `new`).
    ///
    /// # Example
    ///
    /// ```
    /// use pushrelay::core::types::Oid;
    ///
    /// let zero = Oid::zero();
    /// assert!(zero.is_zero());
    /// assert_eq!(zero.as_str().len(), 40);
    /// ```
    pub fn zero() -> Self {
        Self(Self::ZERO_SHA1.to_string())
    }

    /// Check if this is the zero/null OID.
    pub fn is_zero(&self) -> bool {
        self.0.chars().all(|c| c == '0')
    }

    /// Validate an object id.
    fn validate(oid: &str) -> Result<(), TypeError> {
        // SHA-1 is 40 hex chars, SHA-256 is 64
        if oid.len() != 40 && oid.len() != 64 {
            return Err(TypeError::InvalidOid(format!(
                "expected 40 or 64 hex characters, got {}",
                oid.len()
            )));
        }
        if !oid.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypeError::InvalidOid(
                "object id must be hexadecimal".into(),
            ));
        }
        Ok(())
    }

    /// Get the object id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Oid {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Oid> for String {
    fn from(oid: Oid) -> Self {
        oid.0
    }
}

impl AsRef<str> for Oid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Oid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in time normalized to UTC.
///
/// Git stores commit times as seconds since the epoch plus the committer's
/// local offset. The offset is discarded here: payloads always carry UTC.
///
/// # Example
///
/// ```
/// use pushrelay::core::types::UtcTimestamp;
///
/// let ts = UtcTimestamp::from_epoch_seconds(0).unwrap();
/// assert_eq!(ts.to_payload_string(), "1970-01-01T00:00:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTimestamp(DateTime<Utc>);

impl UtcTimestamp {
    /// Create a timestamp from seconds since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidTimestamp` if the value is out of range.
    pub fn from_epoch_seconds(seconds: i64) -> Result<Self, TypeError> {
        Utc.timestamp_opt(seconds, 0)
            .single()
            .map(Self)
            .ok_or(TypeError::InvalidTimestamp(seconds))
    }

    /// Render as `YYYY-MM-DDTHH:MM:SS+00:00`.
    pub fn to_payload_string(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S+00:00").to_string()
    }
}

impl std::fmt::Display for UtcTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_payload_string())
    }
}
