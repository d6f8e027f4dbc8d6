//! Error types for the evictkit library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by every fallible cache operation. The three
//!   variants map one-to-one onto the failure classes of the cache contract:
//!   malformed entries, illegal configuration or entry shape, and underflow
//!   on an empty store.
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (see [`Cache::check_invariants`](crate::cache::Cache::check_invariants)).
//!
//! No operation that returns an error has mutated the cache.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::builder::CacheBuilder;
//! use evictkit::error::CacheError;
//!
//! let err = CacheBuilder::new().capacity(0).build::<u32, u32>().unwrap_err();
//! assert!(matches!(err, CacheError::IllegalState(_)));
//! assert!(err.to_string().contains("capacity"));
//! ```

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by cache construction and cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// A required entry field is out of its domain (for example a negative
    /// per-entry TTL). Recoverable; the cache is untouched.
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Invalid construction parameters, an entry shape the policy does not
    /// accept, metrics queried while disabled, or an unsupported builder
    /// combination.
    #[error("illegal cache state: {0}")]
    IllegalState(String),

    /// `element_*` / `poll_*` invoked on an empty cache.
    #[error("cache underflow: {0}")]
    Underflow(&'static str),
}

impl CacheError {
    pub(crate) fn invalid_entry(msg: impl Into<String>) -> Self {
        Self::InvalidEntry(msg.into())
    }

    pub(crate) fn illegal_state(msg: impl Into<String>) -> Self {
        Self::IllegalState(msg.into())
    }
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
