//! Configuration types for element records
//!
//! A record needs very little configuration: how it reacts to attribute
//! names outside the allowlist, and whether the allowlist is memoized.

use serde::{Deserialize, Serialize};

/// Per-record behaviour settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Reject disallowed attribute names instead of ignoring them
    ///
    /// When `false` (the default) `set` silently drops unknown names and
    /// `get` reports them as absent. When `true` both return
    /// [`Error::DisallowedAttribute`](crate::Error::DisallowedAttribute), and
    /// attribute registry failures are surfaced instead of degrading to the
    /// fixed-field allowlist.
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Memoize the container allowlist for the lifetime of the record
    ///
    /// The container of a record never changes, so the cache cannot go stale
    /// within one record. Disable it to query the attribute registry on every
    /// access.
    #[serde(default = "default_cache_allowlist")]
    pub cache_allowlist: bool,
}

impl RecordConfig {
    /// Create a configuration with defaults
    pub fn new() -> Self {
        Self {
            strict: default_strict(),
            cache_allowlist: default_cache_allowlist(),
        }
    }

    /// Enable or disable strict attribute checking
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Enable or disable allowlist memoization
    pub fn with_cache_allowlist(mut self, cache_allowlist: bool) -> Self {
        self.cache_allowlist = cache_allowlist;
        self
    }

    /// Parse a configuration from JSON, filling in defaults for missing keys
    pub fn from_json(raw: &str) -> Result<Self, crate::Error> {
        serde_json::from_str(raw).map_err(|e| crate::Error::config(e.to_string()))
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_strict() -> bool {
    false
}

fn default_cache_allowlist() -> bool {
    true
}
