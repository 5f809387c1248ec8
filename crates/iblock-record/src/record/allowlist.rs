//! Attribute allowlist
//!
//! The set of attribute names a record accepts: the fixed fields plus
//! `PROPERTY_<code>` for every active property registered on the container.

use crate::error::Result;
use crate::schema::{self, FIXED_FIELD_NAMES};
use crate::traits::{AttributeQuery, AttributeRegistry};
use std::collections::BTreeSet;
use tracing::debug;

use super::ContainerId;

/// Legal attribute names for one container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allowlist {
    properties: BTreeSet<String>,
}

impl Allowlist {
    /// Allowlist with the fixed fields only (unbound records)
    pub fn fixed_only() -> Self {
        Self::default()
    }

    /// Allowlist with the fixed fields plus the given property codes
    pub fn with_property_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            properties: codes
                .into_iter()
                .map(|code| schema::property_name(code.as_ref()))
                .collect(),
        }
    }

    /// Check membership
    pub fn contains(&self, name: &str) -> bool {
        schema::is_fixed_field(name) || self.properties.contains(name)
    }

    /// Prefixed property names, sorted
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(String::as_str)
    }

    /// Every allowed name, sorted and deduplicated
    pub fn names(&self) -> Vec<String> {
        let mut names: BTreeSet<&str> = FIXED_FIELD_NAMES.iter().copied().collect();
        names.extend(self.property_names());
        names.into_iter().map(str::to_string).collect()
    }
}

/// Build the allowlist of `container_id` from the registry
///
/// Unbound records get the fixed fields only and never touch the registry.
pub(crate) fn load(
    registry: &dyn AttributeRegistry,
    container_id: Option<ContainerId>,
) -> Result<Allowlist> {
    let Some(container_id) = container_id else {
        return Ok(Allowlist::fixed_only());
    };

    let definitions = registry.list_attribute_definitions(&AttributeQuery::active_for(container_id))?;
    let total = definitions.len();
    let codes: Vec<String> = definitions
        .into_iter()
        .filter(|definition| definition.active && !definition.code.is_empty())
        .map(|definition| definition.code)
        .collect();

    debug!(
        "Loaded {} of {} property definitions for container {}",
        codes.len(),
        total,
        container_id
    );

    Ok(Allowlist::with_property_codes(codes))
}
