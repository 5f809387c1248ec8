// # Attribute Registry Trait
//
// Defines the interface for listing the property definitions registered
// for a container.
//
// Records use the registry to build their allowlist: every active
// definition contributes `PROPERTY_<code>` as a legal attribute name.

use crate::query::SortKey;
use serde::{Deserialize, Serialize};

/// Filter and ordering for a definition listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeQuery {
    /// Container whose definitions are listed
    pub container_id: u64,
    /// Only active definitions
    pub active_only: bool,
    /// Requested ordering
    pub order: Vec<SortKey>,
}

impl AttributeQuery {
    /// Active definitions of `container_id`, ordered by sort index then name
    pub fn active_for(container_id: u64) -> Self {
        Self {
            container_id,
            active_only: true,
            order: vec![SortKey::asc("sort"), SortKey::asc("name")],
        }
    }
}

/// A registered property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    /// Definition id
    pub id: u64,
    /// Owning container
    pub container_id: u64,
    /// Symbolic code, used in attribute names
    pub code: String,
    /// Display name
    pub name: String,
    /// Sort index
    pub sort: i64,
    /// Whether the definition is active
    pub active: bool,
}

/// Trait for attribute registry implementations
pub trait AttributeRegistry: Send + Sync {
    /// List definitions matching `query`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<AttributeDefinition>)`: Matching definitions in requested order
    /// - `Err(Error)`: The registry could not be queried
    fn list_attribute_definitions(
        &self,
        query: &AttributeQuery,
    ) -> Result<Vec<AttributeDefinition>, crate::Error>;
}
