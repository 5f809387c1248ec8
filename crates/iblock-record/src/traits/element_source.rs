// # Element Source Trait
//
// Defines the interface for querying elements of a container.
//
// ## Data Shape
//
// Each fetched element comes back in two parts:
// - `fields`: the raw field map, which also carries service helper keys
//   (`~NAME` copies, `*_VALUE` / `*_VALUE_ID` enumeration helpers)
// - `properties`: every property registered for the container, keyed by
//   property code
//
// Callers filter and rename on their side; the source does not project.

use crate::query::{Criteria, SortKey};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An element listing request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementQuery {
    /// Requested ordering
    pub order: Vec<SortKey>,
    /// Filter conditions; always includes the container id when issued by a record
    pub filter: Criteria,
    /// Field projection; empty means "everything"
    pub select: Vec<String>,
    /// Maximum number of elements to return
    pub page_size: Option<usize>,
}

/// Value of one property on a fetched element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Stored value: scalar, or an array for multi-valued properties
    pub value: Value,
    /// Optional per-value description
    #[serde(default)]
    pub description: Option<Value>,
}

impl PropertyValue {
    /// Wrap a plain value
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }
}

/// Raw element data as returned by the source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchedElement {
    /// Raw field map, including service helper keys
    pub fields: Map<String, Value>,
    /// Properties keyed by code
    pub properties: BTreeMap<String, PropertyValue>,
}

/// Trait for element query implementations
pub trait ElementSource: Send + Sync {
    /// List elements matching `query`
    ///
    /// Implementations must honour `query.page_size` when it is set.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<FetchedElement>)`: Matching elements in requested order
    /// - `Err(Error)`: The query failed
    fn list_elements(&self, query: &ElementQuery) -> Result<Vec<FetchedElement>, crate::Error>;
}
