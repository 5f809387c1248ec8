// # Element Writer Trait
//
// Defines the interface for creating and updating elements.
//
// ## Payload Shape
//
// Fixed fields sit at the top level of the payload; property values are
// nested under `PROPERTY_VALUES`, keyed by property code:
//
// ```json
// { "ACTIVE": "Y", "IBLOCK_ID": 5, "PROPERTY_VALUES": { "COLOR": "red" } }
// ```
//
// The writer adds no retries and no concurrency control; whatever the
// backing store guarantees is what callers get.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity of a stored element
pub type ElementId = u64;

/// Data written by a create or update call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPayload {
    /// Fixed fields, including the container id
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    /// Property values keyed by code (no prefix)
    #[serde(
        rename = "PROPERTY_VALUES",
        default,
        skip_serializing_if = "Map::is_empty"
    )]
    pub property_values: Map<String, Value>,
}

impl ElementPayload {
    /// Look up a fixed field
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a property value by code
    pub fn property(&self, code: &str) -> Option<&Value> {
        self.property_values.get(code)
    }

    /// Whether the payload carries any property values
    pub fn has_properties(&self) -> bool {
        !self.property_values.is_empty()
    }

    /// Render the payload as the flat JSON object the platform expects
    pub fn to_json(&self) -> Result<Value, crate::Error> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Trait for element write implementations
pub trait ElementWriter: Send + Sync {
    /// Create a new element
    ///
    /// # Returns
    ///
    /// - `Ok(ElementId)`: Id of the created element; `0` is treated as failure
    /// - `Err(Error)`: The store rejected the element
    fn create_element(&self, payload: &ElementPayload) -> Result<ElementId, crate::Error>;

    /// Update an existing element
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The update was accepted
    /// - `Err(Error)`: The store rejected the update
    fn update_element(&self, id: ElementId, payload: &ElementPayload) -> Result<(), crate::Error>;
}
