//! Persistence
//!
//! `save` writes the attribute store back through the element writer:
//! create while the record is new, update by `ID` afterwards. No retries,
//! no concurrency checks.

use crate::error::{Error, Result};
use crate::schema::{self, CONTAINER_FIELD};
use crate::traits::{ElementId, ElementPayload};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::ElementRecord;

/// Result of a successful [`ElementRecord::save`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new element was created
    Created(ElementId),
    /// An existing element was updated
    Updated(ElementId),
}

impl SaveOutcome {
    /// Id of the written element
    pub fn element_id(&self) -> ElementId {
        match self {
            Self::Created(id) | Self::Updated(id) => *id,
        }
    }
}

impl ElementRecord {
    /// Build the write payload for the current attributes
    ///
    /// `PROPERTY_<code>` attributes move into the nested property values
    /// (prefix stripped); everything else is a field. The container id is
    /// always written into `IBLOCK_ID`.
    pub fn payload(&self) -> Result<ElementPayload> {
        let container_id = self.container_id.ok_or(Error::NotBound)?;

        let mut payload = ElementPayload::default();
        for (name, value) in &self.attributes {
            match schema::property_code(name) {
                Some(code) => {
                    payload.property_values.insert(code.to_string(), value.clone());
                }
                None => {
                    payload.fields.insert(name.clone(), value.clone());
                }
            }
        }
        payload
            .fields
            .insert(CONTAINER_FIELD.to_string(), Value::from(container_id));

        Ok(payload)
    }

    /// Persist the record
    ///
    /// The attribute store is left untouched either way; after a create the
    /// new id is reported through [`SaveOutcome::Created`] only.
    ///
    /// # Returns
    ///
    /// - `Ok(SaveOutcome::Created(id))`: New element written, `is_new` is now `false`
    /// - `Ok(SaveOutcome::Updated(id))`: Existing element updated
    /// - `Err(Error::NotBound)`: No container; no service was called
    /// - `Err(Error::MissingIdentifier)`: Persisted record without a usable `ID`
    /// - `Err(Error)`: The writer rejected the element
    pub fn save(&mut self) -> Result<SaveOutcome> {
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(e) => {
                warn!("save() on unbound record, nothing written");
                return Err(e);
            }
        };

        if self.is_new {
            debug!("Creating element in container {:?}", self.container_id);
            let id = self.services.writer.create_element(&payload)?;
            if id == 0 {
                return Err(Error::element_write("create returned no element id"));
            }
            self.is_new = false;
            info!("Created element {} in container {:?}", id, self.container_id);
            return Ok(SaveOutcome::Created(id));
        }

        let id = self.element_id().ok_or(Error::MissingIdentifier)?;
        debug!("Updating element {} in container {:?}", id, self.container_id);
        self.services.writer.update_element(id, &payload)?;
        info!("Updated element {} in container {:?}", id, self.container_id);
        Ok(SaveOutcome::Updated(id))
    }
}
