//! Element lookup
//!
//! `find` never mutates the record it is called on. A match produces a new,
//! independent record with `is_new == false` whose attributes are the
//! fetched element, filtered through the allowlist.

use crate::error::Result;
use crate::query::Criteria;
use crate::schema::{self, ACTIVE_FIELD, ACTIVE_YES, CONTAINER_FIELD};
use crate::traits::{ElementQuery, FetchedElement};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

use super::{Allowlist, ContainerId, ElementRecord};

/// Result of [`ElementRecord::find`]
#[derive(Debug, Clone)]
pub enum FindOutcome {
    /// An element matched; the snapshot record holds its attributes
    Found(ElementRecord),
    /// The container was searched and nothing matched
    NotFound,
    /// The record is not bound to a container; nothing was searched
    Unbound,
}

impl FindOutcome {
    /// Whether an element was found
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The found record, if any
    pub fn into_record(self) -> Option<ElementRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::NotFound | Self::Unbound => None,
        }
    }
}

impl ElementRecord {
    /// Find the first element of the bound container matching `criteria`
    ///
    /// `ACTIVE` defaults to `"Y"` when missing or falsy, and the container id
    /// always overrides any caller-supplied `IBLOCK_ID`. At most one element
    /// is requested.
    ///
    /// Raw fields outside the fixed field list (such as `NAME`) are not kept
    /// on the snapshot. The registry must answer for the snapshot to be
    /// built, so a registry failure is an error even in lenient mode.
    ///
    /// # Returns
    ///
    /// - `Ok(FindOutcome::Found(record))`: A fresh snapshot of the element
    /// - `Ok(FindOutcome::NotFound)`: No element matched
    /// - `Ok(FindOutcome::Unbound)`: The record has no container
    /// - `Err(Error)`: The element query or attribute registry failed
    pub fn find(&self, criteria: Criteria) -> Result<FindOutcome> {
        let Some(container_id) = self.container_id else {
            debug!("find() on unbound record, skipping search");
            return Ok(FindOutcome::Unbound);
        };

        let query = search_query(container_id, criteria);
        let mut elements = self.services.elements.list_elements(&query)?;

        if elements.is_empty() {
            debug!("No element in container {} matched {:?}", container_id, query.filter);
            return Ok(FindOutcome::NotFound);
        }

        let element = elements.swap_remove(0);
        let allowlist = self.registered_allowlist()?;
        let attributes = materialize(element, &allowlist);
        let snapshot = self.with_loaded(attributes);

        info!(
            "Loaded element {:?} from container {}",
            snapshot.element_id(),
            container_id
        );

        Ok(FindOutcome::Found(snapshot))
    }
}

/// Build the single-element query for `container_id`
fn search_query(container_id: ContainerId, mut criteria: Criteria) -> ElementQuery {
    let active_requested = criteria.get(ACTIVE_FIELD).is_some_and(schema::is_truthy);
    if !active_requested {
        criteria.insert(ACTIVE_FIELD, ACTIVE_YES);
    }
    criteria.insert(CONTAINER_FIELD, container_id);

    ElementQuery {
        order: Vec::new(),
        filter: criteria,
        select: Vec::new(),
        page_size: Some(1),
    }
}

/// Merge fields and prefixed properties into one attribute map
fn materialize(element: FetchedElement, allowlist: &Allowlist) -> HashMap<String, Value> {
    let mut attributes = HashMap::new();

    for (name, value) in element.fields {
        if schema::is_service_alias(&name) {
            continue;
        }
        if !allowlist.contains(&name) {
            debug!("Dropping field {} outside the allowlist", name);
            continue;
        }
        attributes.insert(name, value);
    }

    for (code, property) in element.properties {
        let name = schema::property_name(&code);
        if !allowlist.contains(&name) {
            debug!("Dropping property {} outside the allowlist", code);
            continue;
        }
        attributes.insert(name, property.value);
    }

    attributes
}
