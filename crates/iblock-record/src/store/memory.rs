// # Memory Content Store
//
// In-memory implementation of all four content-store services.
//
// ## Purpose
//
// Provides a small, fully functional backend for tests, demos and
// embedding scenarios where no real content platform is available.
//
// ## Behaviour
//
// - Container and element ids are assigned sequentially from 1
// - Ids are reported as digit strings, as the platform does
// - Filters match loosely: scalars compare by their text form, and an array
//   on either side matches if any of its items does
// - Unknown property codes are dropped on write
//
// ## Crash Behavior
//
// - All state is lost when the store is dropped

use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::Error;
use crate::query::{Criteria, SortDirection, SortKey};
use crate::record::ContainerId;
use crate::schema::{self, ACTIVE_FIELD, ACTIVE_YES, CONTAINER_FIELD, ID_FIELD};
use crate::traits::{
    AttributeDefinition, AttributeQuery, AttributeRegistry, ContainerDirectory, ContainerQuery,
    ContainerSummary, ElementId, ElementPayload, ElementQuery, ElementSource, ElementWriter,
    FetchedElement, PropertyValue,
};

/// An element as held by the memory store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoredElement {
    /// Owning container
    pub container_id: ContainerId,
    /// Fixed fields (without `ID` and `IBLOCK_ID`)
    pub fields: Map<String, Value>,
    /// Property values keyed by code
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone)]
struct StoredContainer {
    id: ContainerId,
    code: String,
    active: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    containers: Vec<StoredContainer>,
    definitions: Vec<AttributeDefinition>,
    elements: BTreeMap<ElementId, StoredElement>,
    next_container_id: u64,
    next_definition_id: u64,
    next_element_id: u64,
}

impl MemoryState {
    fn has_container(&self, container_id: ContainerId) -> bool {
        self.containers.iter().any(|c| c.id == container_id)
    }

    fn is_known_property(&self, container_id: ContainerId, code: &str) -> bool {
        self.definitions
            .iter()
            .any(|d| d.container_id == container_id && d.active && d.code == code)
    }

    fn active_definitions(&self, container_id: ContainerId) -> impl Iterator<Item = &AttributeDefinition> {
        self.definitions
            .iter()
            .filter(move |d| d.container_id == container_id && d.active)
    }

    /// Copy payload data into `element`, skipping identity fields and unknown properties
    fn apply(&self, element: &mut StoredElement, payload: &ElementPayload) {
        for (name, value) in &payload.fields {
            if name == ID_FIELD || name == CONTAINER_FIELD {
                continue;
            }
            element.fields.insert(name.clone(), value.clone());
        }
        for (code, value) in &payload.property_values {
            if self.is_known_property(element.container_id, code) {
                element.properties.insert(code.clone(), value.clone());
            } else {
                debug!("Dropping unknown property {} for container {}", code, element.container_id);
            }
        }
    }

    fn fetch(&self, id: ElementId, element: &StoredElement) -> FetchedElement {
        let mut fields = element.fields.clone();
        fields.insert(ID_FIELD.to_string(), Value::from(id.to_string()));
        fields.insert(
            CONTAINER_FIELD.to_string(),
            Value::from(element.container_id.to_string()),
        );

        let properties = self
            .active_definitions(element.container_id)
            .map(|definition| {
                let value = element
                    .properties
                    .get(&definition.code)
                    .cloned()
                    .unwrap_or(Value::Null);
                (definition.code.clone(), PropertyValue::new(value))
            })
            .collect();

        FetchedElement { fields, properties }
    }
}

/// In-memory content store
///
/// # Example
///
/// ```rust
/// use iblock_record::MemoryContentStore;
/// use iblock_record::traits::{ContainerDirectory, ContainerQuery};
///
/// let store = MemoryContentStore::new();
/// let id = store.add_container("news");
///
/// let found = store.list_containers(&ContainerQuery::by_code("news")).unwrap();
/// assert_eq!(found[0].id, id.to_string());
/// ```
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    inner: RwLock<MemoryState>,
}

impl MemoryContentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an active container with the given code
    pub fn add_container(&self, code: impl Into<String>) -> ContainerId {
        let mut state = self.write();
        state.next_container_id += 1;
        let id = state.next_container_id;
        state.containers.push(StoredContainer {
            id,
            code: code.into(),
            active: true,
        });
        id
    }

    /// Add an active container under a fixed id
    ///
    /// Later [`add_container`](Self::add_container) calls continue after the
    /// highest id in use.
    pub fn add_container_with_id(
        &self,
        id: ContainerId,
        code: impl Into<String>,
    ) -> Result<ContainerId, Error> {
        if id == 0 {
            return Err(Error::invalid_input("container id must be positive"));
        }
        let mut state = self.write();
        if state.has_container(id) {
            return Err(Error::invalid_input(format!("container {id} already exists")));
        }
        state.next_container_id = state.next_container_id.max(id);
        state.containers.push(StoredContainer {
            id,
            code: code.into(),
            active: true,
        });
        Ok(id)
    }

    /// Register an active property on a container
    ///
    /// Returns the definition id.
    pub fn define_property(
        &self,
        container_id: ContainerId,
        code: impl Into<String>,
        name: impl Into<String>,
        sort: i64,
    ) -> u64 {
        let mut state = self.write();
        state.next_definition_id += 1;
        let id = state.next_definition_id;
        state.definitions.push(AttributeDefinition {
            id,
            container_id,
            code: code.into(),
            name: name.into(),
            sort,
            active: true,
        });
        id
    }

    /// Mark a property inactive; returns whether it existed
    pub fn deactivate_property(&self, container_id: ContainerId, code: &str) -> bool {
        let mut state = self.write();
        let mut found = false;
        for definition in state
            .definitions
            .iter_mut()
            .filter(|d| d.container_id == container_id && d.code == code)
        {
            definition.active = false;
            found = true;
        }
        found
    }

    /// Seed an element directly
    pub fn insert_element(
        &self,
        container_id: ContainerId,
        fields: Map<String, Value>,
        properties: Map<String, Value>,
    ) -> Result<ElementId, Error> {
        let mut payload = ElementPayload {
            fields,
            property_values: properties,
        };
        payload
            .fields
            .insert(CONTAINER_FIELD.to_string(), Value::from(container_id));
        self.create_element(&payload)
    }

    /// Snapshot of a stored element
    pub fn element(&self, id: ElementId) -> Option<StoredElement> {
        self.read().elements.get(&id).cloned()
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        self.read().elements.len()
    }

    /// Whether no elements are stored
    pub fn is_empty(&self) -> bool {
        self.read().elements.is_empty()
    }
}

impl ContainerDirectory for MemoryContentStore {
    fn list_containers(&self, query: &ContainerQuery) -> Result<Vec<ContainerSummary>, Error> {
        let state = self.read();
        Ok(state
            .containers
            .iter()
            .filter(|c| query.code.as_deref().is_none_or(|code| c.code == code))
            .map(|c| ContainerSummary {
                id: c.id.to_string(),
                code: Some(c.code.clone()),
                name: None,
                active: c.active,
            })
            .collect())
    }
}

impl ElementSource for MemoryContentStore {
    fn list_elements(&self, query: &ElementQuery) -> Result<Vec<FetchedElement>, Error> {
        let state = self.read();
        let descending = query
            .order
            .iter()
            .any(|key| key.field.eq_ignore_ascii_case(ID_FIELD) && key.direction == SortDirection::Desc);

        let mut matches: Vec<(ElementId, &StoredElement)> = state
            .elements
            .iter()
            .filter(|(id, element)| matches_filter(**id, element, &query.filter))
            .map(|(id, element)| (*id, element))
            .collect();
        if descending {
            matches.reverse();
        }

        let limit = query.page_size.unwrap_or(usize::MAX);
        Ok(matches
            .into_iter()
            .take(limit)
            .map(|(id, element)| state.fetch(id, element))
            .collect())
    }
}

impl ElementWriter for MemoryContentStore {
    fn create_element(&self, payload: &ElementPayload) -> Result<ElementId, Error> {
        let container_id = payload
            .field(CONTAINER_FIELD)
            .and_then(schema::parse_id)
            .ok_or_else(|| Error::element_write("payload has no container id"))?;

        let mut state = self.write();
        if !state.has_container(container_id) {
            return Err(Error::element_write(format!("unknown container {container_id}")));
        }

        let mut element = StoredElement {
            container_id,
            ..StoredElement::default()
        };
        state.apply(&mut element, payload);
        element
            .fields
            .entry(ACTIVE_FIELD)
            .or_insert_with(|| Value::from(ACTIVE_YES));

        state.next_element_id += 1;
        let id = state.next_element_id;
        state.elements.insert(id, element);
        Ok(id)
    }

    fn update_element(&self, id: ElementId, payload: &ElementPayload) -> Result<(), Error> {
        let mut state = self.write();
        let Some(mut element) = state.elements.remove(&id) else {
            return Err(Error::element_write(format!("element {id} does not exist")));
        };
        state.apply(&mut element, payload);
        state.elements.insert(id, element);
        Ok(())
    }
}

impl AttributeRegistry for MemoryContentStore {
    fn list_attribute_definitions(
        &self,
        query: &AttributeQuery,
    ) -> Result<Vec<AttributeDefinition>, Error> {
        let state = self.read();
        let mut definitions: Vec<AttributeDefinition> = state
            .definitions
            .iter()
            .filter(|d| d.container_id == query.container_id)
            .filter(|d| !query.active_only || d.active)
            .cloned()
            .collect();
        definitions.sort_by(|a, b| compare_definitions(a, b, &query.order));
        Ok(definitions)
    }
}

fn compare_definitions(a: &AttributeDefinition, b: &AttributeDefinition, order: &[SortKey]) -> Ordering {
    for key in order {
        let ordering = match key.field.to_ascii_lowercase().as_str() {
            "sort" => a.sort.cmp(&b.sort),
            "name" => a.name.cmp(&b.name),
            "code" => a.code.cmp(&b.code),
            "id" => a.id.cmp(&b.id),
            _ => Ordering::Equal,
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    a.id.cmp(&b.id)
}

fn matches_filter(id: ElementId, element: &StoredElement, filter: &Criteria) -> bool {
    filter.iter().all(|(key, expected)| {
        let actual = if key == ID_FIELD {
            Value::from(id)
        } else if key == CONTAINER_FIELD {
            Value::from(element.container_id)
        } else if let Some(code) = schema::property_code(key) {
            element.properties.get(code).cloned().unwrap_or(Value::Null)
        } else {
            element.fields.get(key).cloned().unwrap_or(Value::Null)
        };
        loose_eq(expected, &actual)
    })
}

fn loose_eq(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Array(options), _) => options.iter().any(|option| loose_eq(option, actual)),
        (_, Value::Array(values)) => values.iter().any(|value| loose_eq(expected, value)),
        _ => scalar_text(expected) == scalar_text(actual),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "Y".to_string(),
        Value::Bool(false) => "N".to_string(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
