//! Test doubles and common utilities for record contract tests
//!
//! `RecordingStore` wraps the in-memory store, counts every service call and
//! records what was sent, so tests can assert both outcomes and traffic.

#![allow(dead_code)]

use iblock_record::error::{Error, Result};
use iblock_record::traits::{
    AttributeDefinition, AttributeQuery, AttributeRegistry, ContainerDirectory, ContainerQuery,
    ContainerSummary, ElementId, ElementPayload, ElementQuery, ElementSource, ElementWriter,
    FetchedElement,
};
use iblock_record::{ContainerId, MemoryContentStore, StoreServices};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// A content store that tracks calls and can be told to fail
#[derive(Default)]
pub struct RecordingStore {
    /// Backing store
    pub inner: MemoryContentStore,
    container_calls: AtomicUsize,
    element_calls: AtomicUsize,
    create_calls: AtomicUsize,
    update_calls: AtomicUsize,
    registry_calls: AtomicUsize,
    fail_directory: AtomicBool,
    fail_registry: AtomicBool,
    fail_writes: AtomicBool,
    /// Makes create_element report id 0 without storing anything
    zero_creates: AtomicBool,
    /// Overrides the element listing when set
    scripted_elements: Mutex<Option<Vec<FetchedElement>>>,
    /// Overrides the container listing when set
    scripted_containers: Mutex<Option<Vec<ContainerSummary>>>,
    element_queries: Mutex<Vec<ElementQuery>>,
    created: Mutex<Vec<ElementPayload>>,
    updated: Mutex<Vec<(ElementId, ElementPayload)>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Services backed by this store
    pub fn services(self: &Arc<Self>) -> StoreServices {
        StoreServices::from_store(Arc::clone(self))
    }

    pub fn container_calls(&self) -> usize {
        self.container_calls.load(Ordering::SeqCst)
    }

    pub fn element_calls(&self) -> usize {
        self.element_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn registry_calls(&self) -> usize {
        self.registry_calls.load(Ordering::SeqCst)
    }

    /// Total calls across all four services
    pub fn total_calls(&self) -> usize {
        self.container_calls()
            + self.element_calls()
            + self.create_calls()
            + self.update_calls()
            + self.registry_calls()
    }

    pub fn fail_directory(&self, fail: bool) {
        self.fail_directory.store(fail, Ordering::SeqCst);
    }

    pub fn fail_registry(&self, fail: bool) {
        self.fail_registry.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn zero_creates(&self, zero: bool) {
        self.zero_creates.store(zero, Ordering::SeqCst);
    }

    pub fn script_elements(&self, elements: Vec<FetchedElement>) {
        *self.scripted_elements.lock().unwrap() = Some(elements);
    }

    pub fn script_containers(&self, containers: Vec<ContainerSummary>) {
        *self.scripted_containers.lock().unwrap() = Some(containers);
    }

    /// Element queries issued so far
    pub fn element_queries(&self) -> Vec<ElementQuery> {
        self.element_queries.lock().unwrap().clone()
    }

    /// Payloads passed to create_element so far
    pub fn created(&self) -> Vec<ElementPayload> {
        self.created.lock().unwrap().clone()
    }

    /// (id, payload) pairs passed to update_element so far
    pub fn updated(&self) -> Vec<(ElementId, ElementPayload)> {
        self.updated.lock().unwrap().clone()
    }
}

impl ContainerDirectory for RecordingStore {
    fn list_containers(&self, query: &ContainerQuery) -> Result<Vec<ContainerSummary>> {
        self.container_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_directory.load(Ordering::SeqCst) {
            return Err(Error::container_lookup("directory offline"));
        }
        if let Some(scripted) = self.scripted_containers.lock().unwrap().clone() {
            return Ok(scripted);
        }
        self.inner.list_containers(query)
    }
}

impl ElementSource for RecordingStore {
    fn list_elements(&self, query: &ElementQuery) -> Result<Vec<FetchedElement>> {
        self.element_calls.fetch_add(1, Ordering::SeqCst);
        self.element_queries.lock().unwrap().push(query.clone());
        if let Some(scripted) = self.scripted_elements.lock().unwrap().clone() {
            return Ok(scripted);
        }
        self.inner.list_elements(query)
    }
}

impl ElementWriter for RecordingStore {
    fn create_element(&self, payload: &ElementPayload) -> Result<ElementId> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.created.lock().unwrap().push(payload.clone());
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::element_write("create rejected"));
        }
        if self.zero_creates.load(Ordering::SeqCst) {
            return Ok(0);
        }
        self.inner.create_element(payload)
    }

    fn update_element(&self, id: ElementId, payload: &ElementPayload) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.updated.lock().unwrap().push((id, payload.clone()));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::element_write("update rejected"));
        }
        self.inner.update_element(id, payload)
    }
}

impl AttributeRegistry for RecordingStore {
    fn list_attribute_definitions(&self, query: &AttributeQuery) -> Result<Vec<AttributeDefinition>> {
        self.registry_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_registry.load(Ordering::SeqCst) {
            return Err(Error::attribute_registry("registry offline"));
        }
        self.inner.list_attribute_definitions(query)
    }
}

/// Store with a `catalog` container under id 7 carrying COLOR and SIZE properties
pub fn catalog_store() -> (Arc<RecordingStore>, ContainerId) {
    let store = RecordingStore::new();
    let catalog = store
        .inner
        .add_container_with_id(7, "catalog")
        .expect("fresh store accepts container 7");
    store.inner.define_property(catalog, "COLOR", "Color", 100);
    store.inner.define_property(catalog, "SIZE", "Size", 200);
    (store, catalog)
}

/// Build a JSON object map from a `json!` literal
pub fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().expect("object literal")
}
