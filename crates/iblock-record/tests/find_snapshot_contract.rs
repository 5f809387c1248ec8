//! Contract Test: Find Snapshots
//!
//! `find` searches the bound container for one element and returns a new,
//! independent record.
//!
//! Constraints verified:
//! - Not-found and unbound are explicit, distinct outcomes
//! - Found records are persisted-state snapshots (`is_new == false`)
//! - The searching record is never mutated
//! - Service helper keys are filtered, properties are prefixed
//! - The issued query is capped at one element and pinned to the container
//! - A registry failure never yields a snapshot missing its properties

mod common;

use common::*;
use iblock_record::traits::{FetchedElement, PropertyValue};
use iblock_record::{ContainerRef, Criteria, ElementRecord, Error, FindOutcome};
use serde_json::json;

fn scripted_chair() -> FetchedElement {
    let mut element = FetchedElement::default();
    element.fields = object(json!({
        "ID": "42",
        "~ID": "42",
        "IBLOCK_ID": "7",
        "CODE": "red-chair",
        "~CODE": "red-chair",
        "ACTIVE": "Y",
        "NAME": "Red chair",
        "STATUS_VALUE": "In stock",
        "STATUS_VALUE_ID": "12",
    }));
    element
        .properties
        .insert("COLOR".to_string(), PropertyValue::new("red"));
    element
        .properties
        .insert("SIZE".to_string(), PropertyValue::new(json!(["S", "M"])));
    element
}

#[test]
fn catalog_lookup_materializes_fields_and_prefixed_properties() {
    let (store, _) = catalog_store();
    store.script_elements(vec![scripted_chair()]);

    let record = ElementRecord::new(store.services(), ContainerRef::code("catalog"));
    assert_eq!(record.container_id(), Some(7));

    let found = match record.find(Criteria::new()).unwrap() {
        FindOutcome::Found(found) => found,
        other => panic!("expected a match, got {other:?}"),
    };

    assert!(!found.is_new());
    assert_eq!(found.element_id(), Some(42));
    assert_eq!(found.get("ID").unwrap(), Some(&json!("42")));
    assert_eq!(found.get("CODE").unwrap(), Some(&json!("red-chair")));
    assert_eq!(found.get("PROPERTY_COLOR").unwrap(), Some(&json!("red")));
    assert_eq!(found.get("PROPERTY_SIZE").unwrap(), Some(&json!(["S", "M"])));

    let mut names: Vec<&str> = found.attributes().map(|(name, _)| name).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec!["ACTIVE", "CODE", "IBLOCK_ID", "ID", "PROPERTY_COLOR", "PROPERTY_SIZE"]
    );
}

#[test]
fn no_match_is_an_explicit_not_found() {
    let (store, _) = catalog_store();

    let record = ElementRecord::new(store.services(), ContainerRef::code("catalog"));
    let outcome = record.find(Criteria::new().with("CODE", "nothing")).unwrap();

    assert!(matches!(outcome, FindOutcome::NotFound));
    assert!(!outcome.is_found());
    assert!(outcome.into_record().is_none());
    assert_eq!(store.element_calls(), 1);
}

#[test]
fn unbound_find_is_distinct_from_not_found() {
    let store = RecordingStore::new();

    let record = ElementRecord::new(store.services(), ContainerRef::code("missing"));
    let outcome = record.find(Criteria::new()).unwrap();

    assert!(matches!(outcome, FindOutcome::Unbound));
    assert_eq!(store.element_calls(), 0);
}

#[test]
fn snapshot_is_independent_of_searching_record() {
    let (store, catalog) = catalog_store();
    store
        .inner
        .insert_element(
            catalog,
            object(json!({"CODE": "chair"})),
            object(json!({"COLOR": "red"})),
        )
        .unwrap();

    let mut searcher = ElementRecord::new(store.services(), ContainerRef::code("catalog"));
    searcher.set("SORT", 500).unwrap();

    let mut found = searcher
        .find(Criteria::new().with("CODE", "chair"))
        .unwrap()
        .into_record()
        .unwrap();

    // The searcher keeps its own state
    assert!(searcher.is_new());
    assert_eq!(searcher.get("SORT").unwrap(), Some(&json!(500)));
    assert_eq!(searcher.get("CODE").unwrap(), None);

    // The snapshot carries only fetched data
    assert_eq!(found.get("SORT").unwrap(), None);
    assert_eq!(found.get("CODE").unwrap(), Some(&json!("chair")));

    // Mutations do not leak in either direction
    found.set("PROPERTY_COLOR", "blue").unwrap();
    searcher.set("CODE", "other").unwrap();
    assert_eq!(searcher.get("PROPERTY_COLOR").unwrap(), None);
    assert_eq!(found.get("CODE").unwrap(), Some(&json!("chair")));
    assert_eq!(found.get("PROPERTY_COLOR").unwrap(), Some(&json!("blue")));
}

#[test]
fn query_defaults_active_and_pins_container() {
    let (store, _) = catalog_store();

    let record = ElementRecord::new(store.services(), ContainerRef::code("catalog"));
    record
        .find(Criteria::new().with("IBLOCK_ID", 99).with("CODE", "chair"))
        .unwrap();
    record.find(Criteria::new().with("ACTIVE", "N")).unwrap();
    record.find(Criteria::new().with("ACTIVE", false)).unwrap();

    let queries = store.element_queries();
    assert_eq!(queries.len(), 3);

    assert_eq!(queries[0].filter.get("IBLOCK_ID"), Some(&json!(7)));
    assert_eq!(queries[0].filter.get("ACTIVE"), Some(&json!("Y")));
    assert_eq!(queries[0].filter.get("CODE"), Some(&json!("chair")));
    assert_eq!(queries[1].filter.get("ACTIVE"), Some(&json!("N")));
    assert_eq!(queries[2].filter.get("ACTIVE"), Some(&json!("Y")));

    for query in &queries {
        assert_eq!(query.page_size, Some(1));
        assert!(query.select.is_empty());
    }
}

#[test]
fn inactive_elements_are_skipped_by_default() {
    let (store, catalog) = catalog_store();
    store
        .inner
        .insert_element(catalog, object(json!({"CODE": "old", "ACTIVE": "N"})), Default::default())
        .unwrap();

    let record = ElementRecord::new(store.services(), ContainerRef::code("catalog"));

    assert!(matches!(
        record.find(Criteria::new().with("CODE", "old")).unwrap(),
        FindOutcome::NotFound
    ));
    assert!(
        record
            .find(Criteria::new().with("CODE", "old").with("ACTIVE", "N"))
            .unwrap()
            .is_found()
    );
}

#[test]
fn find_propagates_registry_errors_in_strict_mode() {
    let (store, _) = catalog_store();
    store.script_elements(vec![scripted_chair()]);
    store.fail_registry(true);

    let config = iblock_record::RecordConfig::default().with_strict(true);
    let record = ElementRecord::with_config(store.services(), ContainerRef::code("catalog"), config);

    assert!(matches!(
        record.find(Criteria::new()),
        Err(Error::AttributeRegistry(_))
    ));
}

#[test]
fn find_propagates_registry_errors_in_lenient_mode() {
    let (store, catalog) = catalog_store();
    store
        .inner
        .insert_element(
            catalog,
            object(json!({"CODE": "chair"})),
            object(json!({"COLOR": "red"})),
        )
        .unwrap();

    let record = ElementRecord::new(store.services(), ContainerRef::code("catalog"));
    assert!(!record.config().strict);

    store.fail_registry(true);
    assert!(matches!(
        record.find(Criteria::new()),
        Err(Error::AttributeRegistry(_))
    ));

    // Nothing was cached by the failed attempt
    store.fail_registry(false);
    let found = record.find(Criteria::new()).unwrap().into_record().unwrap();
    assert_eq!(found.get("PROPERTY_COLOR").unwrap(), Some(&json!("red")));
    assert_eq!(found.get("CODE").unwrap(), Some(&json!("chair")));
}

#[test]
fn fields_outside_the_fixed_list_are_not_kept() {
    let (store, _) = catalog_store();
    store.script_elements(vec![scripted_chair()]);

    let record = ElementRecord::new(store.services(), ContainerRef::code("catalog"));
    let found = record.find(Criteria::new()).unwrap().into_record().unwrap();

    assert_eq!(found.get("NAME").unwrap(), None);
    assert!(found.attributes().all(|(name, _)| name != "NAME"));
}
