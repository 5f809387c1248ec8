//! Embedding example for iblock-record
//!
//! Seeds an in-memory catalog, then walks one element through the record
//! lifecycle: create, find, update, and the ignored/unbound edge cases.
//!
//! Set `IBLOCK_RECORD_LOG=debug` to see every allowlist and gate decision.

use anyhow::{Context, Result};
use iblock_record::{
    ContainerRef, Criteria, ElementRecord, FindOutcome, MemoryContentStore, RecordConfig,
    StoreServices,
};
use serde_json::json;
use std::env;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

fn init_tracing() -> Result<()> {
    let level = env::var("IBLOCK_RECORD_LOG").unwrap_or_else(|_| "info".to_string());
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")
}

fn seed() -> Arc<MemoryContentStore> {
    let store = Arc::new(MemoryContentStore::new());
    let catalog = store.add_container("catalog");
    store.define_property(catalog, "COLOR", "Color", 100);
    store.define_property(catalog, "SIZE", "Size", 200);
    store
}

fn main() -> Result<()> {
    init_tracing()?;

    let store = seed();
    let services = StoreServices::from_store(store.clone());

    // Create
    let mut draft = ElementRecord::new(services.clone(), ContainerRef::code("catalog"));
    draft.set("CODE", "red-chair")?;
    draft.set("PROPERTY_COLOR", "red")?;
    draft.set("PROPERTY_SIZE", json!(["S", "M"]))?;
    if !draft.set("PRICE", 120)? {
        info!("PRICE is not a catalog attribute and was ignored");
    }
    let created = draft.save().context("create failed")?;
    info!("Created element {}", created.element_id());

    // Find
    let searcher = ElementRecord::new(services.clone(), ContainerRef::code("catalog"));
    let mut chair = match searcher.find(Criteria::new().with("CODE", "red-chair"))? {
        FindOutcome::Found(record) => record,
        FindOutcome::NotFound => anyhow::bail!("red-chair vanished"),
        FindOutcome::Unbound => anyhow::bail!("catalog container is missing"),
    };
    info!(
        "Found element {:?} with color {:?}",
        chair.element_id(),
        chair.get("PROPERTY_COLOR")?
    );

    // Update
    chair.set("PROPERTY_COLOR", "blue")?;
    let updated = chair.save().context("update failed")?;
    info!("Updated element {}", updated.element_id());

    // Strict mode and unbound records
    let strict = RecordConfig::default().with_strict(true);
    let mut checked = ElementRecord::with_config(services.clone(), ContainerRef::code("catalog"), strict);
    if let Err(e) = checked.set("PRICE", 120) {
        warn!("Strict record refused attribute: {}", e);
    }

    let mut orphan = ElementRecord::new(services, ContainerRef::code("archive"));
    if let Err(e) = orphan.save() {
        warn!("Unbound record refused to save: {}", e);
    }

    info!("Store now holds {} element(s)", store.len());
    Ok(())
}
