// # iblock-record
//
// Active-record access to single elements of a hierarchical content store.
//
// ## Architecture Overview
//
// A content store groups elements into containers (info blocks). Every
// element has fixed fields shared by all containers plus properties defined
// per container. This crate wraps one element at a time:
//
// - **ElementRecord**: Holds one element's attributes, gated by an allowlist
// - **ContainerDirectory**: Trait for resolving containers by code
// - **ElementSource**: Trait for querying elements
// - **ElementWriter**: Trait for creating and updating elements
// - **AttributeRegistry**: Trait for listing container property definitions
// - **MemoryContentStore**: In-process implementation of all four traits
//
// ## Design Principles
//
// 1. **Gated access**: Only fixed fields and registered `PROPERTY_<code>`
//    names can be read or written
// 2. **Permissive by default**: Unknown names are ignored, not rejected,
//    unless the record is configured as strict
// 3. **Snapshots**: `find` returns a new record and never mutates the receiver
// 4. **No hidden policy**: No retries, caching across records or transactions

pub mod config;
pub mod error;
pub mod query;
pub mod record;
pub mod schema;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::RecordConfig;
pub use error::{Error, Result};
pub use query::{Criteria, SortDirection, SortKey};
pub use record::{Allowlist, ContainerId, ContainerRef, ElementRecord, FindOutcome, SaveOutcome};
pub use record::resolve::container_id_by_code;
pub use store::MemoryContentStore;
pub use traits::{
    AttributeRegistry, ContainerDirectory, ElementId, ElementPayload, ElementSource, ElementWriter,
    StoreServices,
};
