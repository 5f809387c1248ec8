//! External service interfaces
//!
//! This module defines the abstract interfaces a content store must provide.
//!
//! - [`ContainerDirectory`]: Resolve containers by code
//! - [`ElementSource`]: Query elements
//! - [`ElementWriter`]: Create and update elements
//! - [`AttributeRegistry`]: List container property definitions
//!
//! [`StoreServices`] bundles one implementation of each for injection into records.

pub mod attribute_registry;
pub mod container_directory;
pub mod element_source;
pub mod element_writer;

pub use attribute_registry::{AttributeDefinition, AttributeQuery, AttributeRegistry};
pub use container_directory::{ContainerDirectory, ContainerQuery, ContainerSummary};
pub use element_source::{ElementQuery, ElementSource, FetchedElement, PropertyValue};
pub use element_writer::{ElementId, ElementPayload, ElementWriter};

use std::fmt;
use std::sync::Arc;

/// The four services a record talks to
///
/// Cloning is cheap; clones share the same service instances.
#[derive(Clone)]
pub struct StoreServices {
    /// Container lookup
    pub containers: Arc<dyn ContainerDirectory>,
    /// Element query
    pub elements: Arc<dyn ElementSource>,
    /// Element create/update
    pub writer: Arc<dyn ElementWriter>,
    /// Property definitions
    pub attributes: Arc<dyn AttributeRegistry>,
}

impl StoreServices {
    /// Assemble services from separate implementations
    pub fn new(
        containers: Arc<dyn ContainerDirectory>,
        elements: Arc<dyn ElementSource>,
        writer: Arc<dyn ElementWriter>,
        attributes: Arc<dyn AttributeRegistry>,
    ) -> Self {
        Self {
            containers,
            elements,
            writer,
            attributes,
        }
    }

    /// Use one backend for all four services
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ContainerDirectory + ElementSource + ElementWriter + AttributeRegistry + 'static,
    {
        Self {
            containers: store.clone(),
            elements: store.clone(),
            writer: store.clone(),
            attributes: store,
        }
    }
}

impl fmt::Debug for StoreServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreServices").finish_non_exhaustive()
    }
}
