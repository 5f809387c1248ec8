// # Container Directory Trait
//
// Defines the interface for listing containers (info blocks) of the
// content store.
//
// ## Purpose
//
// Records may be bound by symbolic container code instead of numeric id.
// The directory turns that code into the container's identity.
//
// ## Usage
//
// ```rust,ignore
// use iblock_record::traits::{ContainerDirectory, ContainerQuery};
//
// let directory = /* ContainerDirectory implementation */;
// let matches = directory.list_containers(&ContainerQuery::by_code("catalog"))?;
// let first_id = matches.first().map(|c| c.id.clone());
// ```

use crate::query::SortKey;
use serde::{Deserialize, Serialize};

/// Filter and options for a container listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerQuery {
    /// Only containers with this symbolic code
    pub code: Option<String>,
    /// Apply the store's permission checks to the listing
    pub check_permissions: bool,
    /// Requested ordering
    pub order: Vec<SortKey>,
}

impl ContainerQuery {
    /// Look up containers by code, bypassing permission checks
    pub fn by_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            check_permissions: false,
            order: Vec::new(),
        }
    }
}

/// Container as reported by the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Raw identity, as text (the directory reports ids as strings)
    pub id: String,
    /// Symbolic code
    pub code: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Whether the container is active
    pub active: bool,
}

/// Trait for container directory implementations
///
/// # Thread Safety
///
/// Implementations must be safe to share between threads; the directory is
/// injected into records as a trait object.
pub trait ContainerDirectory: Send + Sync {
    /// List containers matching `query`
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ContainerSummary>)`: Matching containers, possibly empty
    /// - `Err(Error)`: The directory could not be queried
    fn list_containers(&self, query: &ContainerQuery) -> Result<Vec<ContainerSummary>, crate::Error>;
}
