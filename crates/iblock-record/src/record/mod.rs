//! Active-record access to a single element
//!
//! An [`ElementRecord`] is bound to one container for its whole life and
//! holds the attributes of at most one element of that container.
//!
//! ## Lifecycle
//!
//! ```text
//!  new(container) ──► resolve ──► bound / unbound
//!                                     │
//!          ┌──────────────────────────┼──────────────────────┐
//!          ▼                          ▼                      ▼
//!   set / get (gated)        find(criteria)             save()
//!          │                 → new snapshot     create (is_new) / update
//!          └───────── allowlist: fixed fields ∪ PROPERTY_<code> ─┘
//! ```
//!
//! ## Attribute Gate
//!
//! Every read and write is checked against the container allowlist. Names
//! outside it are ignored on write and reported absent on read, unless the
//! record is configured as strict.
//!
//! ## Example
//!
//! ```rust
//! use iblock_record::{ContainerRef, ElementRecord, MemoryContentStore, SaveOutcome, StoreServices};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryContentStore::new());
//! let catalog = store.add_container("catalog");
//! store.define_property(catalog, "COLOR", "Color", 100);
//!
//! let services = StoreServices::from_store(store.clone());
//! let mut record = ElementRecord::new(services, ContainerRef::code("catalog"));
//! assert_eq!(record.container_id(), Some(catalog));
//!
//! record.set("CODE", "red-chair").unwrap();
//! record.set("PROPERTY_COLOR", "red").unwrap();
//! assert!(!record.set("NOT_A_FIELD", "x").unwrap());
//!
//! let outcome = record.save().unwrap();
//! assert!(matches!(outcome, SaveOutcome::Created(_)));
//! assert!(!record.is_new());
//! ```

pub mod allowlist;
pub mod find;
pub mod resolve;
pub mod save;

pub use allowlist::Allowlist;
pub use find::FindOutcome;
pub use save::SaveOutcome;

use crate::config::RecordConfig;
use crate::error::{Error, Result};
use crate::schema::{self, ID_FIELD};
use crate::traits::{ElementId, StoreServices};
use serde_json::Value;
use std::borrow::Cow;
use std::cell::OnceCell;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Identity of a container
pub type ContainerId = u64;

/// How a record names its container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerRef {
    /// Numeric id; only positive values bind
    Id(i64),
    /// Symbolic code, looked up in the container directory
    Code(String),
}

impl ContainerRef {
    /// Reference a container by code
    pub fn code(code: impl Into<String>) -> Self {
        Self::Code(code.into())
    }
}

impl From<i64> for ContainerRef {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ContainerRef {
    fn from(code: &str) -> Self {
        Self::Code(code.to_string())
    }
}

impl From<String> for ContainerRef {
    fn from(code: String) -> Self {
        Self::Code(code)
    }
}

/// One element of one container, with gated attribute access
///
/// ## Threading
///
/// A record is meant to be owned by a single caller for the duration of one
/// operation. It is `Send` but not `Sync`; share it only behind external
/// synchronization.
#[derive(Debug, Clone)]
pub struct ElementRecord {
    services: StoreServices,
    config: RecordConfig,
    /// Resolved once at construction, never changed afterwards
    container_id: Option<ContainerId>,
    is_new: bool,
    attributes: HashMap<String, Value>,
    /// Memoized allowlist, valid because `container_id` is fixed
    allowlist: OnceCell<Allowlist>,
}

impl ElementRecord {
    /// Create a record bound to `container` with the default configuration
    ///
    /// Resolution never fails: an unresolvable id or code leaves the record
    /// unbound, which turns [`find`](Self::find) into
    /// [`FindOutcome::Unbound`] and [`save`](Self::save) into
    /// [`Error::NotBound`].
    pub fn new(services: StoreServices, container: impl Into<ContainerRef>) -> Self {
        Self::with_config(services, container, RecordConfig::default())
    }

    /// Create a record with an explicit configuration
    pub fn with_config(
        services: StoreServices,
        container: impl Into<ContainerRef>,
        config: RecordConfig,
    ) -> Self {
        let container = container.into();
        let container_id = resolve::resolve(services.containers.as_ref(), &container);

        Self {
            services,
            config,
            container_id,
            is_new: true,
            attributes: HashMap::new(),
            allowlist: OnceCell::new(),
        }
    }

    /// Resolved container id, `None` when unbound
    pub fn container_id(&self) -> Option<ContainerId> {
        self.container_id
    }

    /// Whether a container was resolved
    pub fn is_bound(&self) -> bool {
        self.container_id.is_some()
    }

    /// Whether the record has not been loaded or created yet
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    /// The record's configuration
    pub fn config(&self) -> &RecordConfig {
        &self.config
    }

    /// Element id from the `ID` attribute, if present and valid
    pub fn element_id(&self) -> Option<ElementId> {
        self.attributes.get(ID_FIELD).and_then(schema::parse_id)
    }

    /// Iterate over stored attributes (unordered)
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Every attribute name this record accepts, sorted
    pub fn allowed_names(&self) -> Result<Vec<String>> {
        Ok(self.allowlist()?.names())
    }

    /// Check whether `name` is in the allowlist
    pub fn is_allowed(&self, name: &str) -> Result<bool> {
        Ok(self.allowlist()?.contains(name))
    }

    /// Read an attribute
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: The attribute is allowed and set
    /// - `Ok(None)`: The attribute is unset, or not allowed (lenient mode)
    /// - `Err(Error::DisallowedAttribute)`: Not allowed (strict mode)
    pub fn get(&self, name: &str) -> Result<Option<&Value>> {
        if !self.is_allowed(name)? {
            self.reject(name)?;
            return Ok(None);
        }
        Ok(self.attributes.get(name))
    }

    /// Write an attribute
    ///
    /// # Returns
    ///
    /// - `Ok(true)`: The value was stored
    /// - `Ok(false)`: The name is not allowed and the value was dropped (lenient mode)
    /// - `Err(Error::DisallowedAttribute)`: Not allowed (strict mode)
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<bool> {
        let name = name.into();
        if !self.is_allowed(&name)? {
            self.reject(&name)?;
            return Ok(false);
        }
        self.attributes.insert(name, value.into());
        Ok(true)
    }

    fn reject(&self, name: &str) -> Result<()> {
        if self.config.strict {
            return Err(Error::disallowed(name, self.container_id));
        }
        debug!(
            "Ignoring attribute {} not allowed for container {:?}",
            name, self.container_id
        );
        Ok(())
    }

    /// Current allowlist, loaded on first use
    ///
    /// A registry failure in lenient mode degrades to the fixed fields for
    /// this call only; nothing is cached so the next access retries.
    fn allowlist(&self) -> Result<Cow<'_, Allowlist>> {
        match self.registered_allowlist() {
            Ok(allowlist) => Ok(allowlist),
            Err(e) if !self.config.strict => {
                warn!(
                    "Attribute registry failed for container {:?}, using fixed fields only: {}",
                    self.container_id, e
                );
                Ok(Cow::Owned(Allowlist::fixed_only()))
            }
            Err(e) => Err(e),
        }
    }

    /// Allowlist as reported by the registry, with no fallback
    pub(crate) fn registered_allowlist(&self) -> Result<Cow<'_, Allowlist>> {
        if let Some(cached) = self.allowlist.get() {
            return Ok(Cow::Borrowed(cached));
        }

        let loaded = allowlist::load(self.services.attributes.as_ref(), self.container_id)?;

        if self.config.cache_allowlist {
            Ok(Cow::Borrowed(self.allowlist.get_or_init(|| loaded)))
        } else {
            Ok(Cow::Owned(loaded))
        }
    }

    /// Replace the attribute store wholesale (used by find)
    fn with_loaded(&self, attributes: HashMap<String, Value>) -> Self {
        let mut snapshot = self.clone();
        snapshot.attributes = attributes;
        snapshot.is_new = false;
        snapshot
    }
}
