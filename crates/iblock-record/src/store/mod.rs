// # Content Store Implementations
//
// This module provides implementations of the content-store service traits.

pub mod memory;

pub use memory::{MemoryContentStore, StoredElement};
