//! Reference data consumed by the arkdiff decoders.
//!
//! This crate holds everything that describes *what a type id means*, as
//! immutable data passed explicitly into each component:
//! - [`ObjectCatalog`]: type id → name/category lookup, supplied by an external
//!   extraction pipeline, tolerant of missing entries
//! - [`TypeRules`]: the type-id range tables used for enrichment and comparison
//! - Deterministic catalog hashing
//!
//! # Design Principles
//!
//! - **No globals** - Tables are values; concurrent decodes never share mutable state.
//! - **Never fail a lookup** - Unknown type ids resolve to a placeholder.
//! - **Deterministic hashing** - The catalog hash is stable given the same entries.

mod catalog;
mod error;
mod hash;
mod rules;

pub use catalog::{CatalogEntry, CatalogFile, ObjectCatalog, ObjectInfo, UNKNOWN_CATEGORY};
pub use error::{CatalogError, CatalogResult};
pub use hash::catalog_hash;
pub use rules::{IgnoreRule, StatePair, TrackedProperty, TypeRange, TypeRules};

/// An object type id (9 bits on disk).
pub type TypeId = u16;

/// Largest type id representable in an object record.
pub const MAX_TYPE_ID: TypeId = 0x1FF;
