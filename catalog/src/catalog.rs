//! Type id → name/category lookup.

use std::collections::BTreeMap;

use crate::error::{CatalogError, CatalogResult};
use crate::{TypeId, MAX_TYPE_ID};

/// Category reported for type ids missing from the catalog.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Display data for one object type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectInfo {
    pub name: String,
    pub category: String,
}

impl ObjectInfo {
    /// Creates object info from a name and category.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }

    /// The generic stand-in for a type id the catalog does not know.
    #[must_use]
    pub fn placeholder(id: TypeId) -> Self {
        Self {
            name: format!("unknown object 0x{id:03X}"),
            category: UNKNOWN_CATEGORY.to_string(),
        }
    }
}

/// One catalog row as produced by the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub id: TypeId,
    pub name: String,
    pub category: String,
}

/// On-disk shape of a catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogFile {
    pub objects: Vec<CatalogEntry>,
}

/// Lookup from type id to [`ObjectInfo`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectCatalog {
    entries: BTreeMap<TypeId, ObjectInfo>,
}

impl ObjectCatalog {
    /// Creates an empty catalog; every lookup resolves to a placeholder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from entries after validation.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry.id, ObjectInfo::new(entry.name, entry.category))?;
        }
        Ok(catalog)
    }

    /// Builds a catalog from a parsed catalog file.
    pub fn from_file(file: CatalogFile) -> CatalogResult<Self> {
        Self::from_entries(file.objects)
    }

    /// Adds one entry, rejecting out-of-range and duplicate ids.
    pub fn insert(&mut self, id: TypeId, info: ObjectInfo) -> CatalogResult<()> {
        if id > MAX_TYPE_ID {
            return Err(CatalogError::InvalidTypeId { id });
        }
        if self.entries.contains_key(&id) {
            return Err(CatalogError::DuplicateTypeId { id });
        }
        self.entries.insert(id, info);
        Ok(())
    }

    /// Returns the entry for a type id, if the catalog has one.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&ObjectInfo> {
        self.entries.get(&id)
    }

    /// Returns the entry for a type id, or a placeholder when missing.
    #[must_use]
    pub fn resolve(&self, id: TypeId) -> ObjectInfo {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| ObjectInfo::placeholder(id))
    }

    /// Returns the number of known type ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in ascending type id order.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &ObjectInfo)> {
        self.entries.iter().map(|(id, info)| (*id, info))
    }
}
