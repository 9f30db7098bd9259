//! Catalog validation errors.

use std::fmt;

use crate::TypeId;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur when building or validating a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Type id does not fit the 9-bit on-disk field.
    InvalidTypeId { id: TypeId },

    /// The same type id appears twice.
    DuplicateTypeId { id: TypeId },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTypeId { id } => {
                write!(f, "type id 0x{id:X} exceeds 0x{:X}", crate::MAX_TYPE_ID)
            }
            Self::DuplicateTypeId { id } => write!(f, "duplicate type id 0x{id:X}"),
        }
    }
}

impl std::error::Error for CatalogError {}
