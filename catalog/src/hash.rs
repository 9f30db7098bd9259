//! Deterministic catalog hashing.

use blake3::Hasher;

use crate::ObjectCatalog;

/// Computes a deterministic fingerprint of a catalog's contents.
#[must_use]
pub fn catalog_hash(catalog: &ObjectCatalog) -> u64 {
    let mut hasher = Hasher::new();
    write_u32(&mut hasher, catalog.len() as u32);

    for (id, info) in catalog.iter() {
        write_u16(&mut hasher, id);
        write_str(&mut hasher, &info.name);
        write_str(&mut hasher, &info.category);
    }

    let hash = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_bytes()[0..8]);
    u64::from_le_bytes(prefix)
}

fn write_str(hasher: &mut Hasher, value: &str) {
    write_u32(hasher, value.len() as u32);
    hasher.update(value.as_bytes());
}

fn write_u16(hasher: &mut Hasher, value: u16) {
    hasher.update(&value.to_le_bytes());
}

fn write_u32(hasher: &mut Hasher, value: u32) {
    hasher.update(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogEntry, ObjectCatalog};

    fn catalog(entries: &[(u16, &str, &str)]) -> ObjectCatalog {
        ObjectCatalog::from_entries(entries.iter().map(|(id, name, category)| CatalogEntry {
            id: *id,
            name: (*name).to_string(),
            category: (*category).to_string(),
        }))
        .unwrap()
    }

    #[test]
    fn catalog_hash_is_stable() {
        let c = catalog(&[(0x140, "door", "door"), (0x10F, "lock", "trap")]);
        assert_eq!(catalog_hash(&c), catalog_hash(&c.clone()));
    }

    #[test]
    fn catalog_hash_ignores_insertion_order() {
        let a = catalog(&[(1, "a", "x"), (2, "b", "y")]);
        let b = catalog(&[(2, "b", "y"), (1, "a", "x")]);
        assert_eq!(catalog_hash(&a), catalog_hash(&b));
    }

    #[test]
    fn catalog_hash_changes_with_names() {
        let a = catalog(&[(1, "torch", "light")]);
        let b = catalog(&[(1, "lit torch", "light")]);
        assert_ne!(catalog_hash(&a), catalog_hash(&b));
    }

    #[test]
    fn catalog_hash_separates_name_and_category() {
        // Length prefixes keep "ab"+"c" distinct from "a"+"bc".
        let a = catalog(&[(1, "ab", "c")]);
        let b = catalog(&[(1, "a", "bc")]);
        assert_ne!(catalog_hash(&a), catalog_hash(&b));
    }
}
