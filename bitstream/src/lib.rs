//! Low-level reading primitives for the arkdiff decoders.
//!
//! This crate provides [`ByteReader`] for bounds-checked little-endian reads and
//! [`BitField`] for extracting packed fields out of 16-bit words.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about tiles, objects, or levels.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bitstream::{BitField, ByteReader};
//!
//! const TYPE_ID: BitField = BitField::new(0, 9);
//! const INVISIBLE: BitField = BitField::flag(14);
//!
//! let bytes = [0x40, 0x41];
//! let mut reader = ByteReader::new(&bytes);
//! let word = reader.read_u16().unwrap();
//!
//! assert_eq!(TYPE_ID.extract(word), 0x140);
//! assert!(INVISIBLE.is_set(word));
//! ```

mod error;
mod field;
mod reader;

pub use error::{BitError, BitResult};
pub use field::BitField;
pub use reader::ByteReader;
