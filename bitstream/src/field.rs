//! Packed bit fields inside little-endian 16-bit words.

/// A contiguous run of bits within a 16-bit word.
///
/// Fields are declared as constants; an out-of-range declaration fails at
/// compile time rather than at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitField {
    shift: u8,
    width: u8,
}

impl BitField {
    /// Creates a field covering `width` bits starting at bit `shift` (bit 0 is the LSB).
    #[must_use]
    pub const fn new(shift: u8, width: u8) -> Self {
        assert!(width > 0, "bit field must be at least one bit wide");
        assert!(
            shift as u32 + width as u32 <= 16,
            "bit field must fit in a 16-bit word"
        );
        Self { shift, width }
    }

    /// Creates a single-bit flag field.
    #[must_use]
    pub const fn flag(bit: u8) -> Self {
        Self::new(bit, 1)
    }

    /// Returns the bit offset of the field's least significant bit.
    #[must_use]
    pub const fn shift(self) -> u8 {
        self.shift
    }

    /// Returns the field width in bits.
    #[must_use]
    pub const fn width(self) -> u8 {
        self.width
    }

    /// Returns the in-place mask for this field.
    #[must_use]
    pub const fn mask(self) -> u16 {
        (((1u32 << self.width) - 1) as u16) << self.shift
    }

    /// Returns the largest value the field can hold.
    #[must_use]
    pub const fn max_value(self) -> u16 {
        ((1u32 << self.width) - 1) as u16
    }

    /// Extracts the field from a word.
    #[must_use]
    pub const fn extract(self, word: u16) -> u16 {
        (word & self.mask()) >> self.shift
    }

    /// Extracts the field from a single byte (bits 8..16 read as zero).
    #[must_use]
    pub const fn extract_u8(self, byte: u8) -> u8 {
        self.extract(byte as u16) as u8
    }

    /// Returns `true` if any bit of the field is set.
    #[must_use]
    pub const fn is_set(self, word: u16) -> bool {
        word & self.mask() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_for_common_widths() {
        assert_eq!(BitField::new(0, 4).mask(), 0x000F);
        assert_eq!(BitField::new(6, 10).mask(), 0xFFC0);
        assert_eq!(BitField::new(0, 16).mask(), 0xFFFF);
        assert_eq!(BitField::flag(15).mask(), 0x8000);
    }

    #[test]
    fn extract_high_field() {
        // bits 6..16 carry the value 0x3FF
        let field = BitField::new(6, 10);
        assert_eq!(field.extract(0xFFC0), 0x3FF);
        assert_eq!(field.extract(0x003F), 0);
        assert_eq!(field.max_value(), 1023);
    }

    #[test]
    fn extract_middle_field_ignores_neighbours() {
        let field = BitField::new(7, 3);
        assert_eq!(field.extract(0b0000_0011_1000_0000), 0b111);
        assert_eq!(field.extract(0b1111_1100_0111_1111), 0);
    }

    #[test]
    fn extract_u8_masks_to_byte() {
        let hunger = BitField::new(0, 7);
        assert_eq!(hunger.extract_u8(0xFF), 0x7F);
    }

    #[test]
    fn flag_is_set() {
        let flag = BitField::flag(13);
        assert!(flag.is_set(1 << 13));
        assert!(!flag.is_set(!(1 << 13)));
    }

    #[test]
    fn accessors() {
        let field = BitField::new(10, 4);
        assert_eq!(field.shift(), 10);
        assert_eq!(field.width(), 4);
    }

    #[test]
    fn const_constructible() {
        const FIELD: BitField = BitField::new(4, 4);
        assert_eq!(FIELD.extract(0x00F0), 0xF);
    }
}
