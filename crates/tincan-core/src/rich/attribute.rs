//! Inline text attributes

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Inline text attributes as a bitfield.
    ///
    /// Combine with bitwise OR: `Attribute::BOLD | Attribute::ITALIC`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Attribute: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
        const SPOILER = 1 << 4;
        const MONOSPACE = 1 << 5;
    }
}

impl Attribute {
    /// Number of distinct single-bit attributes
    pub const COUNT: usize = 6;

    /// Bit position of a single attribute, None for combinations
    pub fn index(self) -> Option<usize> {
        if self.bits().count_ones() == 1 {
            Some(self.bits().trailing_zeros() as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_only_for_single_bits() {
        assert_eq!(Attribute::BOLD.index(), Some(0));
        assert_eq!(Attribute::MONOSPACE.index(), Some(5));
        assert_eq!((Attribute::BOLD | Attribute::ITALIC).index(), None);
        assert_eq!(Attribute::empty().index(), None);
    }

    #[test]
    fn test_all_bits_fit_count() {
        assert_eq!(Attribute::all().bits().count_ones() as usize, Attribute::COUNT);
    }
}
