//! Fixed-width slot bitsets for task activation and pending work

use core::fmt;
use core::ops::{BitAnd, BitOr, Not};

use crate::{RtkError, RtkResult};

mod private {
    pub trait Sealed {}
}

/// Unsigned integer backing a [`SlotMask`].
///
/// One bit per slot, slot `0` in the least significant bit. A mask of width
/// `WIDTH` addresses slots `0..WIDTH`.
pub trait MaskWord:
    Copy
    + Eq
    + fmt::Debug
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + Send
    + private::Sealed
{
    /// Number of addressable slots
    const WIDTH: usize;

    /// Word with no bit set
    const ZERO: Self;

    /// Word with only bit `slot` set; `slot` must be below `WIDTH`
    fn bit(slot: usize) -> Self;

    /// Number of set bits
    fn count_ones(self) -> u32;

    /// Index of the lowest set bit, `WIDTH` when empty
    fn trailing_zeros(self) -> u32;

    /// Widened raw value
    fn to_u128(self) -> u128;
}

macro_rules! impl_mask_word {
    ($($ty:ty),*) => {
        $(
            impl private::Sealed for $ty {}

            impl MaskWord for $ty {
                const WIDTH: usize = <$ty>::BITS as usize;
                const ZERO: Self = 0;

                #[inline]
                fn bit(slot: usize) -> Self {
                    (1 as $ty) << slot
                }

                #[inline]
                fn count_ones(self) -> u32 {
                    <$ty>::count_ones(self)
                }

                #[inline]
                fn trailing_zeros(self) -> u32 {
                    <$ty>::trailing_zeros(self)
                }

                #[inline]
                fn to_u128(self) -> u128 {
                    self as u128
                }
            }
        )*
    };
}

impl_mask_word!(u8, u16, u32, u64, u128);

/// Set of slot indices packed into a single word
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SlotMask<W: MaskWord>(W);

impl<W: MaskWord> SlotMask<W> {
    /// Empty mask
    pub const EMPTY: Self = Self(W::ZERO);

    /// Number of slots this mask can address
    pub const WIDTH: usize = W::WIDTH;

    /// Create a new empty mask
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Create a mask from its raw word
    pub const fn from_bits(bits: W) -> Self {
        Self(bits)
    }

    /// Raw word
    pub const fn bits(self) -> W {
        self.0
    }

    /// Set a slot; idempotent
    pub fn insert(&mut self, slot: usize) -> RtkResult<()> {
        if slot >= W::WIDTH {
            return Err(RtkError::InvalidIndex);
        }
        self.0 = self.0 | W::bit(slot);
        Ok(())
    }

    /// Clear a slot, returning whether it was set
    pub fn remove(&mut self, slot: usize) -> bool {
        if !self.contains(slot) {
            return false;
        }
        self.0 = self.0 & !W::bit(slot);
        true
    }

    /// Check if a slot is set
    pub fn contains(&self, slot: usize) -> bool {
        slot < W::WIDTH && (self.0 & W::bit(slot)) != W::ZERO
    }

    /// Check if no slot is set
    pub fn is_empty(&self) -> bool {
        self.0 == W::ZERO
    }

    /// Number of set slots
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Set slots in ascending index order
    pub fn iter(&self) -> SlotIter<W> {
        SlotIter { rest: self.0 }
    }
}

impl<W: MaskWord> Default for SlotMask<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: MaskWord> fmt::Debug for SlotMask<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<W: MaskWord> fmt::Display for SlotMask<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotMask({:#b})", self.0.to_u128())
    }
}

#[cfg(feature = "defmt")]
impl<W: MaskWord> defmt::Format for SlotMask<W> {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "SlotMask({=u128:b})", self.0.to_u128());
    }
}

impl<W: MaskWord> IntoIterator for SlotMask<W> {
    type Item = usize;
    type IntoIter = SlotIter<W>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the set slots of a [`SlotMask`], lowest first
#[derive(Debug, Clone)]
pub struct SlotIter<W: MaskWord> {
    rest: W,
}

impl<W: MaskWord> Iterator for SlotIter<W> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.rest == W::ZERO {
            return None;
        }
        let slot = self.rest.trailing_zeros() as usize;
        self.rest = self.rest & !W::bit(slot);
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut mask = SlotMask::<u32>::new();
        assert!(mask.is_empty());

        mask.insert(0).unwrap();
        mask.insert(5).unwrap();
        mask.insert(5).unwrap();

        assert!(mask.contains(0));
        assert!(mask.contains(5));
        assert!(!mask.contains(3));
        assert_eq!(mask.len(), 2);

        assert!(mask.remove(5));
        assert!(!mask.remove(5));
        assert_eq!(mask.bits(), 1);
    }

    #[test]
    fn test_top_slot_of_u64() {
        let mut mask = SlotMask::<u64>::new();
        mask.insert(63).unwrap();
        assert!(mask.contains(63));
        assert_eq!(mask.bits(), 1u64 << 63);
        assert_eq!(mask.insert(64), Err(RtkError::InvalidIndex));
        assert!(!mask.contains(64));
        assert!(mask.remove(63));
        assert!(mask.is_empty());
    }

    #[test]
    fn test_top_slot_of_u32() {
        let mut mask = SlotMask::<u32>::new();
        mask.insert(31).unwrap();
        assert_eq!(mask.bits(), 0x8000_0000);
        assert_eq!(mask.insert(32), Err(RtkError::InvalidIndex));
    }

    #[test]
    fn test_iter_ascending() {
        let mut mask = SlotMask::<u64>::new();
        for slot in [40, 2, 63, 0] {
            mask.insert(slot).unwrap();
        }
        let mut seen = [0usize; 4];
        for (i, slot) in mask.iter().enumerate() {
            seen[i] = slot;
        }
        assert_eq!(seen, [0, 2, 40, 63]);
    }

    #[test]
    fn test_union_intersection() {
        let a = SlotMask::<u8>::from_bits(0b0011);
        let b = SlotMask::<u8>::from_bits(0b0110);
        assert_eq!(a.union(b).bits(), 0b0111);
        assert_eq!(a.intersection(b).bits(), 0b0010);
        assert_eq!(SlotMask::<u8>::WIDTH, 8);
    }
}
