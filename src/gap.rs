//! Defines the [`Gap`] value type.

use std::fmt;

use static_assertions::assert_impl_all;

/// A contiguous run of free (or granted) bytes.
///
/// Gaps are plain values: splitting one produces new gaps instead of
/// modifying the original. A gap with `length == 0` covers no addresses and is
/// what [`AllocationTable::remove`] hands back for a handle it never saw.
///
/// [`AllocationTable::remove`]: crate::table::AllocationTable::remove
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Gap {
    pub address: usize,
    pub length: usize,
}

assert_impl_all!(Gap: Copy, Send, Sync, Default);

impl Gap {
    #[inline(always)]
    pub const fn new(address: usize, length: usize) -> Self {
        Gap { address, length }
    }

    /// One past the last address covered by the gap.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.address + self.length
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns whether both gaps cover at least one common address.
    /// Empty gaps never overlap anything.
    #[inline]
    pub fn overlaps(&self, other: &Gap) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.address < other.end()
            && other.address < self.end()
    }

    /// Splits off the first `size` bytes.
    /// Returns the head of exactly `size` bytes and the remainder, if any.
    ///
    /// # Panics
    /// Panics in debug builds if `size` exceeds the gap's length.
    #[inline]
    pub fn split(self, size: usize) -> (Gap, Option<Gap>) {
        debug_assert!(size <= self.length, "Cannot split {size} bytes off {self}.");
        let head = Gap::new(self.address, size);
        let rest = (self.length > size).then(|| Gap::new(self.address + size, self.length - size));
        (head, rest)
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ addr:{} sz:{} ]", self.address, self.length)
    }
}
