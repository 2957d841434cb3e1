//! Defines the [`FreeList`] struct.

use std::fmt;

use crate::gap::Gap;

/// The free gaps of the simulated heap, kept sorted by address.
///
/// Adjacent gaps are never merged: a gap ending where another begins
/// stays a separate entry, so long alloc/free sequences fragment the list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FreeList {
    gaps: Vec<Gap>,
}

impl FreeList {
    /// Creates a list holding a single gap spanning `[base_addr, base_addr + size)`.
    pub fn new(base_addr: usize, size: usize) -> Self {
        FreeList { gaps: vec![Gap::new(base_addr, size)] }
    }

    /// Inserts `gap` keeping the list address-ascending.
    /// A gap whose address is already present goes after the existing entries.
    /// This operation has a time complexity of *O*(n).
    pub fn insert(&mut self, gap: Gap) {
        debug_assert!(
            self.gaps.iter().all(|g| !g.overlaps(&gap)),
            "{gap} overlaps a free gap in {self}"
        );
        let idx = self.gaps.partition_point(|g| g.address <= gap.address);
        self.gaps.insert(idx, gap);
    }

    /// Removes the entry starting at `gap.address`.
    /// Does nothing if there is no such entry.
    ///
    /// Lengths are only compared to tell apart entries sharing an address
    /// (an empty gap next to a real one): an exact match is removed first,
    /// otherwise the first entry at that address.
    pub fn remove(&mut self, gap: Gap) {
        let idx = self
            .gaps
            .iter()
            .position(|g| *g == gap)
            .or_else(|| self.gaps.iter().position(|g| g.address == gap.address));
        if let Some(idx) = idx {
            self.gaps.remove(idx);
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn size(&self) -> usize {
        self.gaps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Returns the entries, address-ascending.
    #[inline]
    pub fn entries(&self) -> &[Gap] {
        &self.gaps
    }

    /// Sum of the lengths of all entries.
    pub fn free_space(&self) -> usize {
        self.gaps.iter().map(|g| g.length).sum()
    }
}

impl fmt::Display for FreeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.gaps.iter().try_for_each(|g| write!(f, "{g}"))
    }
}
