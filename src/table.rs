//! Defines the [`Handle`] and [`AllocationTable`] types.

use std::collections::BTreeMap;
use std::fmt;

use static_assertions::assert_impl_all;
use tracing::warn;

use crate::gap::Gap;

/// Caller-chosen name of a live allocation, rendered as `ptr[n]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(pub u32);

assert_impl_all!(Handle: Copy, Send, Sync, Ord);

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ptr[{}]", self.0)
    }
}

impl From<u32> for Handle {
    fn from(n: u32) -> Self {
        Handle(n)
    }
}

/// Records which gap was granted to which handle.
#[derive(Clone, Debug, Default)]
pub struct AllocationTable {
    entries: BTreeMap<Handle, Gap>,
}

impl AllocationTable {
    pub fn new() -> Self {
        AllocationTable::default()
    }

    /// Records that `gap` now belongs to `handle`.
    /// An existing record for `handle` is overwritten and its gap is lost.
    pub fn insert(&mut self, handle: Handle, gap: Gap) {
        if let Some(old) = self.entries.insert(handle, gap) {
            warn!(%handle, %old, new = %gap, "Handle reallocated while live, previous gap leaked.");
        }
    }

    /// Removes the record for `handle` and returns its gap,
    /// or an empty gap at address 0 if `handle` holds nothing.
    pub fn remove(&mut self, handle: Handle) -> Gap {
        self.entries.remove(&handle).unwrap_or_default()
    }

    pub fn get(&self, handle: Handle) -> Option<Gap> {
        self.entries.get(&handle).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the live allocations ordered by handle.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, Gap)> + '_ {
        self.entries.iter().map(|(h, g)| (*h, *g))
    }

    /// Sum of the lengths of all live allocations.
    pub fn allocated_space(&self) -> usize {
        self.entries.values().map(|g| g.length).sum()
    }
}

impl fmt::Display for AllocationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (handle, gap) in &self.entries {
            writeln!(f, "{}->{}", handle.0, gap)?;
        }
        Ok(())
    }
}
