//! The allocation engine.
//!
// The engine is the only code mutating the free list and the allocation table.
// Strategies only read the free list (see `crate::strategies`), so every state
// change happens in `alloc` and `free` below:
//
// - `alloc` asks the strategy for a gap, removes it from the free list, records
//   the first `size` bytes as the allocation and puts the remainder back.
//   A failed selection returns before anything is touched.
// - `free` takes the handle's gap out of the table and inserts it into the free
//   list as is. Neighbouring gaps are not merged, and an unknown handle yields an
//   empty gap at address 0 which is inserted all the same.
//
// With valid requests (no live handle reused, no handle freed twice) the free
// space plus the allocated space always equals the space the engine was built
// with.

use std::fmt;

use static_assertions::assert_impl_all;
use tracing::{debug, instrument, warn, Level};

use crate::error::{Error, Result};
use crate::freelist::FreeList;
use crate::strategies::{self, Placement, Selection};
use crate::table::{AllocationTable, Handle};

/// Diagnostics of a successful allocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AllocResponse {
    /// Start of the granted range.
    pub address: usize,
    /// Number of free-list entries the strategy examined.
    pub visited: usize,
}

/// Services alloc/free requests over a fixed address range.
#[derive(Debug)]
pub struct Engine {
    free_list: FreeList,
    table: AllocationTable,
    strategy: Box<dyn Placement>,
    base_addr: usize,
    total_space: usize,
}

assert_impl_all!(Engine: Send);

impl Engine {
    /// Creates an engine managing `[base_addr, base_addr + size)` with the
    /// strategy registered under `strategy_name`.
    ///
    /// Fails with [`InvalidRange`](Error::InvalidRange) if `base_addr + size`
    /// does not fit in `usize`.
    pub fn new(strategy_name: &str, base_addr: usize, size: usize) -> Result<Self> {
        let strategy = strategies::from_name(strategy_name)?;
        Engine::from_boxed(strategy, base_addr, size)
    }

    /// Creates an engine managing `[base_addr, base_addr + size)` with the provided strategy.
    pub fn with_strategy<P: Placement + 'static>(
        strategy: P,
        base_addr: usize,
        size: usize,
    ) -> Result<Self> {
        Engine::from_boxed(Box::new(strategy), base_addr, size)
    }

    fn from_boxed(strategy: Box<dyn Placement>, base_addr: usize, size: usize) -> Result<Self> {
        // No gap ever ends past `base_addr + size`.
        if base_addr.checked_add(size).is_none() {
            return Err(Error::InvalidRange { base_addr, size });
        }
        debug!(strategy = strategy.name(), base_addr, size, "Creating engine.");
        Ok(Engine {
            free_list: FreeList::new(base_addr, size),
            table: AllocationTable::new(),
            strategy,
            base_addr,
            total_space: size,
        })
    }

    /// Allocates `size` bytes under `handle`.
    ///
    /// On failure the engine is left exactly as it was.
    #[instrument(
        level = "info",
        skip(self),
        fields(strategy = self.strategy.name()),
        ret(level = Level::INFO),
        err(Display, level = Level::ERROR)
    )]
    pub fn alloc(&mut self, handle: Handle, size: usize) -> Result<AllocResponse> {
        let Selection { gap, visited } = self.strategy.select(&self.free_list, size);

        let Some(gap) = gap else {
            debug!(visited, free_list = %self.free_list, "No gap can serve the request.");
            return Err(Error::NoEligibleGap { requested: size, visited });
        };
        debug_assert!(gap.length >= size, "Strategy picked {gap} for {size} bytes.");
        debug!(%gap, visited, "Selected gap.");

        self.free_list.remove(gap);
        let (granted, rest) = gap.split(size);
        self.table.insert(handle, granted);

        if let Some(rest) = rest {
            debug!(%rest, "Returning remainder to the free list.");
            self.free_list.insert(rest);
        }

        Ok(AllocResponse { address: granted.address, visited })
    }

    /// Releases the allocation held by `handle`.
    ///
    /// Never fails. Freeing a handle that holds nothing inserts an empty gap at
    /// address 0 into the free list.
    #[instrument(level = "info", skip(self))]
    pub fn free(&mut self, handle: Handle) {
        if self.table.get(handle).is_none() {
            warn!(%handle, "Freeing a handle with no allocation, inserting an empty gap.");
        }
        let gap = self.table.remove(handle);
        debug!(%gap, "Returning gap to the free list.");
        self.free_list.insert(gap);
    }

    #[inline]
    pub fn free_list(&self) -> &FreeList {
        &self.free_list
    }

    #[inline]
    pub fn table(&self) -> &AllocationTable {
        &self.table
    }

    #[inline]
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    #[inline]
    pub fn base_addr(&self) -> usize {
        self.base_addr
    }

    #[inline]
    pub fn total_space(&self) -> usize {
        self.total_space
    }

    /// Free space plus allocated space.
    /// Equals [`total_space`](Engine::total_space) as long as requests are valid.
    pub fn accounted_space(&self) -> usize {
        self.free_list.free_space() + self.table.allocated_space()
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "freelist:{},store:{}", self.free_list, self.table)
    }
}

#[cfg(test)]
mod tests;
