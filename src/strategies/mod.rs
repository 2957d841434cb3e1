//! Placement strategies and the [`Placement`] trait they implement.
//!
//! A strategy only looks at the free list. It picks the gap a request should be
//! carved from and reports how many entries it examined on the way. Removing the
//! gap, splitting it and recording the allocation is left to the
//! [`Engine`](crate::Engine), so strategies never have to keep the free list
//! and the allocation table consistent themselves.
//!
//! Strategies are looked up by name with [`from_name`]. Each name maps to its
//! own implementation; a variant with different semantics (for instance a
//! best-fit that coalesces neighbours) gets a new name rather than a flag.

pub mod best;

pub use best::Best;

use std::fmt::Debug;

use crate::error::{Error, Result};
use crate::freelist::FreeList;
use crate::gap::Gap;

/// Outcome of scanning the free list for a request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// The chosen gap, or `None` if no gap can serve the request.
    pub gap: Option<Gap>,
    /// Number of free-list entries examined.
    pub visited: usize,
}

/// A policy choosing which free gap serves an allocation request.
pub trait Placement: Debug + Send {
    /// The name the strategy is selected by.
    fn name(&self) -> &'static str;

    /// Picks the gap of `free_list` that should serve a request of `size` bytes.
    ///
    /// Implementors must return a gap that is an entry of `free_list`
    /// and whose length is at least `size`.
    fn select(&mut self, free_list: &FreeList, size: usize) -> Selection;
}

/// Names accepted by [`from_name`].
pub const STRATEGY_NAMES: &[&str] = &[Best::NAME];

/// Builds the strategy registered under `name`.
pub fn from_name(name: &str) -> Result<Box<dyn Placement>> {
    match name {
        Best::NAME => Ok(Box::new(Best)),
        _ => Err(Error::UnknownStrategy(name.to_owned())),
    }
}
