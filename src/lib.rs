//! A free-list allocator simulator.
//!
//! This crate reproduces the bookkeeping of a textbook heap allocator without ever touching real
//! memory. Addresses are plain integers, and allocations are just records of which range
//! belongs to whom. What you get back from every request is the same set of diagnostics an
//! allocator visualization exercise asks for: the address handed out, how many free-list
//! entries were searched, and what the free list looks like afterwards.
//!
//! # Usage
//! ```
//! use freespace::{Engine, Handle};
//!
//! let mut engine = Engine::new("BEST", 1000, 100).unwrap();
//!
//! let res = engine.alloc(Handle(0), 3).unwrap();
//! assert_eq!((res.address, res.visited), (1000, 1));
//! assert_eq!(engine.free_list().to_string(), "[ addr:1003 sz:97 ]");
//!
//! engine.free(Handle(0));
//! assert_eq!(engine.free_list().to_string(), "[ addr:1000 sz:3 ][ addr:1003 sz:97 ]");
//! ```
//!
//! Whole exercises can be replayed from their text form with [`Script`] and [`Simulation`],
//! which is what the `freespace` binary does.
//!
//! # Mode of operation
//! The [`Engine`] manages a single contiguous range `[base, base + size)`:
//! - When an allocation is requested the engine asks its [placement strategy](#strategies)
//!   which free gap to use. The chosen gap is taken off the free list, its first `size` bytes
//!   are recorded as the allocation and whatever is left is put back as a new, smaller gap.
//! - When an allocation is freed its range goes back onto the free list untouched. Adjacent
//!   free gaps are *not* merged, so the list only ever gets more fragmented.
//!
//! Below are the abstractions the engine operates on:
//!
//! ## Gaps
//! A [`Gap`] is a contiguous range given by a start address and a length. Gaps are values,
//! carving an allocation out of one produces new gaps rather than changing the old one.
//!
//! ## Free list
//! The [`FreeList`] holds the free gaps sorted by address. It is created with one gap spanning
//! the whole range.
//!
//! ## Allocation table
//! The [`AllocationTable`] maps every live [`Handle`] to the gap granted to it. Handles are
//! chosen by the caller and may be reused once freed.
//!
//! ## Strategies
//! A strategy implements [`Placement`]: given the free list and a request size it picks a gap
//! and reports how many entries it looked at. Strategies are selected by name, see
//! [`strategies::from_name`]. The only one shipped is `BEST` ([`strategies::Best`]), and be
//! warned, it does not do what its name says. It picks the *largest* gap that is strictly
//! longer than the request, so an exact fit is never used. The exercises this crate
//! reproduces were graded against that rule.
//!
//! # Quirks worth knowing
//! Freeing a handle that holds nothing is not an error. The engine inserts an empty gap at
//! address 0 into the free list and carries on, so the free list grows by one entry.
//! Allocating under a handle that is still live silently replaces its record and the old range
//! is never returned. As long as neither happens the free space plus the allocated space always
//! equals the size the engine was created with ([`Engine::accounted_space`]).

pub use crate::config::{Overrides, SimConfig};
pub use crate::engine::{AllocResponse, Engine};
pub use crate::error::{Error, Result};
pub use crate::freelist::FreeList;
pub use crate::gap::Gap;
pub use crate::script::{Operation, Script};
pub use crate::sim::Simulation;
pub use crate::strategies::Placement;
pub use crate::table::{AllocationTable, Handle};

pub mod config;
pub mod engine;
mod error;
pub mod freelist;
pub mod gap;
pub mod report;
pub mod script;
pub mod sim;
pub mod strategies;
pub mod table;
