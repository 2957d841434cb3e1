//! Per-operation report lines, in the format of the textbook answers.
//!
//! ```text
//! ptr[0] = Alloc(3) returned 1000 (searched 1 elements)
//! Free List [ Size 1 ]: [ addr:1003 sz:97 ]
//!
//! Free(ptr[0])
//! returned 0
//! Free List [ Size 2 ]: [ addr:1000 sz:3 ][ addr:1003 sz:97 ]
//!
//! ```

use std::io::{self, Write};

use crate::engine::AllocResponse;
use crate::freelist::FreeList;
use crate::table::Handle;

pub fn write_alloc<W: Write + ?Sized>(
    out: &mut W,
    handle: Handle,
    size: usize,
    res: &AllocResponse,
    free_list: &FreeList,
) -> io::Result<()> {
    writeln!(
        out,
        "{handle} = Alloc({size}) returned {} (searched {} elements)",
        res.address, res.visited
    )?;
    write_free_list(out, free_list)
}

/// `Free` always reports `returned 0`.
pub fn write_free<W: Write + ?Sized>(out: &mut W, handle: Handle, free_list: &FreeList) -> io::Result<()> {
    writeln!(out, "Free({handle})")?;
    writeln!(out, "returned 0")?;
    write_free_list(out, free_list)
}

fn write_free_list<W: Write + ?Sized>(out: &mut W, free_list: &FreeList) -> io::Result<()> {
    writeln!(out, "Free List [ Size {} ]: {}", free_list.size(), free_list)?;
    writeln!(out)
}
