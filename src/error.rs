//! Error types shared by the engine, the script parser and the replay driver.

use thiserror::Error;

use crate::strategies::STRATEGY_NAMES;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The placement strategy name was not recognised at construction.
    #[error("unknown strategy {0:?}, expected one of: {known}", known = STRATEGY_NAMES.join(", "))]
    UnknownStrategy(String),

    /// `[base_addr, base_addr + size)` does not fit in the address space.
    #[error("address range {base_addr}+{size} overflows usize")]
    InvalidRange { base_addr: usize, size: usize },

    /// No free gap is strictly larger than the request.
    /// The engine state is left untouched.
    #[error("no available slot: requested {requested} (searched {visited} elements)")]
    NoEligibleGap { requested: usize, visited: usize },

    /// A script line could not be understood.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Error::Parse { line, message: message.into() }
    }

    /// Returns whether the error was raised by an allocation request
    /// rather than by configuration or I/O.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Error::NoEligibleGap { .. })
    }
}
