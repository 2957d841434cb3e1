//! Simulation configuration.
//!
//! The base configuration comes from the header lines of a script
//! (`size`, `baseAddr`, `policy`). Command line flags and environment
//! variables can then override single values through [`Overrides`].

use crate::engine::Engine;
use crate::error::Result;

/// What an [`Engine`] is built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimConfig {
    /// Name of the placement strategy, e.g. `BEST`.
    pub policy: String,
    pub base_addr: usize,
    /// Total space managed, in bytes.
    pub size: usize,
}

/// Values taking precedence over a [`SimConfig`], `None` keeps the original.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub policy: Option<String>,
    pub base_addr: Option<usize>,
    pub size: Option<usize>,
}

impl SimConfig {
    /// Replaces every value that `overrides` sets.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(policy) = overrides.policy {
            self.policy = policy;
        }
        if let Some(base_addr) = overrides.base_addr {
            self.base_addr = base_addr;
        }
        if let Some(size) = overrides.size {
            self.size = size;
        }
    }

    /// Builds an engine for this configuration.
    /// Fails with [`UnknownStrategy`](crate::Error::UnknownStrategy) if the policy is not recognised
    /// and with [`InvalidRange`](crate::Error::InvalidRange) if the range overflows.
    pub fn build(&self) -> Result<Engine> {
        Engine::new(&self.policy, self.base_addr, self.size)
    }
}
