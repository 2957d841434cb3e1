//! Replays a [`Script`] against an [`Engine`] and writes the report.

use std::io::Write;

use tracing::{error, info, instrument};

use crate::engine::Engine;
use crate::error::Result;
use crate::report;
use crate::script::{Operation, Script};

/// An engine together with the operations still to replay.
#[derive(Debug)]
pub struct Simulation {
    engine: Engine,
    operations: Vec<Operation>,
}

impl Simulation {
    /// Builds the engine described by the script's configuration.
    ///
    /// An unknown policy fails here, before any operation is replayed.
    pub fn new(script: Script) -> Result<Self> {
        let engine = script.config.build()?;
        Ok(Simulation { engine, operations: script.operations })
    }

    /// Replays every operation in order, writing one report entry per operation.
    ///
    /// The first failed allocation stops the run. Entries of the operations that
    /// were replayed before it are already written to `out`.
    #[instrument(level = "info", skip_all, fields(operations = self.operations.len()))]
    pub fn run<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<()> {
        for (idx, op) in self.operations.iter().enumerate() {
            if let Err(e) = step(&mut self.engine, *op, out) {
                error!(idx, ?op, "Stopping the run.");
                return Err(e);
            }
        }
        info!(
            free_entries = self.engine.free_list().size(),
            live = self.engine.table().len(),
            "Run complete."
        );
        Ok(())
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

/// Applies a single operation and writes its report entry.
pub fn step<W: Write + ?Sized>(engine: &mut Engine, op: Operation, out: &mut W) -> Result<()> {
    match op {
        Operation::Alloc { handle, size } => {
            let res = engine.alloc(handle, size)?;
            report::write_alloc(out, handle, size, &res, engine.free_list())?;
        }
        Operation::Free { handle } => {
            engine.free(handle);
            report::write_free(out, handle, engine.free_list())?;
        }
    }
    Ok(())
}
