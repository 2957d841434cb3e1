//! Parser for the line-oriented simulation scripts.
//!
//! A script looks like the exercises of a textbook allocator visualizer:
//!
//! ```text
//! size 100
//! baseAddr 1000
//! policy BEST
//! ptr[0] = Alloc(3) returned ?
//! List?
//!
//! Free(ptr[0])
//! returned ?
//! List?
//! ```
//!
//! Header lines set the [`SimConfig`], `ptr[..] = Alloc(..)` and `Free(ptr[..])`
//! lines become [`Operation`]s, everything else is ignored. Missing header
//! values keep their defaults.

use std::io::BufRead;
use std::str::FromStr;

use tracing::{debug, instrument, trace};

use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::table::Handle;

/// A single request replayed against the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Alloc { handle: Handle, size: usize },
    Free { handle: Handle },
}

/// A parsed script.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub config: SimConfig,
    pub operations: Vec<Operation>,
}

impl Script {
    /// Reads and parses a whole script.
    #[instrument(level = "debug", skip_all, err(Display))]
    pub fn read<R: BufRead>(reader: R) -> Result<Script> {
        let mut script = Script::default();
        for (idx, line) in reader.lines().enumerate() {
            script.parse_line(idx + 1, &line?)?;
        }
        debug!(config = ?script.config, operations = script.operations.len(), "Parsed script.");
        Ok(script)
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> Result<()> {
        let line = line.trim();
        let err = |message: String| Error::parse(line_no, message);

        if let Some(rest) = line.strip_prefix("ptr[") {
            self.operations.push(parse_alloc(rest).map_err(err)?);
        } else if let Some(rest) = line.strip_prefix("Free(") {
            self.operations.push(parse_free(rest).map_err(err)?);
        } else if let Some((key, value)) = line.split_once(char::is_whitespace) {
            let value = value.trim();
            match key {
                "size" => self.config.size = parse_num(value, "size").map_err(err)?,
                "baseAddr" => self.config.base_addr = parse_num(value, "base address").map_err(err)?,
                "policy" => self.config.policy = value.to_owned(),
                _ => trace!(line_no, line, "Ignoring line."),
            }
        } else {
            trace!(line_no, line, "Ignoring line.");
        }
        Ok(())
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Script> {
        Script::read(s.as_bytes())
    }
}

/// Parses `<h>] = Alloc(<n>)...`, the part after `ptr[`.
fn parse_alloc(rest: &str) -> std::result::Result<Operation, String> {
    let (handle, rest) = rest
        .split_once(']')
        .ok_or_else(|| "missing `]` after handle".to_owned())?;
    let handle = parse_handle(handle)?;

    let size = rest
        .trim_start()
        .strip_prefix('=')
        .map(str::trim_start)
        .and_then(|r| r.strip_prefix("Alloc("))
        .and_then(|r| r.split_once(')'))
        .map(|(size, _)| size)
        .ok_or_else(|| "expected `= Alloc(<size>)`".to_owned())?;

    Ok(Operation::Alloc { handle, size: parse_num(size, "size")? })
}

/// Parses `ptr[<h>])`, the part after `Free(`.
fn parse_free(rest: &str) -> std::result::Result<Operation, String> {
    let handle = rest
        .strip_prefix("ptr[")
        .and_then(|r| r.strip_suffix("])"))
        .ok_or_else(|| "expected `Free(ptr[<handle>])`".to_owned())?;
    Ok(Operation::Free { handle: parse_handle(handle)? })
}

fn parse_handle(s: &str) -> std::result::Result<Handle, String> {
    s.trim()
        .parse::<u32>()
        .map(Handle)
        .map_err(|e| format!("invalid handle {s:?}: {e}"))
}

fn parse_num(s: &str, what: &str) -> std::result::Result<usize, String> {
    s.trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid {what} {s:?}: {e}"))
}
