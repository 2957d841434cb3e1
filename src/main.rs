use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use freespace::{Overrides, Script, Simulation};

/// Replays an allocator exercise and prints the free list after every request.
#[derive(Parser, Debug)]
#[command(name = "freespace", version, about)]
struct Cli {
    /// Script to replay, read from stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Placement strategy, overrides the script's `policy` line.
    #[arg(long, env = "FREESPACE_POLICY")]
    policy: Option<String>,

    /// Base address, overrides the script's `baseAddr` line.
    #[arg(long, env = "FREESPACE_BASE_ADDR")]
    base_addr: Option<usize>,

    /// Total space, overrides the script's `size` line.
    #[arg(long, env = "FREESPACE_SIZE")]
    size: Option<usize>,

    /// More logging on stderr (-v info, -vv debug, -vvv trace).
    /// Ignored when FREESPACE_LOG is set.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("FREESPACE_LOG").unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn open(input: Option<&PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut script = Script::read(open(cli.input.as_ref())?).context("cannot read script")?;
    script.config.apply(Overrides {
        policy: cli.policy,
        base_addr: cli.base_addr,
        size: cli.size,
    });

    let mut sim = Simulation::new(script)?;

    let mut out = BufWriter::new(io::stdout().lock());
    let res = sim.run(&mut out);
    out.flush()?;
    res.map_err(|e| {
        let context = if e.is_allocation_failure() {
            "simulation halted"
        } else {
            "cannot write report"
        };
        anyhow::Error::new(e).context(context)
    })
}
