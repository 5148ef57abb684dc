//! Print the unique stacks in a thread backtrace dump.
//!
//! ```bash
//! gdb -p "$(pgrep two-mode)" -batch -ex 'thread apply all bt' > dump.txt
//! uniq-stacks --input dump.txt
//! uniq-stacks 8 --skip 2 --ignore-pc < dump.txt
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use uniq_stacks::logging::init_tracing;
use uniq_stacks::stacks::{group_unique, parse_backtraces, render_report, FrameSelection};

#[derive(Parser, Debug)]
#[command(
    name = "uniq-stacks",
    version,
    about = "Print the unique stacks found in a thread backtrace dump",
    long_about = "Groups threads whose backtraces are equivalent and prints one stack per group,\n\
        largest group first. Reads the output of `thread apply all bt`."
)]
struct Cli {
    /// Only consider frames up to this position (inclusive)
    #[arg(value_name = "LIMIT")]
    limit: Option<usize>,

    /// Skip the first N stack frames
    #[arg(long, value_name = "N", default_value_t = 0)]
    skip: usize,

    /// Ignore the program counter for frame equivalence
    #[arg(long, action = ArgAction::SetTrue)]
    ignore_pc: bool,

    /// Read the dump from this file instead of stdin
    #[arg(long, short)]
    input: Option<PathBuf>,
}

fn read_dump(input: Option<&PathBuf>) -> Result<String> {
    match input {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let selection = FrameSelection {
        skip: cli.skip,
        limit: cli.limit,
        ignore_pc: cli.ignore_pc,
    };
    let text = read_dump(cli.input.as_ref())?;
    let traces = parse_backtraces(&text, &selection).context("malformed backtrace dump")?;
    let thread_count = traces.len();
    let groups = group_unique(traces);
    tracing::debug!(threads = thread_count, unique = groups.len(), "grouped stacks");

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(render_report(&groups, thread_count).as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write report")?;
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("uniq-stacks: {err:#}");
            ExitCode::FAILURE
        }
    }
}
