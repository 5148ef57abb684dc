//! Target process for stack inspection.
//!
//! Spawns `idle-a-0..2` and `idle-b-0..2`, then blocks on `idle-a-0` until the
//! process is killed. Command-line arguments are ignored.

use anyhow::{Context, Result};
use uniq_stacks::config::RunnerConfig;
use uniq_stacks::logging::init_tracing;
use uniq_stacks::runner;

fn main() -> Result<()> {
    init_tracing();
    tracing::info!(pid = std::process::id(), "two-mode starting");

    runner::run(RunnerConfig::default()).context("idle runner failed")?;
    Ok(())
}
