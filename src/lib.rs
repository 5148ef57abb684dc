#![forbid(unsafe_code)]
#![forbid(unreachable_pub)]

//! Idle multi-threaded target process and unique stack grouping.
//!
//! The crate has two halves that are meant to be used together:
//!
//! - [`runner`] spawns two groups of named idle workers (`idle-a-*`,
//!   `idle-b-*`), blocks on the first one and abandons the rest. The
//!   `two-mode` binary runs it with the default configuration, giving a
//!   debugger a process with a known thread shape.
//! - [`stacks`] reads a debugger's all-threads backtrace dump and groups the
//!   threads whose stacks are equivalent. The `uniq-stacks` binary prints the
//!   grouped report.
//!
//! # Quick Start
//!
//! ```no_run
//! use uniq_stacks::config::RunnerConfig;
//! use uniq_stacks::runner::{RecordingWaiter, Runner};
//!
//! let runner = Runner::new(RunnerConfig::default())?;
//! let spawned = runner.spawn_all()?;
//! let mut waiter = RecordingWaiter::new();
//! let abandoned = spawned.wait_on_first(&mut waiter)?;
//! assert_eq!(abandoned.len(), 5);
//! # Ok::<(), uniq_stacks::errors::RunnerError>(())
//! ```
//!
//! ```
//! use uniq_stacks::stacks::{render_unique_stacks, FrameSelection};
//!
//! let dump = "\
//! Thread 2 (Thread 0x7f01 (LWP 11)):
//! #0  0x0000000000401000 in nanosleep ()
//! Thread 1 (Thread 0x7f00 (LWP 10)):
//! #0  0x0000000000401000 in nanosleep ()
//! ";
//! let report = render_unique_stacks(dump, &FrameSelection::default())?;
//! assert!(report.contains("Stack for thread ids [1, 2]"));
//! # Ok::<(), uniq_stacks::errors::ParseError>(())
//! ```

pub mod chain;
pub mod config;
pub mod errors;
pub mod idle;
pub mod logging;
pub mod runner;
pub mod stacks;
pub mod thread;

pub use config::RunnerConfig;
pub use errors::{ConfigError, JoinError, ParseError, RunnerError, SpawnError};
pub use idle::IdleVariant;
pub use runner::{run, Abandoned, BlockingWaiter, JoinWaiter, RecordingWaiter, Runner, Spawned};
pub use stacks::{Frame, FrameSelection, StackGroup, StackTrace};
pub use thread::{JoinHandle, ThreadBuilder, ThreadId, ThreadState, Worker};
