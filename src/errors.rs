//! Error types for worker threads, the runner and backtrace parsing.
//!
//! Each failing operation gets its own enum; [`RunnerError`] folds the
//! runner-side ones together so callers can propagate with `?`.

use std::io;

use thiserror::Error;

use crate::thread::ThreadId;

/// Errors that can occur while spawning a worker thread.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The operating system refused to create the thread.
    #[error("failed to spawn thread: {0}")]
    Os(#[from] io::Error),
    /// Thread names may not contain interior NUL bytes.
    #[error("invalid thread name: {0:?}")]
    InvalidName(String),
}

/// Errors that can occur while joining a worker thread.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinError {
    /// The thread's body panicked instead of returning.
    #[error("thread {id} panicked: {message}")]
    Panicked { id: ThreadId, message: String },
}

/// Rejected runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Each group needs at least one worker, otherwise there is nothing to join.
    #[error("each idle group needs at least one worker")]
    EmptyGroup,
    /// A zero tick would turn the idle loop into a busy loop.
    #[error("idle tick must be non-zero")]
    ZeroTick,
}

/// Errors surfaced by [`crate::runner`].
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Spawn(#[from] SpawnError),
    #[error(transparent)]
    Join(#[from] JoinError),
}

/// Malformed backtrace text. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: frame appears before any thread header")]
    FrameOutsideThread { line: usize },
    #[error("line {line}: invalid thread number {text:?}")]
    BadThreadNumber { line: usize, text: String },
    #[error("line {line}: invalid frame index {text:?}")]
    BadFrameIndex { line: usize, text: String },
    #[error("line {line}: invalid program counter {text:?}")]
    BadProgramCounter { line: usize, text: String },
}

impl ParseError {
    /// Line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            ParseError::FrameOutsideThread { line }
            | ParseError::BadThreadNumber { line, .. }
            | ParseError::BadFrameIndex { line, .. }
            | ParseError::BadProgramCounter { line, .. } => *line,
        }
    }
}
