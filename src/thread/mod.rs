//! Named worker threads with an observable lifecycle.
//!
//! Every worker spawned through [`ThreadBuilder`] shares a small atomic
//! record with its [`JoinHandle`]: a process-unique [`ThreadId`], the
//! worker's [`ThreadState`], and a heartbeat counter the body bumps as it
//! makes progress. The record outlives the OS thread, so a handle can be
//! inspected even after the worker has finished.

use core::num::NonZeroU64;
use std::cell::RefCell;
use std::sync::Arc;

use portable_atomic::{AtomicU64, AtomicU8, Ordering};

pub mod builder;
pub mod handle;

pub use builder::ThreadBuilder;
pub use handle::JoinHandle;

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static CURRENT: RefCell<Option<Worker>> = const { RefCell::new(None) };
}

/// Record of the worker running on the calling thread, if it was spawned
/// through [`ThreadBuilder`].
pub fn current() -> Option<Worker> {
    CURRENT.with(|current| current.borrow().clone())
}

/// Identifier of the worker running on the calling thread.
pub fn current_thread_id() -> Option<ThreadId> {
    CURRENT.with(|current| current.borrow().as_ref().map(Worker::id))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ThreadId(NonZeroU64);

impl core::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ThreadId {
    /// Allocate the next identifier. Identifiers are never reused.
    pub(crate) fn next() -> Self {
        let id = NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).unwrap_or(NonZeroU64::MIN))
    }

    /// Get the raw ID value.
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ThreadState {
    /// Spawned, body not entered yet.
    Ready = 0,
    /// Body is executing.
    Running = 1,
    /// Body returned or unwound.
    Finished = 2,
}

impl ThreadState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ThreadState::Running,
            2 => ThreadState::Finished,
            _ => ThreadState::Ready,
        }
    }
}

/// Data shared between a worker and its handle.
#[derive(Debug)]
struct ThreadInner {
    id: ThreadId,
    name: Option<String>,
    state: AtomicU8,
    heartbeats: AtomicU64,
}

/// Shared view of one worker's record.
///
/// The worker sees itself through [`current`]; the spawner sees the same
/// record through its [`JoinHandle`].
#[derive(Debug, Clone)]
pub struct Worker {
    inner: Arc<ThreadInner>,
}

impl Worker {
    pub(crate) fn new(name: Option<String>) -> Self {
        Self {
            inner: Arc::new(ThreadInner {
                id: ThreadId::next(),
                name,
                state: AtomicU8::new(ThreadState::Ready as u8),
                heartbeats: AtomicU64::new(0),
            }),
        }
    }

    pub fn id(&self) -> ThreadId {
        self.inner.id
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn state(&self) -> ThreadState {
        ThreadState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    pub(crate) fn set_state(&self, state: ThreadState) {
        self.inner.state.store(state as u8, Ordering::Release);
    }

    pub fn is_alive(&self) -> bool {
        self.state() != ThreadState::Finished
    }

    /// Record one unit of progress. Returns the new count.
    pub fn heartbeat(&self) -> u64 {
        self.inner.heartbeats.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn heartbeats(&self) -> u64 {
        self.inner.heartbeats.load(Ordering::Acquire)
    }

    /// Install this record as the calling thread's current worker.
    ///
    /// The returned guard marks the worker finished when it is dropped,
    /// which also covers a body that unwinds.
    pub(crate) fn enter(&self) -> RunningGuard {
        CURRENT.with(|current| *current.borrow_mut() = Some(self.clone()));
        self.set_state(ThreadState::Running);
        RunningGuard {
            worker: self.clone(),
        }
    }
}

pub(crate) struct RunningGuard {
    worker: Worker,
}

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.worker.set_state(ThreadState::Finished);
        // try_with: the thread-local may already be gone during thread teardown.
        let _ = CURRENT.try_with(|current| {
            if let Ok(mut slot) = current.try_borrow_mut() {
                *slot = None;
            }
        });
    }
}
