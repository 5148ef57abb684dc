//! Spawns the two idle groups and blocks on a single worker.
//!
//! The runner creates `per_group` workers for variant A, then the same number
//! for variant B, and waits on the very first one. The remaining workers are
//! moved into [`Abandoned`], which can be inspected but offers no way to join
//! or stop them. The process exit is what ends them.

use crate::chain::common1;
use crate::config::RunnerConfig;
use crate::errors::{JoinError, RunnerError};
use crate::idle::IdleVariant;
use crate::thread::{JoinHandle, ThreadBuilder, ThreadId};

/// Performs the runner's single blocking wait.
pub trait JoinWaiter {
    fn wait(&mut self, handle: JoinHandle<()>) -> Result<(), JoinError>;
}

/// Blocks on [`JoinHandle::join`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingWaiter;

impl JoinWaiter for BlockingWaiter {
    fn wait(&mut self, handle: JoinHandle<()>) -> Result<(), JoinError> {
        handle.join()
    }
}

/// Records which worker it was asked to wait on and returns immediately.
///
/// The handle is kept, not joined, so the worker stays attached to this
/// waiter for inspection.
#[derive(Debug, Default)]
pub struct RecordingWaiter {
    awaited: Vec<JoinHandle<()>>,
}

impl RecordingWaiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn awaited_ids(&self) -> Vec<ThreadId> {
        self.awaited.iter().map(JoinHandle::thread_id).collect()
    }

    pub fn awaited(&self) -> &[JoinHandle<()>] {
        &self.awaited
    }
}

impl JoinWaiter for RecordingWaiter {
    fn wait(&mut self, handle: JoinHandle<()>) -> Result<(), JoinError> {
        self.awaited.push(handle);
        Ok(())
    }
}

/// A spawned worker tagged with the group it belongs to.
#[derive(Debug)]
pub struct IdleWorker {
    pub variant: IdleVariant,
    pub index: usize,
    pub handle: JoinHandle<()>,
}

pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Spawn every worker, group A first, in index order.
    pub fn spawn_all(&self) -> Result<Spawned, RunnerError> {
        let mut workers = Vec::with_capacity(self.config.total_workers());
        for variant in IdleVariant::ALL {
            for index in 0..self.config.workers_per_group() {
                let body = variant.body(self.config.tick_duration());
                let handle = ThreadBuilder::new()
                    .name(self.config.worker_name(variant, index))
                    .spawn(move || common1(body))?;
                workers.push(IdleWorker {
                    variant,
                    index,
                    handle,
                });
            }
        }

        tracing::info!(workers = workers.len(), "idle workers spawned");
        Ok(Spawned { workers })
    }
}

/// Every worker the runner created, in creation order.
#[derive(Debug)]
pub struct Spawned {
    workers: Vec<IdleWorker>,
}

impl Spawned {
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn workers(&self) -> &[IdleWorker] {
        &self.workers
    }

    /// The worker [`Spawned::wait_on_first`] blocks on.
    pub fn target(&self) -> Option<&IdleWorker> {
        self.workers.first()
    }

    /// Hand the first worker to `waiter`; everything else is abandoned.
    ///
    /// With [`BlockingWaiter`] and the idle bodies this never returns.
    pub fn wait_on_first<W: JoinWaiter>(self, waiter: &mut W) -> Result<Abandoned, RunnerError> {
        let mut workers = self.workers.into_iter();
        let Some(target) = workers.next() else {
            return Ok(Abandoned {
                workers: Vec::new(),
            });
        };
        let abandoned = Abandoned {
            workers: workers.collect(),
        };

        tracing::info!(
            id = %target.handle.thread_id(),
            name = target.handle.name().unwrap_or("<unnamed>"),
            abandoned = abandoned.len(),
            "waiting on first worker"
        );
        waiter.wait(target.handle)?;

        tracing::info!(abandoned = abandoned.len(), "wait returned");
        Ok(abandoned)
    }
}

/// Workers that are never joined or signalled.
///
/// There is deliberately no draining accessor; dropping this detaches the
/// threads and they run until the process exits.
#[derive(Debug)]
pub struct Abandoned {
    workers: Vec<IdleWorker>,
}

impl Abandoned {
    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdleWorker> {
        self.workers.iter()
    }

    pub fn ids(&self) -> Vec<ThreadId> {
        self.workers.iter().map(|w| w.handle.thread_id()).collect()
    }

    pub fn alive(&self) -> usize {
        self.workers.iter().filter(|w| w.handle.is_alive()).count()
    }
}

impl Drop for Abandoned {
    fn drop(&mut self) {
        let alive = self.alive();
        if alive > 0 {
            tracing::debug!(alive, "detaching abandoned workers");
        }
    }
}

/// Spawn the idle groups and block on the first worker of group A.
pub fn run(config: RunnerConfig) -> Result<(), RunnerError> {
    let runner = Runner::new(config)?;
    let spawned = runner.spawn_all()?;
    let abandoned = spawned.wait_on_first(&mut BlockingWaiter)?;
    tracing::info!(left_running = abandoned.alive(), "runner finished");
    Ok(())
}
