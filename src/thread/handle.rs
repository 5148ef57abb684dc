use std::any::Any;
use std::thread;

use super::{ThreadId, ThreadState, Worker};
use crate::errors::JoinError;

/// Owning handle to a spawned worker.
///
/// Dropping the handle detaches the worker; it keeps running until it
/// returns or the process exits.
#[derive(Debug)]
pub struct JoinHandle<T> {
    worker: Worker,
    native: thread::JoinHandle<T>,
}

impl<T> JoinHandle<T> {
    pub(super) fn new(worker: Worker, native: thread::JoinHandle<T>) -> Self {
        Self { worker, native }
    }

    /// Block until the worker finishes.
    pub fn join(self) -> Result<T, JoinError> {
        let id = self.worker.id();
        self.native.join().map_err(|payload| JoinError::Panicked {
            id,
            message: panic_message(&*payload),
        })
    }

    /// Join only if the worker already finished; otherwise hand the handle back.
    pub fn try_join(self) -> Result<Result<T, JoinError>, Self> {
        if self.native.is_finished() {
            Ok(self.join())
        } else {
            Err(self)
        }
    }

    pub fn thread_id(&self) -> ThreadId {
        self.worker.id()
    }

    pub fn name(&self) -> Option<&str> {
        self.worker.name()
    }

    pub fn state(&self) -> ThreadState {
        self.worker.state()
    }

    pub fn is_alive(&self) -> bool {
        !self.native.is_finished()
    }

    pub fn heartbeats(&self) -> u64 {
        self.worker.heartbeats()
    }

    pub fn worker(&self) -> &Worker {
        &self.worker
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
