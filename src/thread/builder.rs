use std::thread;

use super::{JoinHandle, Worker};
use crate::errors::SpawnError;

/// Configures and spawns a worker thread.
#[derive(Debug, Default)]
pub struct ThreadBuilder {
    name: Option<String>,
    stack_size: Option<usize>,
}

impl ThreadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// OS-visible thread name. Linux truncates it to 15 bytes in
    /// `/proc/<pid>/task/<tid>/comm`.
    pub fn name<T: Into<String>>(mut self, name: T) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    pub fn spawn<F, T>(self, f: F) -> Result<JoinHandle<T>, SpawnError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut native = thread::Builder::new();
        if let Some(name) = &self.name {
            if name.contains('\0') {
                return Err(SpawnError::InvalidName(name.clone()));
            }
            native = native.name(name.clone());
        }
        if let Some(bytes) = self.stack_size {
            native = native.stack_size(bytes);
        }

        let worker = Worker::new(self.name);
        let record = worker.clone();
        let native = native.spawn(move || {
            let _running = record.enter();
            f()
        })?;

        tracing::debug!(id = %worker.id(), name = worker.name().unwrap_or("<unnamed>"), "spawned worker");

        Ok(JoinHandle::new(worker, native))
    }
}
