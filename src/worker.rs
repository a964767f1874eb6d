//! Background worker for fire-and-forget host calls
//!
//! Host command invocations, persistence writes and layout restores must not
//! stall key handling. They are queued here and run one at a time, in
//! submission order, on a dedicated thread. A job that panics is logged and
//! skipped; the thread keeps serving the queue.

use crate::error::{Error, Result};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A single background thread fed by a job queue
#[derive(Debug)]
pub struct Worker {
    name: String,
    sender: Option<Sender<Job>>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Start a worker thread with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(name: &str) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<Job>();
        let thread_name = name.to_string();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                for job in receiver {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        warn!(worker = %thread_name, "Background job panicked");
                    }
                }
            })?;
        debug!(worker = name, "Worker started");
        Ok(Self {
            name: name.to_string(),
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue `job` to run in the background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerStopped`] if the worker has shut down.
    pub fn submit(&self, job: impl FnOnce() + Send + 'static) -> Result<()> {
        let sender = self.sender.as_ref().ok_or(Error::WorkerStopped)?;
        sender
            .send(Box::new(job))
            .map_err(|_| Error::WorkerStopped)
    }

    /// Block until every job queued so far has run.
    ///
    /// Does nothing once the worker has shut down.
    pub fn flush(&self) {
        let (done_tx, done_rx) = mpsc::channel::<()>();
        if self
            .submit(move || {
                let _ = done_tx.send(());
            })
            .is_err()
        {
            return;
        }
        let _ = done_rx.recv();
    }

    /// Whether the worker still accepts jobs.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Stop accepting jobs, let queued jobs finish, and join the thread.
    ///
    /// Calling this more than once is a no-op.
    pub fn shutdown(&mut self) {
        // Dropping the sender ends the receive loop once the queue drains
        self.sender = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!(worker = %self.name, "Worker thread panicked");
            } else {
                debug!(worker = %self.name, "Worker stopped");
            }
        }
    }
}

impl Drop for Worker {
    /// Stop accepting jobs without waiting. Queued jobs still run; the thread
    /// exits once the queue drains.
    fn drop(&mut self) {
        self.sender = None;
        if self.handle.take().is_some() {
            debug!(worker = %self.name, "Worker detached");
        }
    }
}
