//! One blocking job per turn, polled from the interactive loop.
//!
//! There is no way to cancel a blocking model call, so a job that outlives
//! its limit is abandoned: [`Pending::poll`] reports `TimedOut`, the caller
//! drops the handle, and whatever the job sends later goes nowhere.
//!
//! Dropping a tokio runtime joins its blocking pool, which would make exit
//! wait for those abandoned jobs. Build the runtime with [`runtime`] and stop
//! it with [`shutdown`] instead.

use std::io;
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot::{self, error::TryRecvError};

pub fn runtime() -> io::Result<Runtime> {
    Builder::new_multi_thread().enable_all().build()
}

/// Stop `rt` without waiting for blocking jobs that are still running.
pub fn shutdown(rt: Runtime) {
    tracing::debug!("stopping runtime, unfinished turns are left behind");
    rt.shutdown_background();
}

#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Ready(T),
    Waiting,
    TimedOut,
    /// The job panicked before sending a result.
    Lost,
}

#[derive(Debug)]
pub struct Pending<T> {
    rx: oneshot::Receiver<T>,
    started: Instant,
    limit: Duration,
}

/// Run `job` on the runtime's blocking pool. Must be called from within a
/// tokio runtime.
pub fn spawn_turn<T, F>(limit: Duration, job: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    tokio::task::spawn_blocking(move || {
        if tx.send(job()).is_err() {
            tracing::debug!("turn finished after its caller stopped waiting");
        }
    });
    Pending {
        rx,
        started: Instant::now(),
        limit,
    }
}

impl<T> Pending<T> {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Non-blocking check. A result that is already there wins over the limit.
    pub fn poll(&mut self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(value) => Poll::Ready(value),
            Err(TryRecvError::Closed) => Poll::Lost,
            Err(TryRecvError::Empty) if self.started.elapsed() > self.limit => Poll::TimedOut,
            Err(TryRecvError::Empty) => Poll::Waiting,
        }
    }
}
