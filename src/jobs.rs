//! Named background jobs with one exclusive lock per job kind.
//!
//! Maintenance work (reloading a source list, rebuilding the consolidated
//! output) runs on its own thread. Jobs of the same kind never overlap: a
//! second job either waits for the first to finish or is refused, depending
//! on the [`JobPolicy`]. Jobs of different kinds run independently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

use crate::config::JobPolicy;
use crate::error::JobError;

/// Lock shared by every job of one kind.
#[derive(Default)]
struct JobLock {
    running: Mutex<()>,
    /// Jobs admitted but not yet finished (running plus queued).
    pending: AtomicUsize,
}

/// Keeps `pending` accurate even if the job panics or never starts.
struct PendingGuard(Arc<JobLock>);

impl PendingGuard {
    fn new(lock: Arc<JobLock>) -> Self {
        lock.pending.fetch_add(1, Ordering::SeqCst);
        Self(lock)
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.pending.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A started (or queued) job.
pub struct JobHandle<T> {
    job_type: String,
    inner: JoinHandle<T>,
}

impl<T> JobHandle<T> {
    pub fn job_type(&self) -> &str {
        &self.job_type
    }

    /// Wait for the job to finish. `Err` carries the panic payload.
    pub fn join(self) -> thread::Result<T> {
        self.inner.join()
    }
}

/// Registry of job kinds and their locks.
pub struct JobManager {
    policy: JobPolicy,
    locks: Mutex<HashMap<String, Arc<JobLock>>>,
}

impl JobManager {
    pub fn new(policy: JobPolicy) -> Self {
        Self {
            policy,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> JobPolicy {
        self.policy
    }

    /// Make a job kind known ahead of time. Returns `false` if it already was.
    pub fn register_type(&self, job_type: &str) -> bool {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks.contains_key(job_type) {
            return false;
        }
        locks.insert(job_type.to_string(), Arc::default());
        true
    }

    /// Whether a job of this kind is running or queued.
    pub fn is_busy(&self, job_type: &str) -> bool {
        let locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .get(job_type)
            .is_some_and(|lock| lock.pending.load(Ordering::SeqCst) > 0)
    }

    /// Start `job` on its own thread under the lock for `job_type`.
    ///
    /// Returns `Ok(None)` when the policy refuses the job and `strict` is off.
    pub fn spawn<F, T>(&self, job_type: &str, job: F) -> Result<Option<JobHandle<T>>, JobError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let pending = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            let lock = match locks.get(job_type).cloned() {
                Some(lock) => lock,
                None if self.policy.populate_new_type => {
                    let lock: Arc<JobLock> = Arc::default();
                    locks.insert(job_type.to_string(), Arc::clone(&lock));
                    lock
                }
                None => return self.refuse(JobError::UnknownType(job_type.to_string())),
            };

            if lock.pending.load(Ordering::SeqCst) > 0 && !self.policy.allow_queue {
                return self.refuse(JobError::Busy(job_type.to_string()));
            }

            // Admission happens under the registry lock so two callers can't
            // both see an idle job kind.
            PendingGuard::new(lock)
        };

        let name = job_type.to_string();
        let inner = thread::Builder::new()
            .name(format!("job-{}", job_type))
            .spawn(move || {
                let pending = pending;
                let _running = pending
                    .0
                    .running
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                debug!("Running '{}' job", name);
                job()
            })
            .map_err(|e| JobError::Spawn {
                job_type: job_type.to_string(),
                reason: e.to_string(),
            })?;

        debug!("Started '{}' job", job_type);
        Ok(Some(JobHandle {
            job_type: job_type.to_string(),
            inner,
        }))
    }

    fn refuse<T>(&self, err: JobError) -> Result<Option<T>, JobError> {
        if self.policy.strict {
            Err(err)
        } else {
            warn!("{}; skipping", err);
            Ok(None)
        }
    }
}

impl Default for JobManager {
    fn default() -> Self {
        Self::new(JobPolicy::default())
    }
}
