//! Scripted in-memory backend for tests.
//!
//! Status checks pop pre-loaded outcomes in order; once the script runs
//! out every further check reports [`JobStatus::Pending`]. Call counters
//! let tests assert exactly how many requests a pipeline issued.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::backend::{BackendError, JobBackend, StatusSource};
use crate::job::{JobHandle, JobStatus};

pub struct ScriptedBackend {
    configured: bool,
    submit_outcome: Mutex<Option<Result<JobHandle, BackendError>>>,
    statuses: Mutex<VecDeque<Result<JobStatus, BackendError>>>,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
    last_prompt: Mutex<Option<String>>,
    stall: Duration,
}

impl ScriptedBackend {
    /// A configured backend whose submissions succeed with handle `job-1`.
    pub fn new() -> Self {
        Self {
            configured: true,
            submit_outcome: Mutex::new(None),
            statuses: Mutex::new(VecDeque::new()),
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            last_prompt: Mutex::new(None),
            stall: Duration::ZERO,
        }
    }

    /// A backend with no credential configured.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    /// Make the next submission fail with `err`.
    pub fn fail_submit(self, err: BackendError) -> Self {
        *self.submit_outcome.lock().unwrap() = Some(Err(err));
        self
    }

    /// Append one status-check outcome to the script.
    pub fn then(self, outcome: Result<JobStatus, BackendError>) -> Self {
        self.statuses.lock().unwrap().push_back(outcome);
        self
    }

    /// Make every status check take `stall` before answering.
    pub fn stall_checks(mut self, stall: Duration) -> Self {
        self.stall = stall;
        self
    }

    /// Append `n` pending observations.
    pub fn pending(mut self, n: usize) -> Self {
        for _ in 0..n {
            self = self.then(Ok(JobStatus::Pending));
        }
        self
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSource for ScriptedBackend {
    async fn check_status(&self, _handle: &JobHandle) -> Result<JobStatus, BackendError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.stall.is_zero() {
            tokio::time::sleep(self.stall).await;
        }
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(JobStatus::Pending))
    }
}

#[async_trait]
impl JobBackend for ScriptedBackend {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn submit(&self, prompt: &str) -> Result<JobHandle, BackendError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match self.submit_outcome.lock().unwrap().take() {
            Some(outcome) => outcome,
            None => Ok(JobHandle::from_id("job-1")),
        }
    }
}
