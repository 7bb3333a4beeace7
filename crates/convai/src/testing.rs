//! Scripted conversation backend for tests.
//!
//! Status checks follow the same script semantics as
//! [`parlance_jobs::testing::ScriptedBackend`]; signed URLs are derived
//! from the agent id.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use parlance_jobs::backend::{BackendError, StatusSource};
use parlance_jobs::job::{JobHandle, JobStatus};
use parlance_jobs::testing::ScriptedBackend;

use crate::api::ConvaiBackend;

pub struct ScriptedConvai {
    configured: bool,
    statuses: ScriptedBackend,
    signed_url_calls: AtomicU32,
}

impl ScriptedConvai {
    pub fn new() -> Self {
        Self {
            configured: true,
            statuses: ScriptedBackend::new(),
            signed_url_calls: AtomicU32::new(0),
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn then(mut self, outcome: Result<JobStatus, BackendError>) -> Self {
        self.statuses = self.statuses.then(outcome);
        self
    }

    pub fn pending(mut self, n: usize) -> Self {
        self.statuses = self.statuses.pending(n);
        self
    }

    pub fn stall_checks(mut self, stall: Duration) -> Self {
        self.statuses = self.statuses.stall_checks(stall);
        self
    }

    pub fn status_calls(&self) -> u32 {
        self.statuses.status_calls()
    }

    pub fn signed_url_calls(&self) -> u32 {
        self.signed_url_calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedConvai {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSource for ScriptedConvai {
    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, BackendError> {
        self.statuses.check_status(handle).await
    }
}

#[async_trait]
impl ConvaiBackend for ScriptedConvai {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn signed_url(&self, agent_id: &str) -> Result<String, BackendError> {
        self.signed_url_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("wss://convai.test/{agent_id}?token=signed"))
    }
}
