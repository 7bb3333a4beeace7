//! Bounded status polling for a submitted job.
//!
//! [`poll_until_terminal`] checks the job once per attempt, sleeping for
//! the policy interval between attempts, until the job completes, the
//! provider reports failure, or the attempt budget runs out. A status
//! check that fails at the transport level only costs its attempt.

use crate::backend::StatusSource;
use crate::job::{JobHandle, JobStatus, PollPolicy};

/// A completed job as observed by the poller.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// The provider's result payload.
    pub payload: serde_json::Value,
    /// 1-based attempt on which completion was observed.
    pub attempts: u32,
}

/// Terminal failures of the polling stage.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The provider reported the job as failed. Never retried.
    #[error("job {job_id} failed on attempt {attempt}: {detail}")]
    JobFailed {
        job_id: String,
        attempt: u32,
        detail: String,
    },

    /// The attempt budget ran out without a terminal status.
    #[error("job {job_id} did not finish after {attempts} status checks")]
    Timeout { job_id: String, attempts: u32 },
}

/// Poll `handle` until it reaches a terminal status or `policy` is spent.
///
/// Issues at most `policy.max_attempts` status checks, strictly one after
/// another. The outcome of each check is classified before the budget is
/// consulted, so a completion on the final attempt is still returned.
pub async fn poll_until_terminal<S: StatusSource + ?Sized>(
    source: &S,
    handle: &JobHandle,
    policy: &PollPolicy,
) -> Result<Completion, PollError> {
    for attempt in 1..=policy.max_attempts {
        match source.check_status(handle).await {
            Ok(JobStatus::Completed(payload)) => {
                tracing::debug!(job_id = %handle.id, attempt, "Job completed");
                return Ok(Completion {
                    payload,
                    attempts: attempt,
                });
            }
            Ok(JobStatus::Failed(detail)) => {
                tracing::warn!(job_id = %handle.id, attempt, detail = %detail, "Job failed");
                return Err(PollError::JobFailed {
                    job_id: handle.id.clone(),
                    attempt,
                    detail,
                });
            }
            Ok(JobStatus::Pending) => {
                tracing::debug!(
                    job_id = %handle.id,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "Job still pending",
                );
            }
            Err(e) => {
                tracing::warn!(
                    job_id = %handle.id,
                    attempt,
                    error = %e,
                    "Status check {attempt} failed, treating as pending",
                );
            }
        }

        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(PollError::Timeout {
        job_id: handle.id.clone(),
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::backend::BackendError;
    use crate::testing::ScriptedBackend;

    fn policy(max_attempts: u32) -> PollPolicy {
        PollPolicy::new(Duration::from_secs(1), max_attempts)
    }

    fn transport_error() -> BackendError {
        BackendError::Api {
            status: 503,
            body: "unavailable".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn returns_payload_on_first_completion() {
        let backend = ScriptedBackend::new().then(Ok(JobStatus::Completed(json!({"url": "u"}))));
        let done = poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(10))
            .await
            .unwrap();
        assert_eq!(done.attempts, 1);
        assert_eq!(done.payload, json!({"url": "u"}));
        assert_eq!(backend.status_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn never_exceeds_attempt_budget() {
        for budget in [1, 2, 5, 10] {
            let backend = ScriptedBackend::new();
            let result =
                poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(budget)).await;
            assert_matches!(result, Err(PollError::Timeout { attempts, .. }) if attempts == budget);
            assert_eq!(backend.status_calls(), budget);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_stops_immediately() {
        let backend = ScriptedBackend::new()
            .pending(2)
            .then(Ok(JobStatus::Failed("nsfw content".into())))
            .then(Ok(JobStatus::Completed(json!({}))));
        let result = poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(10)).await;
        assert_matches!(result, Err(PollError::JobFailed { attempt: 3, ref detail, .. }) if detail == "nsfw content");
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_error_consumes_one_attempt() {
        let backend = ScriptedBackend::new()
            .then(Err(transport_error()))
            .then(Err(transport_error()))
            .then(Ok(JobStatus::Completed(json!({"url": "u"}))));
        let done = poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(10))
            .await
            .unwrap();
        assert_eq!(done.attempts, 3);
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_errors_still_count_toward_budget() {
        let backend = ScriptedBackend::new()
            .then(Err(transport_error()))
            .then(Err(transport_error()))
            .then(Err(transport_error()));
        let result = poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(3)).await;
        assert_matches!(result, Err(PollError::Timeout { attempts: 3, .. }));
        assert_eq!(backend.status_calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_on_last_attempt_wins() {
        let backend = ScriptedBackend::new()
            .pending(4)
            .then(Ok(JobStatus::Completed(json!({"url": "late"}))));
        let done = poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(5))
            .await
            .unwrap();
        assert_eq!(done.attempts, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_between_attempts_but_not_after_last() {
        let backend = ScriptedBackend::new();
        let start = tokio::time::Instant::now();
        let _ = poll_until_terminal(&backend, &JobHandle::from_id("j"), &policy(10)).await;
        assert_eq!(start.elapsed(), Duration::from_secs(9));
    }
}
