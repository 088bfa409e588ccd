// crates/worker/src/lib.rs
//! Worker (§4.I): a loop that repeatedly reaps expired leases, claims
//! one job, dispatches it to a handler keyed on `kind`, and completes
//! or fails it. May run as *N* parallel claimers over the same queue
//! (§9 "Scheduling model" — the cold path's execution domain).

mod handlers;

use std::sync::Arc;
use std::time::Duration;

use mnemo_db::Store;
use mnemo_llm::LlmProvider;
use mnemo_queue::Queue;
use mnemo_types::{Job, JobKind};
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::sleep;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error(transparent)]
    Db(#[from] mnemo_db::DbError),
    #[error(transparent)]
    Queue(#[from] mnemo_queue::QueueError),
    #[error(transparent)]
    Record(#[from] mnemo_recorder::RecordError),
    #[error(transparent)]
    Link(#[from] mnemo_entities::LinkError),
    #[error(transparent)]
    Skill(#[from] mnemo_skills::SkillError),
    #[error("retryable model failure: {0}")]
    Retryable(String),
    #[error("job {job_id} has no usable {field} in its payload")]
    BadPayload { job_id: mnemo_types::Id, field: String },
    #[error("job {job_id} references a {what} that no longer exists")]
    NotFound { job_id: mnemo_types::Id, what: &'static str },
}

/// Tunables for one claimer's loop (§6 Configuration `[worker]`).
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings {
    pub lease: Duration,
    /// Ceiling on the sleep between two consecutive empty claims
    /// (§4.I "sleeps with capped backoff").
    pub empty_claim_backoff_ceiling: Duration,
    pub min_quality_score: f64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self { lease: Duration::from_secs(60), empty_claim_backoff_ceiling: Duration::from_secs(5), min_quality_score: 0.6 }
    }
}

/// One claimer: owns a worker id, the shared Store/Queue/LlmProvider,
/// and this process's confirmation-keyword list (§4.J, locale-
/// dependent, carried as configuration rather than hardcoded).
pub struct Worker {
    id: String,
    store: Store,
    queue: Queue,
    llm: Arc<dyn LlmProvider>,
    settings: WorkerSettings,
    confirmation_keywords: Vec<String>,
}

impl Worker {
    pub fn new(store: Store, queue: Queue, llm: Arc<dyn LlmProvider>, settings: WorkerSettings, confirmation_keywords: Vec<String>) -> Self {
        Self { id: format!("worker-{}", Uuid::new_v4()), store, queue, llm, settings, confirmation_keywords }
    }

    /// Run until `shutdown` fires. Finishes whatever job is in flight
    /// (bounded by the lease) before returning — an abrupt kill instead
    /// leaves the job to be reaped and re-claimed elsewhere, which
    /// handlers are built to tolerate (§4.I "Graceful shutdown").
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut empty_claims = 0u32;
        loop {
            if *shutdown.borrow() {
                tracing::info!(worker_id = %self.id, "shutdown signal received, exiting claim loop");
                return;
            }

            if let Err(e) = self.queue.reap_expired().await {
                tracing::warn!(worker_id = %self.id, error = %e, "failed to reap expired leases");
            }

            let claimed = self.queue.claim(&self.id, self.settings.lease).await;
            let job = match claimed {
                Ok(Some(job)) => job,
                Ok(None) => {
                    empty_claims += 1;
                    let backoff = empty_claim_backoff(empty_claims, self.settings.empty_claim_backoff_ceiling);
                    tokio::select! {
                        _ = sleep(backoff) => {},
                        _ = shutdown.changed() => {},
                    }
                    continue;
                }
                Err(e) => {
                    tracing::warn!(worker_id = %self.id, error = %e, "claim failed");
                    sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            empty_claims = 0;
            mnemo_observability::metrics::record_job_claimed(job.kind.as_str());
            self.process(job).await;
        }
    }

    async fn process(&self, job: Job) {
        let started = std::time::Instant::now();
        let kind = job.kind;
        let job_id = job.id;

        let result = self.dispatch(&job).await;

        match result {
            Ok(()) => {
                mnemo_observability::metrics::record_job_completed(kind.as_str(), started.elapsed());
                if let Err(e) = self.queue.complete(job_id).await {
                    tracing::error!(job_id = %job_id, error = %e, "failed to mark job complete");
                }
            }
            Err(e) => {
                tracing::warn!(job_id = %job_id, kind = kind.as_str(), error = %e, "job handler failed");
                mnemo_observability::metrics::record_job_failed(kind.as_str());
                if let Err(fail_err) = self.queue.fail(job_id, &e.to_string()).await {
                    tracing::error!(job_id = %job_id, error = %fail_err, "failed to record job failure");
                }
            }
        }
    }

    async fn dispatch(&self, job: &Job) -> Result<(), WorkerError> {
        match job.kind {
            JobKind::SessionProcess => handlers::handle_session_process(&self.store, &self.queue, job).await,
            JobKind::TurnSummary => handlers::handle_turn_summary(&self.store, self.llm.as_ref(), job).await,
            JobKind::EntityExtract => handlers::handle_entity_extract(&self.store, job).await,
            JobKind::ArtifactExtract => handlers::handle_artifact_extract(&self.store, job).await,
            JobKind::SessionSummary => handlers::handle_session_summary(&self.store, &self.queue, job).await,
            JobKind::SkillExtract => {
                handlers::handle_skill_extract(&self.store, self.llm.as_ref(), self.settings.min_quality_score, &self.confirmation_keywords, job).await
            }
        }
    }
}

/// `min(ceiling, 250ms * 2^empty_claims)` — quick to back off, capped
/// low since an idle queue should still notice new work promptly
/// (§4.I "sleeps with capped backoff, <= 5s").
fn empty_claim_backoff(empty_claims: u32, ceiling: Duration) -> Duration {
    let millis = 250u64.saturating_mul(1u64 << empty_claims.min(16));
    Duration::from_millis(millis).min(ceiling)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_claim_backoff_is_capped() {
        let ceiling = Duration::from_secs(5);
        assert!(empty_claim_backoff(0, ceiling) < ceiling);
        assert_eq!(empty_claim_backoff(20, ceiling), ceiling);
    }

    #[test]
    fn empty_claim_backoff_grows_with_attempts() {
        let ceiling = Duration::from_secs(5);
        assert!(empty_claim_backoff(3, ceiling) > empty_claim_backoff(0, ceiling));
    }
}
