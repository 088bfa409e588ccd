// crates/queue/src/lib.rs
//! Job Queue (§4.B): a durable priority queue over a single Postgres
//! table, keyed on `(status, priority, created_at)`. Claiming is a
//! single atomic statement — `UPDATE … WHERE id = (SELECT … FOR UPDATE
//! SKIP LOCKED LIMIT 1) RETURNING *` — rather than a held transaction,
//! per §4.B.

mod backoff;
mod migrations;

pub use backoff::backoff;

use chrono::{DateTime, Utc};
use mnemo_types::{Id, Job, JobKind, JobStatus};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type QueueResult<T> = Result<T, QueueError>;

/// Arbitrary session-advisory-lock key guarding the `_queue_migrations`
/// run — distinct from the Store's own key so the two migration
/// runners never contend on the same lock.
const QUEUE_MIGRATION_LOCK_KEY: i64 = 0x6d6e656d6f5f71; // "mnemo_q" in hex

fn job_kind_str(kind: JobKind) -> &'static str {
    kind.as_str()
}

fn job_kind_from_str(s: &str) -> JobKind {
    match s {
        "turn_summary" => JobKind::TurnSummary,
        "entity_extract" => JobKind::EntityExtract,
        "artifact_extract" => JobKind::ArtifactExtract,
        "session_summary" => JobKind::SessionSummary,
        "skill_extract" => JobKind::SkillExtract,
        _ => JobKind::SessionProcess,
    }
}

fn job_status_str(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Queued => "queued",
        JobStatus::Processing => "processing",
        JobStatus::Retry => "retry",
        JobStatus::Done => "done",
        JobStatus::Failed => "failed",
    }
}

fn job_status_from_str(s: &str) -> JobStatus {
    match s {
        "processing" => JobStatus::Processing,
        "retry" => JobStatus::Retry,
        "done" => JobStatus::Done,
        "failed" => JobStatus::Failed,
        _ => JobStatus::Queued,
    }
}

fn row_to_job(row: &sqlx::postgres::PgRow) -> Job {
    Job {
        id: row.get("id"),
        kind: job_kind_from_str(row.get::<String, _>("kind").as_str()),
        payload: row.get("payload"),
        status: job_status_from_str(row.get::<String, _>("status").as_str()),
        priority: row.get("priority"),
        dedupe_key: row.get("dedupe_key"),
        attempts: row.get("attempts"),
        max_attempts: row.get("max_attempts"),
        locked_until: row.get("locked_until"),
        locked_by: row.get("locked_by"),
        error_message: row.get("error_message"),
        created_at: row.get("created_at"),
    }
}

/// Backoff applied on `Fail` when attempts remain (§4.B, SPEC_FULL §3
/// "backoff(attempts)"): exponential with jitter, bounded at a
/// configured ceiling.
#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    pub base_seconds: u64,
    pub ceiling_seconds: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self { base_seconds: 1, ceiling_seconds: 300 }
    }
}

/// Durable, lease-locked priority job queue.
#[derive(Debug, Clone)]
pub struct Queue {
    pool: PgPool,
    backoff: BackoffConfig,
}

impl Queue {
    pub async fn connect(db_url: &str, backoff: BackoffConfig) -> QueueResult<Self> {
        let pool = PgPoolOptions::new().max_connections(10).connect(db_url).await?;
        let queue = Self { pool, backoff };
        queue.run_migrations().await?;
        Ok(queue)
    }

    pub async fn from_pool(pool: PgPool, backoff: BackoffConfig) -> QueueResult<Self> {
        let queue = Self { pool, backoff };
        queue.run_migrations().await?;
        Ok(queue)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Held behind a session-level advisory lock distinct from the
    /// Store's own, so concurrently-started hooks and worker processes
    /// never race to apply migration 1 on first boot (§9 "Supplemented
    /// behavior").
    async fn run_migrations(&self) -> QueueResult<()> {
        let mut conn = self.pool.acquire().await?;

        sqlx::query("SELECT pg_advisory_lock($1)").bind(QUEUE_MIGRATION_LOCK_KEY).execute(&mut *conn).await?;

        let result: QueueResult<()> = async {
            sqlx::query("CREATE TABLE IF NOT EXISTS _queue_migrations (version INTEGER PRIMARY KEY)")
                .execute(&mut *conn)
                .await?;
            let (current,): (i64,) =
                sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM _queue_migrations").fetch_one(&mut *conn).await?;
            for (i, migration) in migrations::MIGRATIONS.iter().enumerate() {
                let version = (i + 1) as i64;
                if version > current {
                    sqlx::raw_sql(migration).execute(&mut *conn).await?;
                    sqlx::query("INSERT INTO _queue_migrations (version) VALUES ($1)").bind(version).execute(&mut *conn).await?;
                }
            }
            Ok(())
        }
        .await;

        sqlx::query("SELECT pg_advisory_unlock($1)").bind(QUEUE_MIGRATION_LOCK_KEY).execute(&mut *conn).await?;

        result
    }

    /// Enqueue a job. If `dedupe_key` collides with an existing row
    /// whose status is not `done`/`failed`, this is a no-op that
    /// returns the existing job's id (§4.B Enqueue).
    pub async fn enqueue(
        &self,
        kind: JobKind,
        payload: serde_json::Value,
        priority: i32,
        dedupe_key: Option<&str>,
        max_attempts: i32,
    ) -> QueueResult<Id> {
        if let Some(key) = dedupe_key {
            let existing: Option<Id> = sqlx::query_scalar(
                "SELECT id FROM jobs WHERE dedupe_key = $1 AND status NOT IN ('done', 'failed')",
            )
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
            if let Some(id) = existing {
                return Ok(id);
            }
        }

        let id = Uuid::new_v4();
        let row: (Id,) = sqlx::query_as(
            r#"
            INSERT INTO jobs (id, kind, payload, status, priority, dedupe_key, attempts, max_attempts, created_at)
            VALUES ($1, $2, $3, 'queued', $4, $5, 0, $6, now())
            ON CONFLICT (dedupe_key) WHERE dedupe_key IS NOT NULL DO UPDATE SET
                kind = EXCLUDED.kind,
                payload = EXCLUDED.payload,
                status = 'queued',
                priority = EXCLUDED.priority,
                attempts = 0,
                max_attempts = EXCLUDED.max_attempts,
                locked_until = NULL,
                locked_by = NULL,
                error_message = NULL,
                created_at = now()
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(job_kind_str(kind))
        .bind(payload)
        .bind(priority)
        .bind(dedupe_key)
        .bind(max_attempts)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Atomically claim the oldest-by-`(priority, created_at)` row
    /// that is `queued`/`retry` and not currently leased (§4.B Claim).
    pub async fn claim(&self, worker_id: &str, lease: Duration) -> QueueResult<Option<Job>> {
        let lease_secs = lease.as_secs_f64();
        let row = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'processing',
                locked_until = now() + ($2 || ' seconds')::interval,
                locked_by = $1,
                attempts = attempts + 1
            WHERE id = (
                SELECT id FROM jobs
                WHERE status IN ('queued', 'retry')
                  AND (locked_until IS NULL OR locked_until < now())
                ORDER BY priority, created_at
                FOR UPDATE SKIP LOCKED
                LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(worker_id)
        .bind(lease_secs.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_job))
    }

    pub async fn complete(&self, job_id: Id) -> QueueResult<()> {
        sqlx::query("UPDATE jobs SET status = 'done', locked_until = NULL, locked_by = NULL WHERE id = $1")
            .bind(job_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Fail a job: if attempts remain, schedule a retry with backoff;
    /// otherwise terminally fail it (§4.B Fail, §7 "Quota/lease exhaustion").
    pub async fn fail(&self, job_id: Id, error: &str) -> QueueResult<()> {
        let row = sqlx::query("SELECT attempts, max_attempts FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else { return Ok(()) };
        let attempts: i32 = row.get("attempts");
        let max_attempts: i32 = row.get("max_attempts");

        if attempts < max_attempts {
            let delay = backoff(attempts as u32, self.backoff.base_seconds, self.backoff.ceiling_seconds);
            sqlx::query(
                r#"
                UPDATE jobs
                SET status = 'retry',
                    locked_until = now() + ($2 || ' seconds')::interval,
                    locked_by = NULL,
                    error_message = $3
                WHERE id = $1
                "#,
            )
            .bind(job_id)
            .bind(delay.as_secs_f64().to_string())
            .bind(error)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query(
                "UPDATE jobs SET status = 'failed', locked_until = NULL, locked_by = NULL, error_message = $2 WHERE id = $1",
            )
            .bind(job_id)
            .bind(error)
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    /// Revert jobs whose lease expired while `processing` back to
    /// `retry` (§4.B ReapExpired, §8 property 6). Returns the number
    /// reaped.
    pub async fn reap_expired(&self) -> QueueResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET status = 'retry', locked_by = NULL
            WHERE status = 'processing' AND locked_until < now()
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn get(&self, job_id: Id) -> QueueResult<Option<Job>> {
        let row = sqlx::query("SELECT * FROM jobs WHERE id = $1").bind(job_id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(row_to_job))
    }
}

pub fn now_plus(duration: Duration) -> DateTime<Utc> {
    Utc::now() + chrono::Duration::from_std(duration).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_kind_round_trips_through_its_wire_string() {
        for kind in [
            JobKind::SessionProcess,
            JobKind::TurnSummary,
            JobKind::EntityExtract,
            JobKind::ArtifactExtract,
            JobKind::SessionSummary,
            JobKind::SkillExtract,
        ] {
            assert_eq!(job_kind_from_str(job_kind_str(kind)), kind);
        }
    }

    #[test]
    fn job_status_round_trips_through_its_wire_string() {
        for status in [JobStatus::Queued, JobStatus::Processing, JobStatus::Retry, JobStatus::Done, JobStatus::Failed] {
            assert_eq!(job_status_from_str(job_status_str(status)), status);
        }
    }
}
