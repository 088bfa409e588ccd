// crates/recorder/src/lib.rs
//! Recorder (§4.E): cold-path ingestion. Parses a transcript, upserts
//! the Session and its Turns inside a single transaction per §4.A
//! ("session + turns", "turn + content/artifacts/entities" are each
//! atomic), and enqueues the follow-up jobs the Worker will later
//! claim.
//!
//! Idempotent by construction: re-running against the same transcript
//! re-parses every turn, but `upsert_turn` only reports `changed` for
//! turns whose content hash actually moved, so downstream work is
//! skipped for anything already recorded (§4.E step 3).

mod hash;

pub use hash::content_hash;

use std::path::Path;

use chrono::Utc;
use mnemo_core::artifacts::{extract_artifacts, ArtifactExtractorConfig};
use mnemo_core::parser::{parse_file, RawTurn};
use mnemo_db::DbError;
use mnemo_queue::{Queue, QueueError};
use mnemo_types::{Id, Job, JobKind, Session, Turn};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RecordError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error(transparent)]
    Parse(#[from] mnemo_core::error::ParseError),
}

/// Outcome of one ingestion pass, surfaced for logging/metrics.
#[derive(Debug, Clone, Default)]
pub struct RecordOutcome {
    pub session_id: Id,
    pub turns_seen: usize,
    pub turns_changed: usize,
    pub jobs_enqueued: usize,
    pub skipped_lines: usize,
}

fn build_turn(session_id: Id, turn_number: i32, raw: &RawTurn) -> Turn {
    let now = Utc::now();
    Turn {
        id: Uuid::new_v4(),
        session_id,
        turn_number,
        user_message: raw.user_message.clone(),
        assistant_summary: None,
        title: None,
        content_hash: content_hash(raw),
        model_name: raw.model_name.clone(),
        tool_names: raw.tool_names(),
        started_at: raw.started_at.unwrap_or(now),
        ended_at: raw.ended_at.unwrap_or(now),
    }
}

/// Ingest `transcript_path` for `session_id`/`workspace_path`, upsert
/// every turn, and enqueue the follow-up jobs in priority order
/// (§4.E step 5): `turn_summary`, `entity_extract`, `artifact_extract`
/// per changed turn, then one `session_summary` for the session as a
/// whole.
pub async fn record_transcript(
    store: &mnemo_db::Store,
    queue: &Queue,
    external_session_id: &str,
    transcript_path: &Path,
    workspace_path: &str,
) -> Result<RecordOutcome, RecordError> {
    let parsed = parse_file(transcript_path)?;
    let now = Utc::now();

    let mut tx = store.pool().begin().await.map_err(DbError::from)?;

    let existing = mnemo_db::queries::sessions::get_session_by_external_id(&mut tx, external_session_id).await?;
    let session = match existing {
        Some(mut session) => {
            session.transcript_path = transcript_path.to_string_lossy().to_string();
            session.last_activity_at = now;
            session
        }
        None => Session::new(external_session_id, transcript_path.to_string_lossy(), workspace_path, now),
    };
    let session = mnemo_db::queries::sessions::upsert_session(&mut tx, &session).await?;

    let mut outcome = RecordOutcome {
        session_id: session.id,
        turns_seen: parsed.turns.len(),
        skipped_lines: parsed.skipped_lines,
        ..Default::default()
    };

    let mut changed_turn_ids = Vec::new();

    for (i, raw) in parsed.turns.iter().enumerate() {
        let turn_number = (i + 1) as i32;
        let turn = build_turn(session.id, turn_number, raw);
        let (stored, changed) = mnemo_db::queries::turns::upsert_turn(&mut tx, &turn).await?;

        if !changed {
            continue;
        }
        outcome.turns_changed += 1;
        changed_turn_ids.push(stored.id);

        let artifacts = extract_artifacts(raw, &ArtifactExtractorConfig::default());
        let content = mnemo_types::TurnContent {
            turn_id: stored.id,
            raw_jsonl: raw.raw_lines.join("\n"),
            assistant_text: raw.assistant_text.clone(),
            files_touched: artifacts.files,
            commands_run: artifacts.commands,
            errors_encountered: artifacts.errors,
            tool_call_count: raw.tool_invocations.len() as i32,
            content_size: raw.raw_lines.iter().map(|l| l.len() as i64).sum(),
        };
        mnemo_db::queries::turns::upsert_turn_content(&mut tx, &content).await?;
    }

    mnemo_db::queries::sessions::set_session_turn_count(&mut tx, session.id, parsed.turns.len() as i32).await?;

    tx.commit().await.map_err(DbError::from)?;

    for turn_id in &changed_turn_ids {
        enqueue_turn_jobs(queue, session.id, *turn_id, &mut outcome).await?;
    }

    if outcome.turns_changed > 0 {
        let dedupe_key = format!("session_summary:{}", session.id);
        queue
            .enqueue(
                JobKind::SessionSummary,
                serde_json::json!({ "session_id": session.id }),
                JobKind::SessionSummary.default_priority(),
                Some(&dedupe_key),
                10,
            )
            .await?;
        outcome.jobs_enqueued += 1;
    }

    info!(
        session_id = %session.id,
        turns_seen = outcome.turns_seen,
        turns_changed = outcome.turns_changed,
        jobs_enqueued = outcome.jobs_enqueued,
        "transcript recorded",
    );
    if outcome.skipped_lines > 0 {
        warn!(skipped_lines = outcome.skipped_lines, "transcript had malformed lines");
    }

    Ok(outcome)
}

async fn enqueue_turn_jobs(queue: &Queue, session_id: Id, turn_id: Id, outcome: &mut RecordOutcome) -> Result<(), QueueError> {
    for kind in [JobKind::TurnSummary, JobKind::EntityExtract, JobKind::ArtifactExtract] {
        let dedupe_key = format!("{}:{}", kind.as_str(), turn_id);
        queue
            .enqueue(
                kind,
                serde_json::json!({ "session_id": session_id, "turn_id": turn_id }),
                kind.default_priority(),
                Some(&dedupe_key),
                10,
            )
            .await?;
        outcome.jobs_enqueued += 1;
    }
    Ok(())
}

/// Handles the `session_process` job kind itself: re-runs
/// `record_transcript` for the session named in the job payload. The
/// Stop hook enqueues this rather than recording inline so it never
/// blocks the assistant (§6 Stop hook).
pub async fn handle_session_process(
    store: &mnemo_db::Store,
    queue: &Queue,
    job: &Job,
) -> Result<RecordOutcome, RecordError> {
    let external_session_id = job.payload["session_id"].as_str().unwrap_or_default();
    let transcript_path = job.payload["transcript_path"].as_str().unwrap_or_default();
    let workspace_path = job.payload["workspace_path"].as_str().unwrap_or_default();
    record_transcript(store, queue, external_session_id, Path::new(transcript_path), workspace_path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_core::parser::parse_transcript;

    #[test]
    fn content_hash_of_built_turn_matches_the_raw_turn_hash() {
        let parsed = parse_transcript(
            "{\"type\":\"user\",\"message\":{\"content\":\"hi\"}}\n{\"type\":\"assistant\",\"message\":{\"content\":\"hello\"}}\n",
        );
        let raw = &parsed.turns[0];
        let turn = build_turn(Uuid::new_v4(), 1, raw);
        assert_eq!(turn.content_hash, content_hash(raw));
        assert_eq!(turn.user_message, "hi");
    }

    #[test]
    fn raw_lines_are_preserved_verbatim_for_turn_content() {
        let transcript = "{\"type\":\"user\",\"message\":{\"content\":\"hi\"}}\n{\"type\":\"assistant\",\"message\":{\"content\":\"hello\"}}\n";
        let parsed = parse_transcript(transcript);
        let raw = &parsed.turns[0];
        assert_eq!(raw.raw_lines.len(), 2);
    }
}
