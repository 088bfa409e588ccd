// crates/worker/src/handlers.rs
//! One function per `JobKind` (§4.I dispatch table). Every handler is
//! re-entry safe: an interrupted job is re-claimed elsewhere once its
//! lease expires, so handlers only ever replace state wholesale
//! (upsert, `replace_turn_entities`/`replace_turn_artifacts`), never
//! accumulate.

use chrono::Utc;
use mnemo_db::Store;
use mnemo_llm::{FallbackProvider, LlmProvider, SummarizeTurnRequest};
use mnemo_queue::Queue;
use mnemo_skills::TurnSignal;
use mnemo_types::{EntityType, Job};
use uuid::Uuid;

use crate::WorkerError;

fn field_uuid(job: &Job, key: &str) -> Result<Uuid, WorkerError> {
    job.payload
        .get(key)
        .and_then(|v| v.as_str())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| WorkerError::BadPayload { job_id: job.id, field: key.to_string() })
}

/// `session_process`: re-run the Recorder for the session named in
/// the payload (§4.I table).
pub async fn handle_session_process(store: &Store, queue: &Queue, job: &Job) -> Result<(), WorkerError> {
    mnemo_recorder::handle_session_process(store, queue, job).await?;
    Ok(())
}

/// `turn_summary`: produce `title` + `assistant_summary` for a turn.
/// Falls back to truncation if the model call fails (§4.I table).
pub async fn handle_turn_summary(store: &Store, llm: &dyn LlmProvider, job: &Job) -> Result<(), WorkerError> {
    let turn_id = field_uuid(job, "turn_id")?;
    let pool = store.pool();
    let mut conn = pool.acquire().await.map_err(mnemo_db::DbError::from)?;

    let turn = mnemo_db::queries::turns::get_turn(&mut conn, turn_id)
        .await?
        .ok_or(WorkerError::NotFound { job_id: job.id, what: "turn" })?;
    let content = mnemo_db::queries::turns::get_turn_content(&mut conn, turn_id).await?;
    let assistant_text = content.map(|c| c.assistant_text).unwrap_or_default();

    let request = SummarizeTurnRequest {
        user_message: turn.user_message.clone(),
        assistant_text,
        tool_names: turn.tool_names.clone(),
    };

    let response = match llm.summarize_turn(request.clone()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(turn_id = %turn_id, error = %e, "model summarization failed, falling back to truncation");
            FallbackProvider.summarize_turn(request).await.expect("fallback summarization never fails")
        }
    };

    mnemo_db::queries::turns::set_turn_summary(&mut conn, turn_id, Some(&response.title), Some(&response.summary)).await?;
    Ok(())
}

/// `entity_extract`: re-run the Entity Linker over a turn's combined
/// text, and update the workspace's selected project when the
/// highest-confidence match is a project (§4.K).
pub async fn handle_entity_extract(store: &Store, job: &Job) -> Result<(), WorkerError> {
    let turn_id = field_uuid(job, "turn_id")?;
    let session_id = field_uuid(job, "session_id")?;
    let pool = store.pool();

    let projects = mnemo_db::queries::projects::list_projects(pool).await?;
    let people = mnemo_db::queries::people::list_people(pool).await?;

    let mut conn = pool.acquire().await.map_err(mnemo_db::DbError::from)?;
    let turn = mnemo_db::queries::turns::get_turn(&mut conn, turn_id)
        .await?
        .ok_or(WorkerError::NotFound { job_id: job.id, what: "turn" })?;
    let content = mnemo_db::queries::turns::get_turn_content(&mut conn, turn_id).await?;
    let text = format!("{}\n{}", turn.user_message, content.map(|c| c.assistant_text).unwrap_or_default());

    let entities = mnemo_entities::link_turn(&mut conn, turn_id, &text, &projects, &people).await?;

    let top_project = entities
        .iter()
        .filter(|e| e.entity_type == EntityType::Project && e.entity_id.is_some())
        .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap_or(std::cmp::Ordering::Equal));

    if let Some(top) = top_project {
        let project_id = top.entity_id.expect("filtered to Some above");
        mnemo_db::queries::projects::record_project_mention(pool, project_id, Utc::now()).await?;
        mnemo_db::queries::sessions::set_session_project(&mut conn, session_id, Some(project_id)).await?;
    }

    Ok(())
}

/// `artifact_extract`: materialize the files/commands/errors already
/// captured in `TurnContent` (by the Recorder, §4.E) into `TurnArtifact`
/// rows — the table the Retriever's Errors branch queries (§4.D, §4.G).
pub async fn handle_artifact_extract(store: &Store, job: &Job) -> Result<(), WorkerError> {
    let turn_id = field_uuid(job, "turn_id")?;
    let pool = store.pool();
    let mut conn = pool.acquire().await.map_err(mnemo_db::DbError::from)?;

    let content = mnemo_db::queries::turns::get_turn_content(&mut conn, turn_id)
        .await?
        .ok_or(WorkerError::NotFound { job_id: job.id, what: "turn_content" })?;

    let mut artifacts = Vec::new();
    for file in &content.files_touched {
        artifacts.push(mnemo_types::TurnArtifact {
            turn_id,
            artifact_type: mnemo_types::ArtifactType::File,
            artifact_value: file.clone(),
            metadata: serde_json::Value::Null,
        });
    }
    for command in &content.commands_run {
        artifacts.push(mnemo_types::TurnArtifact {
            turn_id,
            artifact_type: mnemo_types::ArtifactType::Command,
            artifact_value: command.clone(),
            metadata: serde_json::Value::Null,
        });
    }
    for error in &content.errors_encountered {
        artifacts.push(mnemo_types::TurnArtifact {
            turn_id,
            artifact_type: mnemo_types::ArtifactType::Error,
            artifact_value: error.clone(),
            metadata: serde_json::Value::Null,
        });
    }

    mnemo_db::queries::turns::replace_turn_artifacts(&mut conn, turn_id, &artifacts).await?;
    Ok(())
}

/// Longest prefix of turn summaries concatenated for the session
/// `summary` field, bounded so one verbose session can't blow out the
/// column.
const SESSION_SUMMARY_MAX_CHARS: usize = 2000;

/// `session_summary`: aggregate turn summaries into the Session's
/// `title`/`summary` fields, then enqueue `skill_extract` — the last
/// step of §4.E's job chain and the entry point to §4.J phase 1.
pub async fn handle_session_summary(store: &Store, queue: &Queue, job: &Job) -> Result<(), WorkerError> {
    let session_id = field_uuid(job, "session_id")?;
    let pool = store.pool();
    let mut conn = pool.acquire().await.map_err(mnemo_db::DbError::from)?;

    let turns = mnemo_db::queries::turns::list_turns_for_session(&mut conn, session_id).await?;
    let title = turns.first().and_then(|t| t.title.clone()).or_else(|| turns.first().map(|t| t.user_message.clone()));

    let mut summary = String::new();
    for turn in &turns {
        if let Some(s) = &turn.assistant_summary {
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str(s);
            if summary.len() >= SESSION_SUMMARY_MAX_CHARS {
                break;
            }
        }
    }
    let summary = if summary.is_empty() { None } else { Some(summary.chars().take(SESSION_SUMMARY_MAX_CHARS).collect::<String>()) };

    mnemo_db::queries::sessions::set_session_summary(&mut conn, session_id, title.as_deref(), summary.as_deref()).await?;

    let dedupe_key = format!("skill_extract:{session_id}");
    queue
        .enqueue(
            mnemo_types::JobKind::SkillExtract,
            serde_json::json!({ "session_id": session_id }),
            mnemo_types::JobKind::SkillExtract.default_priority(),
            Some(&dedupe_key),
            5,
        )
        .await?;

    Ok(())
}

/// `skill_extract`: score the session and, if it clears the quality
/// threshold, synthesize and persist a Skill (§4.J).
pub async fn handle_skill_extract(store: &Store, llm: &dyn LlmProvider, min_quality_score: f64, confirmation_keywords: &[String], job: &Job) -> Result<(), WorkerError> {
    let session_id = field_uuid(job, "session_id")?;
    let pool = store.pool();
    let mut conn = pool.acquire().await.map_err(mnemo_db::DbError::from)?;

    let session = mnemo_db::queries::sessions::get_session(&mut conn, session_id)
        .await?
        .ok_or(WorkerError::NotFound { job_id: job.id, what: "session" })?;
    let turns = mnemo_db::queries::turns::list_turns_for_session(&mut conn, session_id).await?;

    let mut turn_signals = Vec::with_capacity(turns.len());
    let mut turn_summaries = Vec::new();
    let mut top_files = Vec::new();
    let mut top_entities = Vec::new();

    for turn in &turns {
        let content = mnemo_db::queries::turns::get_turn_content(&mut conn, turn.id).await?;
        let entities = mnemo_db::queries::turns::list_turn_entities(&mut conn, turn.id).await?;

        if let Some(summary) = &turn.assistant_summary {
            turn_summaries.push(summary.clone());
        }
        top_entities.extend(entities.into_iter().map(|e| e.entity_name));

        let signal = match &content {
            Some(c) => TurnSignal {
                tool_call_count: c.tool_call_count,
                tool_names: turn.tool_names.clone(),
                files_touched: c.files_touched.clone(),
                errors_encountered: c.errors_encountered.clone(),
            },
            None => TurnSignal::default(),
        };
        if let Some(c) = &content {
            top_files.extend(c.files_touched.iter().cloned());
        }
        turn_signals.push(signal);
    }

    top_entities.sort();
    top_entities.dedup();
    top_files.sort();
    top_files.dedup();

    let final_user_message = turns.last().map(|t| t.user_message.as_str()).unwrap_or_default();

    let generated = mnemo_skills::generate_for_session(
        pool,
        llm,
        min_quality_score,
        confirmation_keywords,
        &session,
        &turn_signals,
        final_user_message,
        &turn_summaries,
        &top_entities,
        &top_files,
    )
    .await
    .map_err(|e| match e {
        mnemo_skills::SkillError::Llm(llm_err) if llm_err.is_retryable() => WorkerError::Retryable(llm_err.to_string()),
        other => WorkerError::Skill(other),
    })?;

    if generated.is_none() {
        tracing::debug!(session_id = %session_id, "session below skill quality threshold, no skill generated");
    }
    Ok(())
}
