// crates/db/src/queries/retrieval.rs
//! Candidate queries the Retriever (§4.G) fans out to in parallel.
//! Scoring itself lives in `mnemo-retrieval` — these return raw rows
//! plus the overlap counts needed to compute a score, not a score.

use chrono::{DateTime, Utc};
use mnemo_types::{Id, Project};
use sqlx::PgPool;
use sqlx::Row;

use crate::DbResult;

use super::projects::get_project;

#[derive(Debug, Clone)]
pub struct ConversationCandidate {
    pub turn_id: Id,
    pub session_id: Id,
    pub title: Option<String>,
    pub user_message: String,
    pub started_at: DateTime<Utc>,
    pub entity_overlap: i64,
    pub path_overlap: i64,
    pub project_id: Option<Id>,
}

/// Turns whose entities intersect the matched projects/people, or
/// whose touched files intersect the Signal's paths, in the last 14
/// days (§4.G Conversations branch).
pub async fn conversation_candidates(
    pool: &PgPool,
    project_ids: &[Id],
    person_ids: &[Id],
    paths: &[String],
    since: DateTime<Utc>,
) -> DbResult<Vec<ConversationCandidate>> {
    if project_ids.is_empty() && person_ids.is_empty() && paths.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT
            t.id AS turn_id,
            t.session_id,
            t.title,
            t.user_message,
            t.started_at,
            s.project_id,
            COALESCE(ent.overlap, 0) AS entity_overlap,
            COALESCE(path.overlap, 0) AS path_overlap
        FROM turns t
        JOIN sessions s ON s.id = t.session_id
        LEFT JOIN LATERAL (
            SELECT COUNT(*) AS overlap FROM turn_entities te
            WHERE te.turn_id = t.id
              AND ((te.entity_type = 'project' AND te.entity_id = ANY($1))
                OR (te.entity_type = 'person' AND te.entity_id = ANY($2)))
        ) ent ON true
        LEFT JOIN LATERAL (
            SELECT COUNT(*) AS overlap FROM turn_content tc
            CROSS JOIN LATERAL jsonb_array_elements_text(tc.files_touched) AS f
            WHERE tc.turn_id = t.id AND f = ANY($3)
        ) path ON true
        WHERE t.started_at >= $4
          AND (COALESCE(ent.overlap, 0) > 0 OR COALESCE(path.overlap, 0) > 0)
        ORDER BY t.started_at DESC
        "#,
    )
    .bind(project_ids)
    .bind(person_ids)
    .bind(paths)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ConversationCandidate {
            turn_id: row.get("turn_id"),
            session_id: row.get("session_id"),
            title: row.get("title"),
            user_message: row.get("user_message"),
            started_at: row.get("started_at"),
            entity_overlap: row.get("entity_overlap"),
            path_overlap: row.get("path_overlap"),
            project_id: row.get("project_id"),
        })
        .collect())
}

#[derive(Debug, Clone)]
pub struct ErrorCandidate {
    pub turn_id: Id,
    pub artifact_value: String,
    pub created_at: DateTime<Utc>,
    pub project_id: Option<Id>,
}

/// Recent error artifacts whose turn entities or files intersect the
/// Signal, preferring the last 72 hours (§4.G Errors branch).
pub async fn recent_error_candidates(
    pool: &PgPool,
    project_ids: &[Id],
    person_ids: &[Id],
    paths: &[String],
    since: DateTime<Utc>,
) -> DbResult<Vec<ErrorCandidate>> {
    if project_ids.is_empty() && person_ids.is_empty() && paths.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(
        r#"
        SELECT
            a.turn_id,
            a.artifact_value,
            a.created_at,
            s.project_id
        FROM turn_artifacts a
        JOIN turns t ON t.id = a.turn_id
        JOIN sessions s ON s.id = t.session_id
        WHERE a.artifact_type = 'error'
          AND a.created_at >= $4
          AND (
              EXISTS (
                  SELECT 1 FROM turn_entities te
                  WHERE te.turn_id = a.turn_id
                    AND ((te.entity_type = 'project' AND te.entity_id = ANY($1))
                      OR (te.entity_type = 'person' AND te.entity_id = ANY($2)))
              )
              OR EXISTS (
                  SELECT 1 FROM turn_content tc
                  CROSS JOIN LATERAL jsonb_array_elements_text(tc.files_touched) AS f
                  WHERE tc.turn_id = a.turn_id AND f = ANY($3)
              )
          )
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(project_ids)
    .bind(person_ids)
    .bind(paths)
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ErrorCandidate {
            turn_id: row.get("turn_id"),
            artifact_value: row.get("artifact_value"),
            created_at: row.get("created_at"),
            project_id: row.get("project_id"),
        })
        .collect())
}

/// The project most recently associated with the highest-mention
/// sessions for `workspace_path` (§4.K fallback used as the Retriever's
/// `Focus` item).
pub async fn focus_project_for_workspace(pool: &PgPool, workspace_path: &str) -> DbResult<Option<Project>> {
    let project_id: Option<Id> = sqlx::query_scalar(
        r#"
        SELECT s.project_id
        FROM sessions s
        WHERE s.workspace_path = $1 AND s.project_id IS NOT NULL
        GROUP BY s.project_id
        ORDER BY COUNT(*) DESC, MAX(s.last_activity_at) DESC
        LIMIT 1
        "#,
    )
    .bind(workspace_path)
    .fetch_optional(pool)
    .await?
    .flatten();

    match project_id {
        Some(id) => get_project(pool, id).await,
        None => Ok(None),
    }
}
