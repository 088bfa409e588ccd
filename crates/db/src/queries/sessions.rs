// crates/db/src/queries/sessions.rs
use chrono::{DateTime, Utc};
use mnemo_types::{Id, Session};
use sqlx::{PgConnection, Row};

use crate::DbResult;

fn row_to_session(row: &sqlx::postgres::PgRow) -> Session {
    Session {
        id: row.get("id"),
        session_id: row.get("session_id"),
        transcript_path: row.get("transcript_path"),
        workspace_path: row.get("workspace_path"),
        started_at: row.get("started_at"),
        last_activity_at: row.get("last_activity_at"),
        turn_count: row.get("turn_count"),
        project_id: row.get("project_id"),
        is_processed: row.get("is_processed"),
        title: row.get("title"),
        summary: row.get("summary"),
    }
}

pub async fn get_session_by_external_id(conn: &mut PgConnection, session_id: &str) -> DbResult<Option<Session>> {
    let row = sqlx::query("SELECT * FROM sessions WHERE session_id = $1")
        .bind(session_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.as_ref().map(row_to_session))
}

pub async fn get_session(conn: &mut PgConnection, id: Id) -> DbResult<Option<Session>> {
    let row = sqlx::query("SELECT * FROM sessions WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(row.as_ref().map(row_to_session))
}

/// Upsert by external `session_id` (§4.E step 1). On conflict, bumps
/// `last_activity_at` but otherwise preserves the stored row — title
/// and summary are filled in later by summarization jobs.
pub async fn upsert_session(conn: &mut PgConnection, session: &Session) -> DbResult<Session> {
    let row = sqlx::query(
        r#"
        INSERT INTO sessions (id, session_id, transcript_path, workspace_path, started_at, last_activity_at, turn_count, project_id, is_processed, title, summary)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (session_id) DO UPDATE SET
            transcript_path = EXCLUDED.transcript_path,
            last_activity_at = EXCLUDED.last_activity_at
        RETURNING *
        "#,
    )
    .bind(session.id)
    .bind(&session.session_id)
    .bind(&session.transcript_path)
    .bind(&session.workspace_path)
    .bind(session.started_at)
    .bind(session.last_activity_at)
    .bind(session.turn_count)
    .bind(session.project_id)
    .bind(session.is_processed)
    .bind(&session.title)
    .bind(&session.summary)
    .fetch_one(conn)
    .await?;

    Ok(row_to_session(&row))
}

pub async fn set_session_turn_count(conn: &mut PgConnection, id: Id, turn_count: i32) -> DbResult<()> {
    sqlx::query("UPDATE sessions SET turn_count = $2 WHERE id = $1")
        .bind(id)
        .bind(turn_count)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn set_session_project(conn: &mut PgConnection, id: Id, project_id: Option<Id>) -> DbResult<()> {
    sqlx::query("UPDATE sessions SET project_id = $2 WHERE id = $1")
        .bind(id)
        .bind(project_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Applied by the `session_summary` handler (§4.I table).
pub async fn set_session_summary(conn: &mut PgConnection, id: Id, title: Option<&str>, summary: Option<&str>) -> DbResult<()> {
    sqlx::query("UPDATE sessions SET title = $2, summary = $3, is_processed = TRUE WHERE id = $1")
        .bind(id)
        .bind(title)
        .bind(summary)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn touch_session_activity(conn: &mut PgConnection, id: Id, at: DateTime<Utc>) -> DbResult<()> {
    sqlx::query("UPDATE sessions SET last_activity_at = $2 WHERE id = $1")
        .bind(id)
        .bind(at)
        .execute(conn)
        .await?;
    Ok(())
}
