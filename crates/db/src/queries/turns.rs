// crates/db/src/queries/turns.rs
use mnemo_types::{Id, Turn, TurnArtifact, TurnContent, TurnEntity};
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use crate::DbResult;

use super::enums::{artifact_type_from_str, artifact_type_str, entity_type_from_str, entity_type_str};

fn row_to_turn(row: &sqlx::postgres::PgRow) -> Turn {
    Turn {
        id: row.get("id"),
        session_id: row.get("session_id"),
        turn_number: row.get("turn_number"),
        user_message: row.get("user_message"),
        assistant_summary: row.get("assistant_summary"),
        title: row.get("title"),
        content_hash: row.get("content_hash"),
        model_name: row.get("model_name"),
        tool_names: serde_json::from_value(row.get("tool_names")).unwrap_or_default(),
        started_at: row.get("started_at"),
        ended_at: row.get("ended_at"),
    }
}

pub async fn get_turn(conn: &mut PgConnection, id: Id) -> DbResult<Option<Turn>> {
    let row = sqlx::query("SELECT * FROM turns WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(row.as_ref().map(row_to_turn))
}

pub async fn get_turn_by_number(conn: &mut PgConnection, session_id: Id, turn_number: i32) -> DbResult<Option<Turn>> {
    let row = sqlx::query("SELECT * FROM turns WHERE session_id = $1 AND turn_number = $2")
        .bind(session_id)
        .bind(turn_number)
        .fetch_optional(conn)
        .await?;
    Ok(row.as_ref().map(row_to_turn))
}

pub async fn list_turns_for_session(conn: &mut PgConnection, session_id: Id) -> DbResult<Vec<Turn>> {
    let rows = sqlx::query("SELECT * FROM turns WHERE session_id = $1 ORDER BY turn_number")
        .bind(session_id)
        .fetch_all(conn)
        .await?;
    Ok(rows.iter().map(row_to_turn).collect())
}

/// Upsert by `(session_id, turn_number)` (§4.E step 3). Returns the
/// stored row plus whether its content actually changed relative to
/// what was there before this call — `false` tells the Recorder to
/// skip downstream work for this turn (idempotency).
pub async fn upsert_turn(conn: &mut PgConnection, turn: &Turn) -> DbResult<(Turn, bool)> {
    let existing_hash: Option<String> = sqlx::query_scalar(
        "SELECT content_hash FROM turns WHERE session_id = $1 AND turn_number = $2",
    )
    .bind(turn.session_id)
    .bind(turn.turn_number)
    .fetch_optional(&mut *conn)
    .await?;

    let changed = existing_hash.as_deref() != Some(turn.content_hash.as_str());

    let row = sqlx::query(
        r#"
        INSERT INTO turns (id, session_id, turn_number, user_message, assistant_summary, title, content_hash, model_name, tool_names, started_at, ended_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (session_id, turn_number) DO UPDATE SET
            user_message = EXCLUDED.user_message,
            assistant_summary = EXCLUDED.assistant_summary,
            title = EXCLUDED.title,
            content_hash = EXCLUDED.content_hash,
            model_name = EXCLUDED.model_name,
            tool_names = EXCLUDED.tool_names,
            ended_at = EXCLUDED.ended_at
        RETURNING *
        "#,
    )
    .bind(turn.id)
    .bind(turn.session_id)
    .bind(turn.turn_number)
    .bind(&turn.user_message)
    .bind(&turn.assistant_summary)
    .bind(&turn.title)
    .bind(&turn.content_hash)
    .bind(&turn.model_name)
    .bind(serde_json::to_value(&turn.tool_names).unwrap_or_default())
    .bind(turn.started_at)
    .bind(turn.ended_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok((row_to_turn(&row), changed))
}

/// Applied by the `turn_summary` handler (§4.I table) once a title
/// and summary have been produced, whether by the model or by the
/// degraded truncation fallback.
pub async fn set_turn_summary(conn: &mut PgConnection, id: Id, title: Option<&str>, assistant_summary: Option<&str>) -> DbResult<()> {
    sqlx::query("UPDATE turns SET title = $2, assistant_summary = $3 WHERE id = $1")
        .bind(id)
        .bind(title)
        .bind(assistant_summary)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn upsert_turn_content(conn: &mut PgConnection, content: &TurnContent) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO turn_content (turn_id, raw_jsonl, assistant_text, files_touched, commands_run, errors_encountered, tool_call_count, content_size)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (turn_id) DO UPDATE SET
            raw_jsonl = EXCLUDED.raw_jsonl,
            assistant_text = EXCLUDED.assistant_text,
            files_touched = EXCLUDED.files_touched,
            commands_run = EXCLUDED.commands_run,
            errors_encountered = EXCLUDED.errors_encountered,
            tool_call_count = EXCLUDED.tool_call_count,
            content_size = EXCLUDED.content_size
        "#,
    )
    .bind(content.turn_id)
    .bind(&content.raw_jsonl)
    .bind(&content.assistant_text)
    .bind(serde_json::to_value(&content.files_touched).unwrap_or_default())
    .bind(serde_json::to_value(&content.commands_run).unwrap_or_default())
    .bind(serde_json::to_value(&content.errors_encountered).unwrap_or_default())
    .bind(content.tool_call_count)
    .bind(content.content_size)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn get_turn_content(conn: &mut PgConnection, turn_id: Id) -> DbResult<Option<TurnContent>> {
    let row = sqlx::query("SELECT * FROM turn_content WHERE turn_id = $1")
        .bind(turn_id)
        .fetch_optional(conn)
        .await?;
    Ok(row.map(|row| TurnContent {
        turn_id: row.get("turn_id"),
        raw_jsonl: row.get("raw_jsonl"),
        assistant_text: row.get("assistant_text"),
        files_touched: serde_json::from_value(row.get("files_touched")).unwrap_or_default(),
        commands_run: serde_json::from_value(row.get("commands_run")).unwrap_or_default(),
        errors_encountered: serde_json::from_value(row.get("errors_encountered")).unwrap_or_default(),
        tool_call_count: row.get("tool_call_count"),
        content_size: row.get("content_size"),
    }))
}

/// Replace every `TurnEntity` row for this turn (4.K re-runs wholesale
/// rather than diffing — handlers must be idempotent, §5).
pub async fn replace_turn_entities(conn: &mut PgConnection, turn_id: Id, entities: &[TurnEntity]) -> DbResult<()> {
    sqlx::query("DELETE FROM turn_entities WHERE turn_id = $1").bind(turn_id).execute(&mut *conn).await?;
    for entity in entities {
        sqlx::query(
            r#"
            INSERT INTO turn_entities (id, turn_id, entity_type, entity_id, entity_name, confidence)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(turn_id)
        .bind(entity_type_str(entity.entity_type))
        .bind(entity.entity_id)
        .bind(&entity.entity_name)
        .bind(entity.confidence)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn list_turn_entities(conn: &mut PgConnection, turn_id: Id) -> DbResult<Vec<TurnEntity>> {
    let rows = sqlx::query("SELECT * FROM turn_entities WHERE turn_id = $1").bind(turn_id).fetch_all(conn).await?;
    Ok(rows
        .into_iter()
        .map(|row| TurnEntity {
            turn_id: row.get("turn_id"),
            entity_type: entity_type_from_str(row.get::<String, _>("entity_type").as_str()),
            entity_id: row.get("entity_id"),
            entity_name: row.get("entity_name"),
            confidence: row.get("confidence"),
        })
        .collect())
}

/// Replace every `TurnArtifact` row for this turn (§4.D materialized
/// by the `artifact_extract` handler, §4.I table).
pub async fn replace_turn_artifacts(conn: &mut PgConnection, turn_id: Id, artifacts: &[TurnArtifact]) -> DbResult<()> {
    sqlx::query("DELETE FROM turn_artifacts WHERE turn_id = $1").bind(turn_id).execute(&mut *conn).await?;
    for artifact in artifacts {
        sqlx::query(
            r#"
            INSERT INTO turn_artifacts (id, turn_id, artifact_type, artifact_value, metadata)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(turn_id)
        .bind(artifact_type_str(artifact.artifact_type))
        .bind(&artifact.artifact_value)
        .bind(&artifact.metadata)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn list_turn_artifacts(conn: &mut PgConnection, turn_id: Id) -> DbResult<Vec<TurnArtifact>> {
    let rows = sqlx::query("SELECT * FROM turn_artifacts WHERE turn_id = $1").bind(turn_id).fetch_all(conn).await?;
    Ok(rows
        .into_iter()
        .map(|row| TurnArtifact {
            turn_id: row.get("turn_id"),
            artifact_type: artifact_type_from_str(row.get::<String, _>("artifact_type").as_str()),
            artifact_value: row.get("artifact_value"),
            metadata: row.get("metadata"),
        })
        .collect())
}
