// crates/db/src/queries/sprints.rs
use chrono::{DateTime, Utc};
use mnemo_types::{Id, Sprint};
use sqlx::PgPool;
use sqlx::Row;
use std::collections::HashMap;

use crate::DbResult;

fn row_to_sprint(row: &sqlx::postgres::PgRow) -> Sprint {
    Sprint {
        id: row.get("id"),
        project_id: row.get("project_id"),
        priority_boost: row.get("priority_boost"),
        starts_at: row.get("starts_at"),
        ends_at: row.get("ends_at"),
        is_active: row.get("is_active"),
    }
}

pub async fn upsert_sprint(pool: &PgPool, sprint: &Sprint) -> DbResult<Sprint> {
    let row = sqlx::query(
        r#"
        INSERT INTO sprints (id, project_id, priority_boost, starts_at, ends_at, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET
            priority_boost = EXCLUDED.priority_boost,
            starts_at = EXCLUDED.starts_at,
            ends_at = EXCLUDED.ends_at,
            is_active = EXCLUDED.is_active
        RETURNING *
        "#,
    )
    .bind(sprint.id)
    .bind(sprint.project_id)
    .bind(sprint.priority_boost)
    .bind(sprint.starts_at)
    .bind(sprint.ends_at)
    .bind(sprint.is_active)
    .fetch_one(pool)
    .await?;

    Ok(row_to_sprint(&row))
}

/// Boost multiplier per project, for every *effective* sprint among
/// `project_ids` (§3 Sprint invariant, §8 property 7). Projects with
/// no effective sprint are simply absent from the map (boost 1.0).
pub async fn effective_sprint_boosts(pool: &PgPool, project_ids: &[Id], now: DateTime<Utc>) -> DbResult<HashMap<Id, f64>> {
    if project_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query(
        r#"
        SELECT * FROM sprints
        WHERE project_id = ANY($1)
          AND is_active
          AND $2 BETWEEN starts_at AND ends_at
        "#,
    )
    .bind(project_ids)
    .bind(now)
    .fetch_all(pool)
    .await?;

    let mut boosts = HashMap::new();
    for row in rows.iter() {
        let sprint = row_to_sprint(row);
        boosts
            .entry(sprint.project_id)
            .and_modify(|b: &mut f64| *b = b.max(sprint.priority_boost))
            .or_insert(sprint.priority_boost);
    }
    Ok(boosts)
}
