// crates/db/src/queries/projects.rs
use chrono::{DateTime, Utc};
use mnemo_types::{Id, Project};
use sqlx::PgPool;
use sqlx::Row;

use crate::DbResult;

use super::enums::{project_status_from_str, project_status_str, project_tier_from_str, project_tier_str};

fn row_to_project(row: &sqlx::postgres::PgRow) -> Project {
    Project {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        tier: project_tier_from_str(row.get::<String, _>("tier").as_str()),
        status: project_status_from_str(row.get::<String, _>("status").as_str()),
        mention_count: row.get("mention_count"),
        last_activity: row.get("last_activity"),
        user_pinned: row.get("user_pinned"),
        user_priority: row.get("user_priority"),
        user_deadline: row.get("user_deadline"),
    }
}

pub async fn get_project(pool: &PgPool, id: Id) -> DbResult<Option<Project>> {
    let row = sqlx::query("SELECT * FROM projects WHERE id = $1").bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(row_to_project))
}

pub async fn get_project_by_slug(pool: &PgPool, slug: &str) -> DbResult<Option<Project>> {
    let row = sqlx::query("SELECT * FROM projects WHERE slug = $1").bind(slug).fetch_optional(pool).await?;
    Ok(row.as_ref().map(row_to_project))
}

pub async fn list_projects(pool: &PgPool) -> DbResult<Vec<Project>> {
    let rows = sqlx::query("SELECT * FROM projects ORDER BY name").fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_project).collect())
}

/// Insert a project, or update it in place by `slug` (the unique key
/// the Classifier matches against, §4.F step 2).
pub async fn upsert_project(pool: &PgPool, project: &Project) -> DbResult<Project> {
    let row = sqlx::query(
        r#"
        INSERT INTO projects (id, name, slug, tier, status, mention_count, last_activity, user_pinned, user_priority, user_deadline)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (slug) DO UPDATE SET
            name = EXCLUDED.name,
            tier = EXCLUDED.tier,
            status = EXCLUDED.status,
            mention_count = EXCLUDED.mention_count,
            last_activity = EXCLUDED.last_activity,
            user_pinned = EXCLUDED.user_pinned,
            user_priority = EXCLUDED.user_priority,
            user_deadline = EXCLUDED.user_deadline
        RETURNING *
        "#,
    )
    .bind(project.id)
    .bind(&project.name)
    .bind(&project.slug)
    .bind(project_tier_str(project.tier))
    .bind(project_status_str(project.status))
    .bind(project.mention_count)
    .bind(project.last_activity)
    .bind(project.user_pinned)
    .bind(&project.user_priority)
    .bind(project.user_deadline)
    .fetch_one(pool)
    .await?;

    Ok(row_to_project(&row))
}

/// Bump `mention_count` and `last_activity` (4.K Entity Linker, each
/// time a turn mentions this project).
pub async fn record_project_mention(pool: &PgPool, id: Id, at: DateTime<Utc>) -> DbResult<()> {
    sqlx::query("UPDATE projects SET mention_count = mention_count + 1, last_activity = $2 WHERE id = $1")
        .bind(id)
        .bind(at)
        .execute(pool)
        .await?;
    Ok(())
}
