// crates/db/src/queries/skills.rs
use mnemo_types::{Id, Skill};
use sqlx::PgPool;
use sqlx::Row;

use crate::DbResult;

use super::enums::{skill_scope_from_str, skill_scope_str, skill_source_from_str, skill_source_str};

fn row_to_skill(row: &sqlx::postgres::PgRow) -> Skill {
    Skill {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        source: skill_source_from_str(row.get::<String, _>("source").as_str()),
        source_session_id: row.get("source_session_id"),
        installed_path: row.get("installed_path"),
        scope: skill_scope_from_str(row.get::<String, _>("scope").as_str()),
        quality_score: row.get("quality_score"),
        content_hash: row.get("content_hash"),
        is_active: row.get("is_active"),
        triggers: serde_json::from_value(row.get("triggers")).unwrap_or_default(),
    }
}

pub async fn get_skill_by_name_scope(pool: &PgPool, name: &str, scope: mnemo_types::SkillScope) -> DbResult<Option<Skill>> {
    let row = sqlx::query("SELECT * FROM skills WHERE name = $1 AND scope = $2 AND is_active")
        .bind(name)
        .bind(skill_scope_str(scope))
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(row_to_skill))
}

pub async fn list_active_skills(pool: &PgPool) -> DbResult<Vec<Skill>> {
    let rows = sqlx::query("SELECT * FROM skills WHERE is_active ORDER BY name").fetch_all(pool).await?;
    Ok(rows.iter().map(row_to_skill).collect())
}

/// Upsert by `(name, scope)` among active skills (§3 Skill invariant,
/// §4.J "no-op if content_hash matches").
pub async fn upsert_skill(pool: &PgPool, skill: &Skill) -> DbResult<Skill> {
    let row = sqlx::query(
        r#"
        INSERT INTO skills (id, name, description, source, source_session_id, installed_path, scope, quality_score, content_hash, is_active, triggers)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (name, scope) WHERE is_active DO UPDATE SET
            description = EXCLUDED.description,
            source = EXCLUDED.source,
            source_session_id = EXCLUDED.source_session_id,
            installed_path = EXCLUDED.installed_path,
            quality_score = EXCLUDED.quality_score,
            content_hash = EXCLUDED.content_hash,
            triggers = EXCLUDED.triggers
        RETURNING *
        "#,
    )
    .bind(skill.id)
    .bind(&skill.name)
    .bind(&skill.description)
    .bind(skill_source_str(skill.source))
    .bind(skill.source_session_id)
    .bind(&skill.installed_path)
    .bind(skill_scope_str(skill.scope))
    .bind(skill.quality_score)
    .bind(&skill.content_hash)
    .bind(skill.is_active)
    .bind(serde_json::to_value(&skill.triggers).unwrap_or_default())
    .fetch_one(pool)
    .await?;

    Ok(row_to_skill(&row))
}

pub async fn deactivate_skill(pool: &PgPool, id: Id) -> DbResult<()> {
    sqlx::query("UPDATE skills SET is_active = FALSE WHERE id = $1").bind(id).execute(pool).await?;
    Ok(())
}
