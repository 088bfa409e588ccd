// crates/db/src/queries/commitments.rs
use mnemo_types::{Commitment, Id};
use sqlx::PgPool;
use sqlx::Row;

use crate::DbResult;

use super::enums::{commitment_direction_from_str, commitment_direction_str, commitment_status_from_str, commitment_status_str};

fn row_to_commitment(row: &sqlx::postgres::PgRow) -> Commitment {
    Commitment {
        id: row.get("id"),
        person_id: row.get("person_id"),
        project_id: row.get("project_id"),
        direction: commitment_direction_from_str(row.get::<String, _>("direction").as_str()),
        description: row.get("description"),
        deadline: row.get("deadline"),
        status: commitment_status_from_str(row.get::<String, _>("status").as_str()),
    }
}

pub async fn upsert_commitment(pool: &PgPool, commitment: &Commitment) -> DbResult<Commitment> {
    let row = sqlx::query(
        r#"
        INSERT INTO commitments (id, person_id, project_id, direction, description, deadline, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            person_id = EXCLUDED.person_id,
            project_id = EXCLUDED.project_id,
            direction = EXCLUDED.direction,
            description = EXCLUDED.description,
            deadline = EXCLUDED.deadline,
            status = EXCLUDED.status
        RETURNING *
        "#,
    )
    .bind(commitment.id)
    .bind(commitment.person_id)
    .bind(commitment.project_id)
    .bind(commitment_direction_str(commitment.direction))
    .bind(&commitment.description)
    .bind(commitment.deadline)
    .bind(commitment_status_str(commitment.status))
    .fetch_one(pool)
    .await?;

    Ok(row_to_commitment(&row))
}

/// Open commitments touching the matched projects or people (§4.G
/// Commitments branch).
pub async fn open_commitments_for(pool: &PgPool, project_ids: &[Id], person_ids: &[Id]) -> DbResult<Vec<Commitment>> {
    if project_ids.is_empty() && person_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query(
        r#"
        SELECT * FROM commitments
        WHERE status = 'open'
          AND (project_id = ANY($1) OR person_id = ANY($2))
        "#,
    )
    .bind(project_ids)
    .bind(person_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_commitment).collect())
}
