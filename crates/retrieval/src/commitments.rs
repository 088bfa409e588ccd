// crates/retrieval/src/commitments.rs
//! Commitments branch (§4.G): open commitments touching matched
//! people or projects, favoring `to_me` with near deadlines.

use chrono::{DateTime, Utc};
use mnemo_db::queries::commitments::open_commitments_for;
use mnemo_db::queries::tasks::days_to_due;
use mnemo_db::DbResult;
use mnemo_types::{CommitmentDirection, ContextItem, ContextKind, Id};
use sqlx::PgPool;

const TO_ME_BASE: f64 = 0.6;
const FROM_ME_BASE: f64 = 0.4;
const DUE_SOON_WEIGHT: f64 = 0.4;

pub async fn commitment_items(pool: &PgPool, project_ids: &[Id], person_ids: &[Id], now: DateTime<Utc>) -> DbResult<Vec<(ContextItem, Option<Id>)>> {
    let commitments = open_commitments_for(pool, project_ids, person_ids).await?;

    Ok(commitments
        .into_iter()
        .map(|c| {
            let base = match c.direction {
                CommitmentDirection::ToMe => TO_ME_BASE,
                CommitmentDirection::FromMe => FROM_ME_BASE,
            };
            let due_soon_bonus = c
                .deadline
                .map(|d| (0.0f64).max((7.0 - days_to_due(d, now)) / 7.0) * DUE_SOON_WEIGHT)
                .unwrap_or(0.0);
            let score = (base + due_soon_bonus).min(1.0);

            let direction_label = match c.direction {
                CommitmentDirection::ToMe => "to me",
                CommitmentDirection::FromMe => "from me",
            };

            let item = ContextItem {
                kind: ContextKind::Commitment,
                ref_id: c.id,
                title: c.description.clone(),
                body: None,
                qualifier: Some(direction_label.to_string()),
                age_hours: None,
                score,
                metadata: serde_json::json!({ "direction": c.direction, "person_id": c.person_id }),
            };
            (item, c.project_id)
        })
        .collect())
}
