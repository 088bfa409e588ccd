// crates/retrieval/src/errors.rs
//! Errors branch (§4.G): recent `error` TurnArtifacts whose turn
//! entities or files intersect the Signal, preferring the last 72
//! hours.

use chrono::{DateTime, Utc};
use mnemo_db::queries::retrieval::recent_error_candidates;
use mnemo_db::DbResult;
use mnemo_types::{ContextItem, ContextKind, Id};
use sqlx::PgPool;

/// Decay constant realizing "prefer last 72 hours" as a recency curve
/// rather than a hard cutoff — an error from an hour ago outranks one
/// from three days ago, but both are still surfaced if nothing fresher
/// exists.
const ERROR_RECENCY_HALF_LIFE_HOURS: f64 = 72.0;

pub async fn error_items(pool: &PgPool, project_ids: &[Id], person_ids: &[Id], paths: &[String], since: DateTime<Utc>, now: DateTime<Utc>) -> DbResult<Vec<(ContextItem, Option<Id>)>> {
    let candidates = recent_error_candidates(pool, project_ids, person_ids, paths, since).await?;

    Ok(candidates
        .into_iter()
        .map(|c| {
            let age_hours = (now - c.created_at).num_seconds() as f64 / 3600.0;
            let score = (-age_hours.max(0.0) / ERROR_RECENCY_HALF_LIFE_HOURS).exp();

            let item = ContextItem {
                kind: ContextKind::Error,
                ref_id: c.turn_id,
                title: "Error".to_string(),
                body: Some(c.artifact_value.clone()),
                qualifier: None,
                age_hours: Some(age_hours),
                score,
                metadata: serde_json::Value::Null,
            };
            (item, c.project_id)
        })
        .collect())
}
