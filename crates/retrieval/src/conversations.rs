// crates/retrieval/src/conversations.rs
//! Conversations branch (§4.G): turns whose entities or touched files
//! intersect the Signal, in the last 14 days.

use chrono::{DateTime, Utc};
use mnemo_db::queries::retrieval::conversation_candidates;
use mnemo_db::DbResult;
use mnemo_types::{ContextItem, ContextKind, Id};
use sqlx::PgPool;

use crate::normalize_count;

const ENTITY_OVERLAP_CAP: i64 = 3;
const PATH_OVERLAP_CAP: i64 = 3;

pub async fn conversation_items(
    pool: &PgPool,
    project_ids: &[Id],
    person_ids: &[Id],
    paths: &[String],
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> DbResult<Vec<(ContextItem, Option<Id>)>> {
    let candidates = conversation_candidates(pool, project_ids, person_ids, paths, since).await?;

    Ok(candidates
        .into_iter()
        .map(|c| {
            let age_hours = (now - c.started_at).num_seconds() as f64 / 3600.0;
            let recency = ContextItem::recency(age_hours.max(0.0));
            let entity_norm = normalize_count(c.entity_overlap, ENTITY_OVERLAP_CAP);
            let path_norm = normalize_count(c.path_overlap, PATH_OVERLAP_CAP);
            let score = 0.5 * entity_norm + 0.3 * recency + 0.2 * path_norm;

            let title = c.title.clone().unwrap_or_else(|| truncate(&c.user_message, 80));
            let item = ContextItem {
                kind: ContextKind::Conversation,
                ref_id: c.turn_id,
                title,
                body: Some(truncate(&c.user_message, 200)),
                qualifier: None,
                age_hours: Some(age_hours),
                score,
                metadata: serde_json::json!({ "session_id": c.session_id }),
            };
            (item, c.project_id)
        })
        .collect())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_text_untouched() {
        assert_eq!(truncate("short", 80), "short");
    }

    #[test]
    fn truncate_adds_ellipsis_past_the_limit() {
        let long = "x".repeat(100);
        let out = truncate(&long, 10);
        assert_eq!(out.chars().count(), 11);
        assert!(out.ends_with('…'));
    }
}
