// crates/retrieval/src/lib.rs
//! Retriever (§4.G): fans a Signal out across six independent
//! branches — Conversations, Tasks, Commitments, Skills, Errors, and
//! Focus — each scored in `[0, 1]`, under a shared wall-clock
//! deadline. Branches still running at the deadline are cancelled and
//! their partial results discarded, never surfaced as stale or wrong.
//!
//! Sprint boosts (§3, §8 property 7) are applied afterward, keyed by
//! whichever project each item is associated with.

pub mod commitments;
pub mod conversations;
pub mod errors;
pub mod focus;
pub mod skills;
pub mod tasks;

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mnemo_types::{ContextItem, Id, Signal};
use sqlx::PgPool;
use tokio::time::timeout;
use tracing::warn;

/// `count / cap`, saturating at 1.0 — shared normalization for the
/// overlap counts the Conversations and (implicitly) Errors branches
/// work with.
pub(crate) fn normalize_count(count: i64, cap: i64) -> f64 {
    (count.max(0) as f64 / cap as f64).min(1.0)
}

/// Run every branch concurrently, each bounded by `deadline`, and
/// return the combined scored items with sprint boosts applied.
pub async fn retrieve(pool: &PgPool, signal: &Signal, workspace_path: &str, now: DateTime<Utc>, deadline: Duration) -> Vec<ContextItem> {
    let project_ids: Vec<Id> = signal.projects.iter().filter_map(|m| m.id).collect();
    let person_ids: Vec<Id> = signal.people.iter().filter_map(|m| m.id).collect();
    let paths = signal.paths.clone();
    let since = now - chrono::Duration::days(14);

    let (conv, task, commit, skill, error, focus) = tokio::join!(
        timeout(deadline, conversations::conversation_items(pool, &project_ids, &person_ids, &paths, since, now)),
        timeout(deadline, tasks::task_items(pool, &project_ids, now)),
        timeout(deadline, commitments::commitment_items(pool, &project_ids, &person_ids, now)),
        timeout(deadline, skills::skill_items(pool, signal)),
        timeout(deadline, errors::error_items(pool, &project_ids, &person_ids, &paths, since, now)),
        timeout(deadline, focus::focus_item(pool, workspace_path, signal)),
    );

    let mut collected: Vec<(ContextItem, Option<Id>)> = Vec::new();
    collected.extend(collect_branch("conversations", conv));
    collected.extend(collect_branch("tasks", task));
    collected.extend(collect_branch("commitments", commit));
    collected.extend(collect_branch("skills", skill));
    collected.extend(collect_branch("errors", error));
    collected.extend(collect_branch("focus", focus));

    let boost_project_ids: Vec<Id> = collected.iter().filter_map(|(_, project_id)| *project_id).collect();
    let boosts = effective_boosts(pool, &boost_project_ids, now).await;

    collected
        .into_iter()
        .map(|(mut item, project_id)| {
            if let Some(project_id) = project_id {
                if let Some(&boost) = boosts.get(&project_id) {
                    item.apply_boost(boost);
                }
            }
            item
        })
        .collect()
}

fn collect_branch(name: &str, result: Result<mnemo_db::DbResult<Vec<(ContextItem, Option<Id>)>>, tokio::time::error::Elapsed>) -> Vec<(ContextItem, Option<Id>)> {
    match result {
        Ok(Ok(items)) => items,
        Ok(Err(db_err)) => {
            warn!(branch = name, error = %db_err, "retriever branch failed");
            Vec::new()
        }
        Err(_) => {
            warn!(branch = name, "retriever branch exceeded its deadline, discarding");
            Vec::new()
        }
    }
}

async fn effective_boosts(pool: &PgPool, project_ids: &[Id], now: DateTime<Utc>) -> HashMap<Id, f64> {
    if project_ids.is_empty() {
        return HashMap::new();
    }
    let mut deduped = project_ids.to_vec();
    deduped.sort();
    deduped.dedup();

    match mnemo_db::queries::sprints::effective_sprint_boosts(pool, &deduped, now).await {
        Ok(boosts) => boosts,
        Err(e) => {
            warn!(error = %e, "failed to load sprint boosts, proceeding unboosted");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_count_saturates_at_the_cap() {
        assert_eq!(normalize_count(0, 3), 0.0);
        assert!((normalize_count(3, 3) - 1.0).abs() < 1e-9);
        assert!((normalize_count(10, 3) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn normalize_count_is_linear_below_the_cap() {
        assert!((normalize_count(1, 4) - 0.25).abs() < 1e-9);
    }
}
