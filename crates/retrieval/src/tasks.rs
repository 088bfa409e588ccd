// crates/retrieval/src/tasks.rs
//! Tasks branch (§4.G): open tasks joined to matched projects.

use chrono::{DateTime, Utc};
use mnemo_db::queries::tasks::{days_to_due, open_tasks_for_projects};
use mnemo_db::DbResult;
use mnemo_types::{ContextItem, ContextKind, Id};
use sqlx::PgPool;

/// Sum of the maximum possible contribution of each term
/// (`priority_weight` + `pin_bonus` + `due_soon_bonus`), used to
/// normalize the raw sum back into `[0, 1]` (§4.G "normalized to
/// [0,1]").
const MAX_RAW_SCORE: f64 = 1.0 + 0.2 + 0.3;

pub async fn task_items(pool: &PgPool, project_ids: &[Id], now: DateTime<Utc>) -> DbResult<Vec<(ContextItem, Option<Id>)>> {
    let tasks = open_tasks_for_projects(pool, project_ids).await?;

    Ok(tasks
        .into_iter()
        .map(|t| {
            let priority_weight = t.priority.weight();
            let pin_bonus = if t.user_pinned { 0.2 } else { 0.0 };
            let due_soon_bonus = t
                .due_date
                .map(|due| (0.0f64).max((7.0 - days_to_due(due, now)) / 7.0) * 0.3)
                .unwrap_or(0.0);

            let score = ((priority_weight + pin_bonus + due_soon_bonus) / MAX_RAW_SCORE).min(1.0);

            let qualifier = t.due_date.map(|due| {
                let days = days_to_due(due, now).round() as i64;
                if days < 0 {
                    "overdue".to_string()
                } else {
                    format!("due in {days}d")
                }
            });

            let item = ContextItem {
                kind: ContextKind::Task,
                ref_id: t.id,
                title: t.title.clone(),
                body: None,
                qualifier,
                age_hours: None,
                score,
                metadata: serde_json::json!({ "priority": t.priority, "status": t.status }),
            };
            (item, t.project_id)
        })
        .collect())
}
