// crates/retrieval/src/focus.rs
//! Focus branch (§4.G, §4.K): the project the prompt itself names, or
//! — absent any Signal match — the selected project for the workspace
//! from prior session history.

use mnemo_db::queries::projects::get_project;
use mnemo_db::queries::retrieval::focus_project_for_workspace;
use mnemo_db::DbResult;
use mnemo_types::{ContextItem, ContextKind, Id, Project, Signal};
use sqlx::PgPool;

/// Focus has no competing candidates within its own branch — a
/// selected project is either present or it isn't — so it scores at
/// the top of its own ranking band and lets sprint boosts (if any)
/// push it further.
const FOCUS_SCORE: f64 = 1.0;

fn to_item(p: &Project) -> (ContextItem, Option<Id>) {
    let item = ContextItem {
        kind: ContextKind::Focus,
        ref_id: p.id,
        title: p.name.clone(),
        body: None,
        qualifier: Some(format!("{:?}", p.tier)),
        age_hours: None,
        score: FOCUS_SCORE,
        metadata: serde_json::json!({ "slug": p.slug, "status": p.status }),
    };
    (item, Some(p.id))
}

/// Prefer the Signal's own highest-confidence project match (§4.K):
/// a prompt naming a project it has never touched before — S1's
/// fresh-workspace scenario — still surfaces Focus. Only when the
/// Signal has no project match do we fall back to the workspace's
/// prior session history.
pub async fn focus_item(pool: &PgPool, workspace_path: &str, signal: &Signal) -> DbResult<Vec<(ContextItem, Option<Id>)>> {
    let top_signal_project = signal
        .projects
        .iter()
        .filter(|m| m.id.is_some())
        .max_by(|a, b| a.confidence.partial_cmp(&b.confidence).unwrap_or(std::cmp::Ordering::Equal))
        .and_then(|m| m.id);

    if let Some(id) = top_signal_project {
        if let Some(project) = get_project(pool, id).await? {
            return Ok(vec![to_item(&project)]);
        }
    }

    let project = focus_project_for_workspace(pool, workspace_path).await?;
    Ok(match project {
        Some(p) => vec![to_item(&p)],
        None => Vec::new(),
    })
}
