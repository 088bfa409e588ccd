// crates/retrieval/src/skills.rs
//! Skills branch (§4.G): active installed skills whose name,
//! description, or declared triggers overlap the Signal, scored by
//! Jaccard overlap on lowercased tokens.

use mnemo_db::queries::skills::list_active_skills;
use mnemo_db::DbResult;
use mnemo_types::{ContextItem, ContextKind, Id, Signal};
use sqlx::PgPool;
use std::collections::HashSet;

fn tokenize(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

fn signal_tokens(signal: &Signal) -> HashSet<String> {
    let mut tokens: HashSet<String> = signal.keywords.iter().flat_map(|k| tokenize(k)).collect();
    tokens.extend(signal.project_names().flat_map(tokenize));
    tokens
}

pub async fn skill_items(pool: &PgPool, signal: &Signal) -> DbResult<Vec<(ContextItem, Option<Id>)>> {
    let skills = list_active_skills(pool).await?;
    let signal_tokens = signal_tokens(signal);
    if signal_tokens.is_empty() {
        return Ok(Vec::new());
    }

    Ok(skills
        .into_iter()
        .filter_map(|s| {
            let mut skill_tokens = tokenize(&s.name);
            skill_tokens.extend(tokenize(&s.description));
            skill_tokens.extend(s.triggers.iter().flat_map(|t| tokenize(t)));

            let score = jaccard(&signal_tokens, &skill_tokens);
            if score <= 0.0 {
                return None;
            }

            let item = ContextItem {
                kind: ContextKind::Skill,
                ref_id: s.id,
                title: s.name.clone(),
                body: Some(s.description.clone()),
                qualifier: None,
                age_hours: None,
                score,
                metadata: serde_json::json!({ "scope": s.scope, "triggers": s.triggers }),
            };
            Some((item, None))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jaccard_of_disjoint_sets_is_zero() {
        let a: HashSet<String> = ["deploy".into()].into_iter().collect();
        let b: HashSet<String> = ["refactor".into()].into_iter().collect();
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn jaccard_of_identical_sets_is_one() {
        let a: HashSet<String> = ["deploy".into(), "release".into()].into_iter().collect();
        assert_eq!(jaccard(&a, &a.clone()), 1.0);
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        let tokens = tokenize("Deploy-Checklist, v2!");
        assert!(tokens.contains("deploy"));
        assert!(tokens.contains("checklist"));
        assert!(tokens.contains("v2"));
    }
}
