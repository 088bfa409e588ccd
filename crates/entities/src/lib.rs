// crates/entities/src/lib.rs
//! Entity Linker / Project State (§4.K).
//!
//! Given a turn's full text, scans for project slugs/names and person
//! names using the same lexical algorithm the Classifier uses on
//! prompts, then persists the result as `TurnEntity` rows. Also
//! maintains the per-workspace "selected project" the Retriever falls
//! back to as its `Focus` item when the Signal itself carries no
//! explicit project match.

use mnemo_core::classifier::Classifier;
use mnemo_db::DbResult;
use mnemo_types::{EntityType, Id, Person, Project, TurnEntity};
use sqlx::PgConnection;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    Db(#[from] mnemo_db::DbError),
    #[error("classifier unavailable: {0}")]
    Classify(#[from] mnemo_core::error::ClassifyError),
}

/// Scans `text` for mentions of any of `projects`/`people` and returns
/// the `TurnEntity` rows to persist for `turn_id` — callers combine
/// this with `mnemo_db::queries::turns::replace_turn_entities` inside
/// the Recorder's per-turn transaction (§4.E).
pub fn link_text(turn_id: Id, text: &str, projects: &[Project], people: &[Person]) -> Result<Vec<TurnEntity>, LinkError> {
    let classifier = Classifier::new()?;
    let signal = classifier.classify(text, projects, people);

    let mut entities = Vec::with_capacity(signal.projects.len() + signal.people.len());
    for m in &signal.projects {
        entities.push(TurnEntity {
            turn_id,
            entity_type: EntityType::Project,
            entity_id: m.id,
            entity_name: m.name.clone(),
            confidence: m.confidence,
        });
    }
    for m in &signal.people {
        entities.push(TurnEntity {
            turn_id,
            entity_type: EntityType::Person,
            entity_id: m.id,
            entity_name: m.name.clone(),
            confidence: m.confidence,
        });
    }
    Ok(entities)
}

/// Re-links a turn's user message + assistant text against the
/// current project/person rows and writes the result, replacing
/// whatever entities were previously recorded (handlers re-run
/// wholesale rather than diff, §5).
pub async fn link_turn(
    conn: &mut PgConnection,
    turn_id: Id,
    text: &str,
    projects: &[Project],
    people: &[Person],
) -> Result<Vec<TurnEntity>, LinkError> {
    let entities = link_text(turn_id, text, projects, people)?;
    mnemo_db::queries::turns::replace_turn_entities(conn, turn_id, &entities).await?;
    Ok(entities)
}

/// The project most recently associated with the highest-mention
/// sessions for `workspace_path` — the Retriever's Focus fallback
/// (§4.G) when the Signal carries no explicit project match.
pub async fn selected_project(pool: &sqlx::PgPool, workspace_path: &str) -> DbResult<Option<Project>> {
    mnemo_db::queries::retrieval::focus_project_for_workspace(pool, workspace_path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnemo_types::{Person, Project, ProjectStatus, ProjectTier};
    use uuid::Uuid;

    fn project(name: &str, slug: &str) -> Project {
        Project {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slug.to_string(),
            tier: ProjectTier::Simple,
            status: ProjectStatus::Active,
            mention_count: 0,
            last_activity: None,
            user_pinned: false,
            user_priority: None,
            user_deadline: None,
        }
    }

    fn person(name: &str) -> Person {
        Person {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: None,
            relationship: "colleague".to_string(),
            organization: None,
        }
    }

    #[test]
    fn links_a_project_mentioned_in_turn_text() {
        let turn_id = Uuid::new_v4();
        let projects = vec![project("Simon", "simon")];
        let people: Vec<Person> = vec![];

        let entities = link_text(turn_id, "refactored the simon auth module today", &projects, &people).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_type, EntityType::Project);
        assert_eq!(entities[0].entity_name, "Simon");
        assert_eq!(entities[0].turn_id, turn_id);
    }

    #[test]
    fn links_a_person_mentioned_by_first_name() {
        let turn_id = Uuid::new_v4();
        let projects: Vec<Project> = vec![];
        let people = vec![person("Priya Patel")];

        let entities = link_text(turn_id, "synced with priya about the rollout", &projects, &people).unwrap();

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].entity_type, EntityType::Person);
    }

    #[test]
    fn no_mentions_yields_no_entities() {
        let turn_id = Uuid::new_v4();
        let entities = link_text(turn_id, "nothing relevant here", &[], &[]).unwrap();
        assert!(entities.is_empty());
    }
}
