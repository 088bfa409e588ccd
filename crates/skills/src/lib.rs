// crates/skills/src/lib.rs
//! Skill Engine (§4.J): scores a completed session, and — if it clears
//! the configured quality threshold — synthesizes a SKILL document via
//! the model capability interface, writes it to disk, and upserts the
//! registry row. Also supports manual creation and registry
//! installation.
//!
//! Open Question: §4.J doesn't say how `scope` is chosen for
//! auto-generated skills. Resolved here as: `Project` when the source
//! session has a `project_id`, `Personal` otherwise — a session with
//! no identified project has no natural project-scoped home for the
//! skill it produced.

pub mod document;
pub mod quality;

pub use quality::{quality_score, TurnSignal};

use mnemo_core::paths::skill_document_path;
use mnemo_db::DbError;
use mnemo_llm::{LlmError, LlmProvider, SynthesizeSkillRequest};
use mnemo_types::{Id, Session, Skill, SkillScope, SkillSource};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error("failed to write skill document: {0}")]
    Io(#[from] std::io::Error),
    #[error("no installed-path base directory is configured for this platform")]
    NoBaseDir,
}

fn scope_for_session(session: &Session) -> SkillScope {
    if session.project_id.is_some() {
        SkillScope::Project
    } else {
        SkillScope::Personal
    }
}

fn content_hash(doc: &str) -> String {
    blake3::hash(doc.as_bytes()).to_hex().to_string()
}

/// Score `session` and, if it clears `min_quality_score`, synthesize
/// and persist a Skill. Returns `Ok(None)` when the session doesn't
/// clear the threshold — not an error, just "nothing to generate"
/// (§4.J "A configurable threshold... gates generation").
pub async fn generate_for_session(
    pool: &sqlx::PgPool,
    llm: &dyn LlmProvider,
    min_quality_score: f64,
    confirmation_keywords: &[String],
    session: &Session,
    turn_signals: &[TurnSignal],
    final_user_message: &str,
    turn_summaries: &[String],
    top_entities: &[String],
    top_files: &[String],
) -> Result<Option<Skill>, SkillError> {
    let score = quality_score(turn_signals, final_user_message, confirmation_keywords);
    if score < min_quality_score {
        info!(session_id = %session.id, score, threshold = min_quality_score, "session below skill quality threshold");
        return Ok(None);
    }

    let synthesis = match llm
        .synthesize_skill(SynthesizeSkillRequest {
            session_title: session.title.clone(),
            turn_summaries: turn_summaries.to_vec(),
            top_entities: top_entities.to_vec(),
            top_files: top_files.to_vec(),
        })
        .await
    {
        Ok(s) => s,
        Err(e) => return Err(SkillError::Llm(e)),
    };

    let scope = scope_for_session(session);
    let name = document::slugify(&synthesis.name);
    let doc = document::render_skill_document(&name, &synthesis.description, &synthesis.triggers, &synthesis.procedure);
    let hash = content_hash(&doc);

    if let Some(existing) = mnemo_db::queries::skills::get_skill_by_name_scope(pool, &name, scope).await? {
        if existing.content_hash == hash {
            info!(skill = %name, "skill unchanged, no-op");
            return Ok(Some(existing));
        }
    }

    let path = skill_document_path(scope, &name).ok_or(SkillError::NoBaseDir)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &doc)?;

    let skill = Skill {
        id: Uuid::new_v4(),
        name,
        description: synthesis.description,
        source: SkillSource::Auto,
        source_session_id: Some(session.id),
        installed_path: path.to_string_lossy().to_string(),
        scope,
        quality_score: Some(score),
        content_hash: hash,
        is_active: true,
        triggers: synthesis.triggers,
    };

    let stored = mnemo_db::queries::skills::upsert_skill(pool, &skill).await?;
    info!(skill = %stored.name, score, "skill generated");
    Ok(Some(stored))
}

/// Synthesize a SKILL directly from a natural-language description,
/// bypassing quality gating (§4.J "Manual creation").
pub async fn create_manual(
    pool: &sqlx::PgPool,
    llm: &dyn LlmProvider,
    scope: SkillScope,
    description: &str,
) -> Result<Skill, SkillError> {
    let synthesis = llm
        .synthesize_skill(SynthesizeSkillRequest {
            session_title: None,
            turn_summaries: vec![description.to_string()],
            top_entities: vec![],
            top_files: vec![],
        })
        .await?;

    let name = document::slugify(&synthesis.name);
    let doc = document::render_skill_document(&name, &synthesis.description, &synthesis.triggers, &synthesis.procedure);
    let hash = content_hash(&doc);

    let path = skill_document_path(scope, &name).ok_or(SkillError::NoBaseDir)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, &doc)?;

    let skill = Skill {
        id: Uuid::new_v4(),
        name,
        description: synthesis.description,
        source: SkillSource::Manual,
        source_session_id: None,
        installed_path: path.to_string_lossy().to_string(),
        scope,
        quality_score: None,
        content_hash: hash,
        is_active: true,
        triggers: synthesis.triggers,
    };

    Ok(mnemo_db::queries::skills::upsert_skill(pool, &skill).await?)
}

/// Install a remote SKILL document verbatim (§4.J "Registry
/// installation"), recording `source=registry`.
pub async fn install_from_registry(pool: &sqlx::PgPool, scope: SkillScope, name: &str, document: &str, triggers: Vec<String>, description: &str) -> Result<Skill, SkillError> {
    let slug = document::slugify(name);
    let hash = content_hash(document);
    let path = skill_document_path(scope, &slug).ok_or(SkillError::NoBaseDir)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, document)?;

    let skill = Skill {
        id: Uuid::new_v4(),
        name: slug,
        description: description.to_string(),
        source: SkillSource::Registry,
        source_session_id: None,
        installed_path: path.to_string_lossy().to_string(),
        scope,
        quality_score: None,
        content_hash: hash,
        is_active: true,
        triggers,
    };

    Ok(mnemo_db::queries::skills::upsert_skill(pool, &skill).await?)
}

pub async fn deactivate(pool: &sqlx::PgPool, id: Id) -> Result<(), SkillError> {
    mnemo_db::queries::skills::deactivate_skill(pool, id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn session_with_project() -> Session {
        let mut s = Session::new("sess-1", "/tmp/t.jsonl", "/workspace", Utc::now());
        s.project_id = Some(Uuid::new_v4());
        s
    }

    #[test]
    fn scope_follows_session_project_presence() {
        assert_eq!(scope_for_session(&session_with_project()), SkillScope::Project);
        let no_project = Session::new("sess-2", "/tmp/t.jsonl", "/workspace", Utc::now());
        assert_eq!(scope_for_session(&no_project), SkillScope::Personal);
    }

    #[test]
    fn content_hash_is_deterministic_and_64_hex() {
        let a = content_hash("same doc");
        let b = content_hash("same doc");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn content_hash_changes_with_document_text() {
        assert_ne!(content_hash("doc one"), content_hash("doc two"));
    }
}
