// crates/types/src/skill.rs
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Auto,
    Manual,
    Registry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillScope {
    Personal,
    Project,
}

/// A reusable procedural document (§3 Skill, GLOSSARY "Skill").
///
/// Invariant: `(name, scope)` unique among active skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub source: SkillSource,
    pub source_session_id: Option<Id>,
    pub installed_path: String,
    pub scope: SkillScope,
    pub quality_score: Option<f64>,
    pub content_hash: String,
    pub is_active: bool,
    pub triggers: Vec<String>,
}
