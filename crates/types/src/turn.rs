// crates/types/src/turn.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// One user message together with the contiguous assistant response
/// (§3 Turn, GLOSSARY "Turn").
///
/// Invariant: `(session_id, turn_number)` is unique. `content_hash` is
/// a deterministic digest of `(user_message, assistant_raw_text,
/// ordered tool_names)`; re-ingestion with an identical hash is a
/// no-op (§4.E step 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Id,
    pub session_id: Id,
    pub turn_number: i32,
    pub user_message: String,
    pub assistant_summary: Option<String>,
    pub title: Option<String>,
    /// 64-hex content hash (blake3).
    pub content_hash: String,
    pub model_name: Option<String>,
    pub tool_names: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
}

/// Turn content separated from `Turn` to keep hot queries small (§3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnContent {
    pub turn_id: Id,
    pub raw_jsonl: String,
    pub assistant_text: String,
    pub files_touched: Vec<String>,
    pub commands_run: Vec<String>,
    pub errors_encountered: Vec<String>,
    pub tool_call_count: i32,
    pub content_size: i64,
}

/// Entity kind for `TurnEntity` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Project,
    Person,
}

/// A mention of a project/person resolved (or not) against the Store,
/// produced by the Entity Linker (§4.K) from Classifier matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEntity {
    pub turn_id: Id,
    pub entity_type: EntityType,
    pub entity_id: Option<Id>,
    pub entity_name: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

/// Artifact kind for `TurnArtifact` (§3, §4.D).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    File,
    Command,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnArtifact {
    pub turn_id: Id,
    pub artifact_type: ArtifactType,
    pub artifact_value: String,
    pub metadata: serde_json::Value,
}
