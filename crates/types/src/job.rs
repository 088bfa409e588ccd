// crates/types/src/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// The handlers the Worker dispatches to (§4.I table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    SessionProcess,
    TurnSummary,
    EntityExtract,
    ArtifactExtract,
    SessionSummary,
    SkillExtract,
}

impl JobKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobKind::SessionProcess => "session_process",
            JobKind::TurnSummary => "turn_summary",
            JobKind::EntityExtract => "entity_extract",
            JobKind::ArtifactExtract => "artifact_extract",
            JobKind::SessionSummary => "session_summary",
            JobKind::SkillExtract => "skill_extract",
        }
    }

    /// Default enqueue priority per the Recorder's ordering (§4.E step 5).
    /// Lower runs first.
    pub fn default_priority(self) -> i32 {
        match self {
            JobKind::SessionProcess => 1,
            JobKind::TurnSummary => 5,
            JobKind::EntityExtract => 7,
            JobKind::ArtifactExtract => 7,
            JobKind::SessionSummary => 10,
            JobKind::SkillExtract => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Retry,
    Done,
    Failed,
}

/// A queued unit of work (§3 Job, §4.B).
///
/// Jobs are independent of the domain entities they reference — they
/// carry IDs in `payload`, not foreign keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: Id,
    pub kind: JobKind,
    pub payload: serde_json::Value,
    pub status: JobStatus,
    /// Lower priority runs first.
    pub priority: i32,
    pub dedupe_key: Option<String>,
    pub attempts: i32,
    pub max_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub locked_by: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}
