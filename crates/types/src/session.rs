// crates/types/src/session.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// A recorded coding-assistant session (§3 Session).
///
/// Created on first sighting of a transcript; mutated by the Recorder
/// and by summarization jobs. Never destroyed — sessions own their
/// turns (cascade delete), but the session row itself is permanent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Id,
    /// External session identifier from the transcript (unique).
    pub session_id: String,
    pub transcript_path: String,
    pub workspace_path: String,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub turn_count: i32,
    pub project_id: Option<Id>,
    pub is_processed: bool,
    pub title: Option<String>,
    pub summary: Option<String>,
}

impl Session {
    /// A fresh skeleton row created on first sighting of a transcript.
    pub fn new(session_id: impl Into<String>, transcript_path: impl Into<String>, workspace_path: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Id::new_v4(),
            session_id: session_id.into(),
            transcript_path: transcript_path.into(),
            workspace_path: workspace_path.into(),
            started_at: now,
            last_activity_at: now,
            turn_count: 0,
            project_id: None,
            is_processed: false,
            title: None,
            summary: None,
        }
    }
}
