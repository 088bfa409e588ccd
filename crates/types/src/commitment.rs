// crates/types/src/commitment.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentDirection {
    FromMe,
    ToMe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentStatus {
    Open,
    Fulfilled,
    Broken,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commitment {
    pub id: Id,
    pub person_id: Option<Id>,
    pub project_id: Option<Id>,
    pub direction: CommitmentDirection,
    pub description: String,
    pub deadline: Option<DateTime<Utc>>,
    pub status: CommitmentStatus,
}
