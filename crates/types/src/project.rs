// crates/types/src/project.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectTier {
    Fleeting,
    Simple,
    Complex,
    LifeThread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Paused,
    Completed,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Id,
    pub name: String,
    /// Unique slug used for lexical matching by the Classifier (§4.F).
    pub slug: String,
    pub tier: ProjectTier,
    pub status: ProjectStatus,
    pub mention_count: i64,
    pub last_activity: Option<DateTime<Utc>>,
    pub user_pinned: bool,
    pub user_priority: Option<String>,
    pub user_deadline: Option<DateTime<Utc>>,
}
