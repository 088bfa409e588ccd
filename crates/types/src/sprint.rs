// crates/types/src/sprint.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Id;

/// A time-boxed priority boost for a project (§3 Sprint, GLOSSARY
/// "Effective sprint").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    pub id: Id,
    pub project_id: Id,
    pub priority_boost: f64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

impl Sprint {
    /// A sprint is effective iff `is_active ∧ now ∈ [starts_at, ends_at]`.
    pub fn is_effective_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now >= self.starts_at && now <= self.ends_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use uuid::Uuid;

    fn sprint(is_active: bool, offset_start: i64, offset_end: i64) -> Sprint {
        let now = Utc::now();
        Sprint {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            priority_boost: 1.5,
            starts_at: now + Duration::hours(offset_start),
            ends_at: now + Duration::hours(offset_end),
            is_active,
        }
    }

    #[test]
    fn effective_requires_active_and_in_window() {
        let now = Utc::now();
        assert!(sprint(true, -1, 1).is_effective_at(now));
        assert!(!sprint(false, -1, 1).is_effective_at(now));
        assert!(!sprint(true, 1, 2).is_effective_at(now));
        assert!(!sprint(true, -2, -1).is_effective_at(now));
    }
}
