// crates/db/src/queries/enums.rs
//! String<->enum conversions for the handful of `mnemo_types` enums
//! stored as Postgres `TEXT`. Kept separate from the wire (serde)
//! representations in `mnemo-types` since the Store owns its own
//! column literals.

use mnemo_types::{
    ArtifactType, CommitmentDirection, CommitmentStatus, EntityType, Priority, ProjectStatus,
    ProjectTier, SkillScope, SkillSource, TaskStatus,
};

pub fn project_tier_str(v: ProjectTier) -> &'static str {
    match v {
        ProjectTier::Fleeting => "fleeting",
        ProjectTier::Simple => "simple",
        ProjectTier::Complex => "complex",
        ProjectTier::LifeThread => "life_thread",
    }
}

pub fn project_tier_from_str(s: &str) -> ProjectTier {
    match s {
        "fleeting" => ProjectTier::Fleeting,
        "complex" => ProjectTier::Complex,
        "life_thread" => ProjectTier::LifeThread,
        _ => ProjectTier::Simple,
    }
}

pub fn project_status_str(v: ProjectStatus) -> &'static str {
    match v {
        ProjectStatus::Active => "active",
        ProjectStatus::Paused => "paused",
        ProjectStatus::Completed => "completed",
        ProjectStatus::Abandoned => "abandoned",
    }
}

pub fn project_status_from_str(s: &str) -> ProjectStatus {
    match s {
        "paused" => ProjectStatus::Paused,
        "completed" => ProjectStatus::Completed,
        "abandoned" => ProjectStatus::Abandoned,
        _ => ProjectStatus::Active,
    }
}

pub fn task_status_str(v: TaskStatus) -> &'static str {
    match v {
        TaskStatus::Backlog => "backlog",
        TaskStatus::InProgress => "in_progress",
        TaskStatus::Waiting => "waiting",
        TaskStatus::Done => "done",
    }
}

pub fn task_status_from_str(s: &str) -> TaskStatus {
    match s {
        "in_progress" => TaskStatus::InProgress,
        "waiting" => TaskStatus::Waiting,
        "done" => TaskStatus::Done,
        _ => TaskStatus::Backlog,
    }
}

pub fn priority_str(v: Priority) -> &'static str {
    match v {
        Priority::Urgent => "urgent",
        Priority::High => "high",
        Priority::Normal => "normal",
        Priority::Low => "low",
    }
}

pub fn priority_from_str(s: &str) -> Priority {
    match s {
        "urgent" => Priority::Urgent,
        "high" => Priority::High,
        "low" => Priority::Low,
        _ => Priority::Normal,
    }
}

pub fn commitment_direction_str(v: CommitmentDirection) -> &'static str {
    match v {
        CommitmentDirection::FromMe => "from_me",
        CommitmentDirection::ToMe => "to_me",
    }
}

pub fn commitment_direction_from_str(s: &str) -> CommitmentDirection {
    match s {
        "to_me" => CommitmentDirection::ToMe,
        _ => CommitmentDirection::FromMe,
    }
}

pub fn commitment_status_str(v: CommitmentStatus) -> &'static str {
    match v {
        CommitmentStatus::Open => "open",
        CommitmentStatus::Fulfilled => "fulfilled",
        CommitmentStatus::Broken => "broken",
        CommitmentStatus::Cancelled => "cancelled",
    }
}

pub fn commitment_status_from_str(s: &str) -> CommitmentStatus {
    match s {
        "fulfilled" => CommitmentStatus::Fulfilled,
        "broken" => CommitmentStatus::Broken,
        "cancelled" => CommitmentStatus::Cancelled,
        _ => CommitmentStatus::Open,
    }
}

pub fn entity_type_str(v: EntityType) -> &'static str {
    match v {
        EntityType::Project => "project",
        EntityType::Person => "person",
    }
}

pub fn entity_type_from_str(s: &str) -> EntityType {
    match s {
        "person" => EntityType::Person,
        _ => EntityType::Project,
    }
}

pub fn artifact_type_str(v: ArtifactType) -> &'static str {
    match v {
        ArtifactType::File => "file",
        ArtifactType::Command => "command",
        ArtifactType::Error => "error",
    }
}

pub fn artifact_type_from_str(s: &str) -> ArtifactType {
    match s {
        "command" => ArtifactType::Command,
        "error" => ArtifactType::Error,
        _ => ArtifactType::File,
    }
}

pub fn skill_source_str(v: SkillSource) -> &'static str {
    match v {
        SkillSource::Auto => "auto",
        SkillSource::Manual => "manual",
        SkillSource::Registry => "registry",
    }
}

pub fn skill_source_from_str(s: &str) -> SkillSource {
    match s {
        "manual" => SkillSource::Manual,
        "registry" => SkillSource::Registry,
        _ => SkillSource::Auto,
    }
}

pub fn skill_scope_str(v: SkillScope) -> &'static str {
    match v {
        SkillScope::Personal => "personal",
        SkillScope::Project => "project",
    }
}

pub fn skill_scope_from_str(s: &str) -> SkillScope {
    match s {
        "project" => SkillScope::Project,
        _ => SkillScope::Personal,
    }
}
