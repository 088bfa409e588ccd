// crates/types/src/context.rs
use serde::{Deserialize, Serialize};

use crate::Id;

/// Coarse intent assigned by the Classifier (§4.F).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Question,
    Command,
    Continuation,
    Unknown,
}

/// A lexically matched project or person mention, with a confidence
/// bounded at 1.0 (§4.F steps 2-3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub name: String,
    pub id: Option<Id>,
    pub confidence: f64,
}

/// Output of lexical classification of a prompt (§4.F, GLOSSARY "Signal").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub projects: Vec<EntityMatch>,
    pub people: Vec<EntityMatch>,
    pub paths: Vec<String>,
    pub keywords: Vec<String>,
    pub has_code_fence: bool,
    pub intent: Option<Intent>,
}

impl Signal {
    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|m| m.name.as_str())
    }

    pub fn person_names(&self) -> impl Iterator<Item = &str> {
        self.people.iter().map(|m| m.name.as_str())
    }
}

/// Discriminant for `ContextItem`. Ranking and rendering dispatch on
/// this tag rather than an inheritance hierarchy (§9 Design Notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    Conversation,
    Task,
    Commitment,
    Skill,
    Error,
    Focus,
}

impl ContextKind {
    /// Literal tag used by the Formatter (§4.H step 2).
    pub fn tag(self) -> &'static str {
        match self {
            ContextKind::Conversation => "Conv",
            ContextKind::Task => "Task",
            ContextKind::Commitment => "Commitment",
            ContextKind::Skill => "Skill",
            ContextKind::Error => "Error",
            ContextKind::Focus => "Focus",
        }
    }

    /// Fixed header order for grouping accepted items (§4.H step 4).
    pub const RENDER_ORDER: [ContextKind; 6] = [
        ContextKind::Focus,
        ContextKind::Conversation,
        ContextKind::Task,
        ContextKind::Commitment,
        ContextKind::Skill,
        ContextKind::Error,
    ];
}

/// A scored candidate piece of context (§4.G, GLOSSARY "ContextItem").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub kind: ContextKind,
    pub ref_id: Id,
    pub title: String,
    pub body: Option<String>,
    pub qualifier: Option<String>,
    /// Age in hours, used to render `(<age>)` and to compute recency.
    pub age_hours: Option<f64>,
    /// Score in `[0, 1]` before any sprint boost.
    pub score: f64,
    pub metadata: serde_json::Value,
}

impl ContextItem {
    /// `recency = exp(-age_hours / 48)` (§4.G Conversations scoring).
    pub fn recency(age_hours: f64) -> f64 {
        (-age_hours / 48.0).exp()
    }

    /// Apply a sprint's `priority_boost` multiplicatively (§8 property 7).
    pub fn apply_boost(&mut self, boost: f64) {
        self.score *= boost;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_decays_with_age() {
        let fresh = ContextItem::recency(0.0);
        let stale = ContextItem::recency(48.0);
        assert!((fresh - 1.0).abs() < 1e-9);
        assert!(stale < fresh);
        assert!((stale - std::f64::consts::E.recip()).abs() < 1e-9);
    }

    #[test]
    fn boost_is_multiplicative() {
        let mut item = ContextItem {
            kind: ContextKind::Task,
            ref_id: Id::nil(),
            title: "t".into(),
            body: None,
            qualifier: None,
            age_hours: None,
            score: 0.4,
            metadata: serde_json::Value::Null,
        };
        item.apply_boost(1.5);
        assert!((item.score - 0.6).abs() < 1e-9);
    }
}
