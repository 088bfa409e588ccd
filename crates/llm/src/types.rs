// crates/llm/src/types.rs
//! Request/response/error types for the large-model capability
//! interface (§4.J, §9).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input to `summarize_turn`: a turn's text plus light context the
/// model can use without another round-trip to the Store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeTurnRequest {
    pub user_message: String,
    pub assistant_text: String,
    pub tool_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeTurnResponse {
    pub title: String,
    pub summary: String,
}

/// Input to `synthesize_skill`: the ordered turn summaries of a
/// completed, quality-gated session (§4.J "Generation").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeSkillRequest {
    pub session_title: Option<String>,
    pub turn_summaries: Vec<String>,
    pub top_entities: Vec<String>,
    pub top_files: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeSkillResponse {
    pub name: String,
    pub description: String,
    pub triggers: Vec<String>,
    pub procedure: Vec<String>,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("failed to spawn model process: {0}")]
    SpawnFailed(String),

    #[error("model service returned an error: {0}")]
    ServiceError(String),

    #[error("failed to parse model response: {0}")]
    ParseFailed(String),

    #[error("model service not available: {0}")]
    NotAvailable(String),

    #[error("model service timed out after {0}s")]
    Timeout(u64),
}

impl LlmError {
    /// Whether this failure is worth retrying later (§4.J "deferred by
    /// failing the job with a retryable error") versus a permanent
    /// rejection that should surface straight to the caller.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::ParseFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_available_and_timeout_are_retryable() {
        assert!(LlmError::NotAvailable("no api key".into()).is_retryable());
        assert!(LlmError::Timeout(10).is_retryable());
    }

    #[test]
    fn parse_failure_is_not_retryable() {
        assert!(!LlmError::ParseFailed("bad json".into()).is_retryable());
    }
}
