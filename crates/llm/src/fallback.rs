// crates/llm/src/fallback.rs
//! Degraded-fallback provider used when the model service is disabled
//! or unavailable (§9 "Optional model dependency"). `summarize_turn`
//! always succeeds via truncation — a turn's own text is a perfectly
//! serviceable (if inelegant) summary. `synthesize_skill` has no
//! truncation-based substitute for "a synthesized procedure", so it
//! fails with a retryable error per §4.J.

use async_trait::async_trait;

use crate::provider::LlmProvider;
use crate::types::{LlmError, SummarizeTurnRequest, SummarizeTurnResponse, SynthesizeSkillRequest, SynthesizeSkillResponse};

const TITLE_CHARS: usize = 60;
const SUMMARY_CHARS: usize = 280;

fn truncate(text: &str, max_chars: usize) -> String {
    let truncated: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        format!("{truncated}…")
    } else {
        truncated
    }
}

pub struct FallbackProvider;

#[async_trait]
impl LlmProvider for FallbackProvider {
    async fn summarize_turn(&self, request: SummarizeTurnRequest) -> Result<SummarizeTurnResponse, LlmError> {
        let title = truncate(request.user_message.trim(), TITLE_CHARS);
        let basis = if request.assistant_text.trim().is_empty() { &request.user_message } else { &request.assistant_text };
        let summary = truncate(basis.trim(), SUMMARY_CHARS);
        Ok(SummarizeTurnResponse { title, summary })
    }

    async fn synthesize_skill(&self, _request: SynthesizeSkillRequest) -> Result<SynthesizeSkillResponse, LlmError> {
        Err(LlmError::NotAvailable("model service disabled; skill synthesis deferred".into()))
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn summarize_turn_always_succeeds() {
        let provider = FallbackProvider;
        let response = provider
            .summarize_turn(SummarizeTurnRequest {
                user_message: "fix the login bug".into(),
                assistant_text: "Found the issue in auth.rs and patched it.".into(),
                tool_names: vec!["Edit".into()],
            })
            .await
            .unwrap();
        assert_eq!(response.title, "fix the login bug");
        assert!(response.summary.contains("auth.rs"));
    }

    #[tokio::test]
    async fn summarize_turn_truncates_long_text() {
        let provider = FallbackProvider;
        let long_text = "x".repeat(500);
        let response = provider
            .summarize_turn(SummarizeTurnRequest { user_message: "q".into(), assistant_text: long_text, tool_names: vec![] })
            .await
            .unwrap();
        assert!(response.summary.chars().count() <= SUMMARY_CHARS + 1);
    }

    #[tokio::test]
    async fn synthesize_skill_fails_retryably() {
        let provider = FallbackProvider;
        let err = provider
            .synthesize_skill(SynthesizeSkillRequest {
                session_title: None,
                turn_summaries: vec![],
                top_entities: vec![],
                top_files: vec![],
            })
            .await
            .unwrap_err();
        assert!(err.is_retryable());
    }
}
