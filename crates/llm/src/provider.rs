// crates/llm/src/provider.rs
//! The single capability interface through which every call site
//! reaches the large-model service (§9 "Optional model dependency").
//! Correctness never depends on this trait succeeding — every caller
//! defines a fallback for its failure modes.

use async_trait::async_trait;

use crate::types::{LlmError, SummarizeTurnRequest, SummarizeTurnResponse, SynthesizeSkillRequest, SynthesizeSkillResponse};

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn summarize_turn(&self, request: SummarizeTurnRequest) -> Result<SummarizeTurnResponse, LlmError>;

    async fn synthesize_skill(&self, request: SynthesizeSkillRequest) -> Result<SynthesizeSkillResponse, LlmError>;

    async fn health_check(&self) -> Result<(), LlmError>;

    fn name(&self) -> &str;
}
