// crates/llm/src/claude_cli.rs
//! Provider that spawns the `claude` CLI binary and parses its JSON
//! output — the production path for `summarize_turn`/`synthesize_skill`
//! when the model service is enabled.

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::provider::LlmProvider;
use crate::types::{LlmError, SummarizeTurnRequest, SummarizeTurnResponse, SynthesizeSkillRequest, SynthesizeSkillResponse};

pub struct ClaudeCliProvider {
    model: String,
    timeout_secs: u64,
}

impl ClaudeCliProvider {
    pub fn new(model: impl Into<String>, timeout_secs: u64) -> Self {
        Self { model: model.into(), timeout_secs }
    }

    async fn run_prompt(&self, prompt: &str) -> Result<String, LlmError> {
        let mut cmd = Command::new("claude");
        cmd.args(["-p", "--output-format", "json", "--model", &self.model, prompt])
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped());

        let output = timeout(std::time::Duration::from_secs(self.timeout_secs), cmd.output())
            .await
            .map_err(|_| LlmError::Timeout(self.timeout_secs))?
            .map_err(|e| LlmError::SpawnFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(LlmError::ServiceError(stderr));
        }

        String::from_utf8(output.stdout).map_err(|e| LlmError::ParseFailed(e.to_string()))
    }
}

#[async_trait]
impl LlmProvider for ClaudeCliProvider {
    async fn summarize_turn(&self, request: SummarizeTurnRequest) -> Result<SummarizeTurnResponse, LlmError> {
        let prompt = format!(
            "Summarize this coding assistant turn in one short title and one paragraph summary. \
             Respond as JSON {{\"title\": ..., \"summary\": ...}}.\n\nUser: {}\n\nAssistant: {}\n\nTools used: {}",
            request.user_message,
            request.assistant_text,
            request.tool_names.join(", "),
        );
        let raw = self.run_prompt(&prompt).await?;
        serde_json::from_str(&raw).map_err(|e| LlmError::ParseFailed(e.to_string()))
    }

    async fn synthesize_skill(&self, request: SynthesizeSkillRequest) -> Result<SynthesizeSkillResponse, LlmError> {
        let prompt = format!(
            "Synthesize a reusable SKILL document from this session's turn summaries. \
             Respond as JSON {{\"name\": ..., \"description\": ..., \"triggers\": [...], \"procedure\": [...]}}.\n\n\
             Session: {}\n\nTurns:\n{}\n\nEntities: {}\n\nFiles: {}",
            request.session_title.as_deref().unwrap_or("untitled"),
            request.turn_summaries.join("\n"),
            request.top_entities.join(", "),
            request.top_files.join(", "),
        );
        let raw = self.run_prompt(&prompt).await?;
        serde_json::from_str(&raw).map_err(|e| LlmError::ParseFailed(e.to_string()))
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let mut cmd = Command::new("claude");
        cmd.arg("--version").stdin(std::process::Stdio::null()).stdout(std::process::Stdio::piped()).stderr(std::process::Stdio::piped());
        let status = cmd.status().await.map_err(|e| LlmError::NotAvailable(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(LlmError::NotAvailable("claude CLI exited non-zero".into()))
        }
    }

    fn name(&self) -> &str {
        "claude-cli"
    }
}
