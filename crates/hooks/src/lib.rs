// crates/hooks/src/lib.rs
//! Hook invocation surface (§6): the two entry points the assistant
//! calls directly. Both are silent on failure — every fallible step is
//! caught and logged, never propagated to the caller, so a hook never
//! blocks the assistant (§7 "User-visible behavior").

use std::time::Duration;

use chrono::Utc;
use mnemo_core::classifier::Classifier;
use mnemo_core::config::Config;
use mnemo_db::Store;
use mnemo_queue::{BackoffConfig, Queue};
use mnemo_types::JobKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PromptHookInput {
    pub session_id: String,
    pub workspace_path: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptHookOutput {
    pub context: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopHookInput {
    pub session_id: String,
    pub transcript_path: String,
    pub workspace_path: String,
}

/// Prompt hook (§6): classify, retrieve, format, all within
/// `config.hot_path.hook_budget_ms`. Any failure — DB unreachable,
/// pattern compile error, a slow branch past its own budget — yields
/// an empty context rather than an error.
pub async fn run_prompt_hook(config: &Config, input: PromptHookInput) -> PromptHookOutput {
    let budget = Duration::from_millis(config.hot_path.hook_budget_ms);
    match tokio::time::timeout(budget, classify_and_retrieve(config, input)).await {
        Ok(context) => PromptHookOutput { context },
        Err(_) => {
            tracing::warn!("prompt hook exceeded its wall-clock budget, returning empty context");
            PromptHookOutput { context: String::new() }
        }
    }
}

async fn classify_and_retrieve(config: &Config, input: PromptHookInput) -> String {
    let store = match Store::connect(&config.general.db_url).await {
        Ok(store) => store,
        Err(e) => {
            tracing::warn!(error = %e, "prompt hook could not reach the store");
            return String::new();
        }
    };
    let pool = store.pool();

    let projects = mnemo_db::queries::projects::list_projects(pool).await.unwrap_or_default();
    let people = mnemo_db::queries::people::list_people(pool).await.unwrap_or_default();

    let classifier = match Classifier::new() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "classifier failed to initialize");
            return String::new();
        }
    };
    let signal = classifier.classify(&input.prompt, &projects, &people);

    let now = Utc::now();
    let items = mnemo_retrieval::retrieve(pool, &signal, &input.workspace_path, now, config.hot_path.retrieve_budget()).await;

    mnemo_core::formatter::format_context(&items, config.context.max_context_tokens)
}

/// Stop hook (§6): enqueue a `session_process` job and return
/// immediately. Ingestion itself happens later on the Worker, so the
/// hook's own latency is just one INSERT.
pub async fn run_stop_hook(config: &Config, input: StopHookInput) {
    if let Err(e) = enqueue_session_process(config, input).await {
        tracing::warn!(error = %e, "stop hook failed to enqueue session_process job");
    }
}

async fn enqueue_session_process(config: &Config, input: StopHookInput) -> anyhow::Result<()> {
    let store = Store::connect(&config.general.db_url).await?;
    let backoff = BackoffConfig {
        base_seconds: config.worker.backoff_base_seconds,
        ceiling_seconds: config.worker.backoff_ceiling_seconds,
    };
    let queue = Queue::from_pool(store.pool().clone(), backoff).await?;

    let dedupe_key = format!("session_process:{}", input.session_id);
    queue
        .enqueue(
            JobKind::SessionProcess,
            serde_json::json!({
                "session_id": input.session_id,
                "transcript_path": input.transcript_path,
                "workspace_path": input.workspace_path,
            }),
            JobKind::SessionProcess.default_priority(),
            Some(&dedupe_key),
            5,
        )
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_hook_input_parses_from_json() {
        let raw = r#"{"session_id":"s1","workspace_path":"/ws","prompt":"continue simon"}"#;
        let input: PromptHookInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.session_id, "s1");
        assert_eq!(input.prompt, "continue simon");
    }

    #[test]
    fn stop_hook_input_parses_from_json() {
        let raw = r#"{"session_id":"s1","transcript_path":"/t.jsonl","workspace_path":"/ws"}"#;
        let input: StopHookInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.transcript_path, "/t.jsonl");
    }

    #[test]
    fn prompt_hook_output_serializes_to_the_documented_shape() {
        let output = PromptHookOutput { context: "## Focus Context".to_string() };
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["context"], "## Focus Context");
    }
}
