// crates/llm/src/factory.rs
//! Builds the configured `LlmProvider` — the Claude CLI provider when
//! the model service is enabled, the fallback provider otherwise
//! (§9 "Optional model dependency").

use std::sync::Arc;

use mnemo_core::config::LlmConfig;

use crate::claude_cli::ClaudeCliProvider;
use crate::fallback::FallbackProvider;
use crate::provider::LlmProvider;

pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
    if config.enabled {
        Arc::new(ClaudeCliProvider::new(config.model.clone(), config.timeout_secs))
    } else {
        Arc::new(FallbackProvider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_config_yields_the_fallback_provider() {
        let config = LlmConfig { enabled: false, ..Default::default() };
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "fallback");
    }

    #[test]
    fn enabled_config_yields_the_claude_cli_provider() {
        let config = LlmConfig { enabled: true, ..Default::default() };
        let provider = create_provider(&config);
        assert_eq!(provider.name(), "claude-cli");
    }
}
