// crates/llm/src/lib.rs
//! Capability interface to the optional large-model service (§4.J,
//! §9 "Optional model dependency"). Nothing outside this crate should
//! depend on which provider is active — callers hold a `dyn LlmProvider`
//! and handle its failure modes per call site.

pub mod claude_cli;
pub mod factory;
pub mod fallback;
pub mod provider;
pub mod types;

pub use claude_cli::ClaudeCliProvider;
pub use factory::create_provider;
pub use fallback::FallbackProvider;
pub use provider::LlmProvider;
pub use types::*;
