// crates/hooks/src/bin/mnemo-hook.rs
//! `mnemo-hook prompt` and `mnemo-hook stop` — the two binaries the
//! assistant invokes directly (§6). Both read one JSON object from
//! stdin and are silent on failure: any error is logged to stderr and
//! the process still exits 0 with whatever output is safe to produce
//! (empty object for `prompt`, nothing for `stop`).

use std::io::Read;

use clap::{Parser, Subcommand};
use mnemo_core::config::Config;
use mnemo_hooks::{run_prompt_hook, run_stop_hook, PromptHookInput, PromptHookOutput, StopHookInput};

#[derive(Parser)]
#[command(name = "mnemo-hook")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prompt hook: stdin `{session_id, workspace_path, prompt}`, stdout `{context}`.
    Prompt,
    /// Stop hook: stdin `{session_id, transcript_path, workspace_path}`, no stdout.
    Stop,
}

fn read_stdin() -> String {
    let mut buf = String::new();
    let _ = std::io::stdin().read_to_string(&mut buf);
    buf
}

fn init_logging() {
    mnemo_observability_init();
}

/// Hook binaries run under the assistant's process tree — plain-text
/// logs to stderr, never JSON, never stdout (§6 "silent on failure").
fn mnemo_observability_init() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let config_path = mnemo_core::paths::default_config_path().unwrap_or_else(|| "config.toml".into());
    let config = Config::load_or_default(&config_path);

    match cli.command {
        Command::Prompt => {
            let raw = read_stdin();
            let output = match serde_json::from_str::<PromptHookInput>(&raw) {
                Ok(input) => run_prompt_hook(&config, input).await,
                Err(e) => {
                    tracing::warn!(error = %e, "prompt hook received malformed stdin");
                    PromptHookOutput { context: String::new() }
                }
            };
            let printed = serde_json::to_string(&output).unwrap_or_else(|_| "{\"context\":\"\"}".to_string());
            println!("{printed}");
        }
        Command::Stop => {
            let raw = read_stdin();
            match serde_json::from_str::<StopHookInput>(&raw) {
                Ok(input) => run_stop_hook(&config, input).await,
                Err(e) => tracing::warn!(error = %e, "stop hook received malformed stdin"),
            }
        }
    }

    std::process::exit(0);
}
