// crates/observability/src/tracing_init.rs
//! Process-wide tracing setup. The Worker and the hook binaries each
//! call this once at startup; the hook binaries set `json = false`
//! since their stderr is a developer's terminal, while the Worker
//! runs as a long-lived process under a supervisor and wants
//! structured JSON lines.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber. `default_directive` is used
/// when `RUST_LOG` is unset.
pub fn init_tracing(default_directive: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
