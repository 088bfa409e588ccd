// crates/worker/src/bin/mnemo-worker.rs
//! Worker process binary: the cold path's execution domain (§4.I, §9
//! "Scheduling model"). Spawns `worker.parallelism` claim loops against
//! a shared queue, and serves `/health` + `/metrics` for the duration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mnemo_core::config::Config;
use mnemo_db::Store;
use mnemo_queue::{BackoffConfig, Queue};
use mnemo_worker::{Worker, WorkerSettings};
use tokio::sync::watch;

fn get_metrics_port() -> u16 {
    std::env::var("MNEMO_WORKER_METRICS_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(47893)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = mnemo_core::paths::default_config_path().unwrap_or_else(|| "config.toml".into());
    let config = Config::load_or_default(&config_path);

    mnemo_observability::init_tracing(
        std::env::var("RUST_LOG").as_deref().unwrap_or("info"),
        true,
    );
    mnemo_observability::metrics::init_metrics();

    let store = Store::connect(&config.general.db_url).await?;
    let backoff = BackoffConfig {
        base_seconds: config.worker.backoff_base_seconds,
        ceiling_seconds: config.worker.backoff_ceiling_seconds,
    };
    let queue = Queue::from_pool(store.pool().clone(), backoff).await?;
    let llm: Arc<dyn mnemo_llm::LlmProvider> = mnemo_llm::create_provider(&config.llm);

    let settings = WorkerSettings {
        lease: Duration::from_secs(config.worker.lease_seconds),
        empty_claim_backoff_ceiling: Duration::from_secs(5),
        min_quality_score: config.skills.min_quality_score,
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let parallelism = config.worker.parallelism.max(1);
    let mut handles = Vec::with_capacity(parallelism as usize);
    for i in 0..parallelism {
        let worker = Worker::new(store.clone(), queue.clone(), llm.clone(), settings, config.skills.confirmation_keywords.clone());
        let rx = shutdown_rx.clone();
        handles.push(tokio::spawn(async move {
            tracing::info!(claimer = i, "claim loop starting");
            worker.run(rx).await;
        }));
    }

    let started_at = Instant::now();
    let port = get_metrics_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "health/metrics server listening");

    let server = axum::serve(listener, mnemo_observability::routes::router(started_at)).with_graceful_shutdown(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("shutdown signal received, draining claim loops");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    for handle in handles {
        let _ = handle.await;
    }

    Ok(())
}
