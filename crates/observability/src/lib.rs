// crates/observability/src/lib.rs
//! Tracing setup, a Prometheus metrics recorder, and the small
//! `/health` + `/metrics` HTTP surface the Worker exposes (§6
//! "Observability"). The hook binaries use only `tracing_init`.

pub mod metrics;
pub mod routes;
pub mod tracing_init;

pub use tracing_init::init_tracing;
