// crates/queue/src/migrations.rs
//! Self-migrating schema for the `jobs` table, tracked via
//! `_queue_migrations` the same way `mnemo-db` tracks its own
//! migrations — kept in a separate table so the queue can be pointed
//! at a database that doesn't otherwise use `mnemo-db`.

pub const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id              UUID PRIMARY KEY,
        kind            TEXT NOT NULL,
        payload         JSONB NOT NULL,
        status          TEXT NOT NULL DEFAULT 'queued',
        priority        INTEGER NOT NULL,
        dedupe_key      TEXT,
        attempts        INTEGER NOT NULL DEFAULT 0,
        max_attempts    INTEGER NOT NULL DEFAULT 10,
        locked_until    TIMESTAMPTZ,
        locked_by       TEXT,
        error_message   TEXT,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    );
    CREATE INDEX IF NOT EXISTS idx_jobs_claim ON jobs (status, priority, created_at);
    CREATE UNIQUE INDEX IF NOT EXISTS idx_jobs_dedupe_key ON jobs (dedupe_key) WHERE dedupe_key IS NOT NULL;
    "#,
];
