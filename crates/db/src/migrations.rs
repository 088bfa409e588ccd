// crates/db/src/migrations.rs
//! Inline SQL migrations for the Postgres schema (§3 Data Model).
//!
//! Same shape as a SQLite `_migrations`-tracked array, just Postgres
//! DDL: tables are created in dependency order so foreign keys never
//! forward-reference.

pub const MIGRATIONS: &[&str] = &[
    // 1: projects
    r#"
CREATE TABLE IF NOT EXISTS projects (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    slug            TEXT NOT NULL UNIQUE,
    tier            TEXT NOT NULL DEFAULT 'simple',
    status          TEXT NOT NULL DEFAULT 'active',
    mention_count   INTEGER NOT NULL DEFAULT 0,
    last_activity   TIMESTAMPTZ,
    user_pinned     BOOLEAN NOT NULL DEFAULT FALSE,
    user_priority   TEXT,
    user_deadline   TIMESTAMPTZ
);
"#,
    // 2: people
    r#"
CREATE TABLE IF NOT EXISTS people (
    id              UUID PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT,
    relationship    TEXT,
    organization    TEXT
);
"#,
    // 3: sessions
    r#"
CREATE TABLE IF NOT EXISTS sessions (
    id                  UUID PRIMARY KEY,
    session_id          TEXT NOT NULL UNIQUE,
    transcript_path     TEXT NOT NULL,
    workspace_path      TEXT NOT NULL,
    started_at          TIMESTAMPTZ NOT NULL,
    last_activity_at    TIMESTAMPTZ NOT NULL,
    turn_count          INTEGER NOT NULL DEFAULT 0,
    project_id          UUID REFERENCES projects(id),
    is_processed        BOOLEAN NOT NULL DEFAULT FALSE,
    title               TEXT,
    summary             TEXT
);
CREATE INDEX IF NOT EXISTS idx_sessions_workspace ON sessions(workspace_path);
"#,
    // 4: turns
    r#"
CREATE TABLE IF NOT EXISTS turns (
    id                  UUID PRIMARY KEY,
    session_id          UUID NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
    turn_number         INTEGER NOT NULL,
    user_message        TEXT NOT NULL DEFAULT '',
    assistant_summary   TEXT,
    title               TEXT,
    content_hash        TEXT NOT NULL,
    model_name          TEXT,
    tool_names          JSONB NOT NULL DEFAULT '[]',
    started_at          TIMESTAMPTZ,
    ended_at            TIMESTAMPTZ,
    UNIQUE(session_id, turn_number)
);
CREATE INDEX IF NOT EXISTS idx_turns_session ON turns(session_id);
CREATE INDEX IF NOT EXISTS idx_turns_started_at ON turns(started_at);
"#,
    // 5: turn_content
    r#"
CREATE TABLE IF NOT EXISTS turn_content (
    turn_id             UUID PRIMARY KEY REFERENCES turns(id) ON DELETE CASCADE,
    raw_jsonl           TEXT NOT NULL DEFAULT '',
    assistant_text      TEXT NOT NULL DEFAULT '',
    files_touched       JSONB NOT NULL DEFAULT '[]',
    commands_run        JSONB NOT NULL DEFAULT '[]',
    errors_encountered  JSONB NOT NULL DEFAULT '[]',
    tool_call_count     INTEGER NOT NULL DEFAULT 0,
    content_size        INTEGER NOT NULL DEFAULT 0
);
"#,
    // 6: turn_entities
    r#"
CREATE TABLE IF NOT EXISTS turn_entities (
    id              UUID PRIMARY KEY,
    turn_id         UUID NOT NULL REFERENCES turns(id) ON DELETE CASCADE,
    entity_type     TEXT NOT NULL,
    entity_id       UUID,
    entity_name     TEXT NOT NULL,
    confidence      DOUBLE PRECISION NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_turn_entities_turn ON turn_entities(turn_id);
CREATE INDEX IF NOT EXISTS idx_turn_entities_entity ON turn_entities(entity_type, entity_id);
"#,
    // 7: turn_artifacts
    r#"
CREATE TABLE IF NOT EXISTS turn_artifacts (
    id              UUID PRIMARY KEY,
    turn_id         UUID NOT NULL REFERENCES turns(id) ON DELETE CASCADE,
    artifact_type   TEXT NOT NULL,
    artifact_value  TEXT NOT NULL,
    metadata        JSONB NOT NULL DEFAULT '{}',
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS idx_turn_artifacts_turn ON turn_artifacts(turn_id);
CREATE INDEX IF NOT EXISTS idx_turn_artifacts_type_created ON turn_artifacts(artifact_type, created_at);
"#,
    // 8: tasks
    r#"
CREATE TABLE IF NOT EXISTS tasks (
    id              UUID PRIMARY KEY,
    project_id      UUID REFERENCES projects(id),
    title           TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'backlog',
    priority        TEXT NOT NULL DEFAULT 'normal',
    due_date        TIMESTAMPTZ,
    user_pinned     BOOLEAN NOT NULL DEFAULT FALSE
);
CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
"#,
    // 9: commitments
    r#"
CREATE TABLE IF NOT EXISTS commitments (
    id              UUID PRIMARY KEY,
    person_id       UUID REFERENCES people(id),
    project_id      UUID REFERENCES projects(id),
    direction       TEXT NOT NULL,
    description     TEXT NOT NULL,
    deadline        TIMESTAMPTZ,
    status          TEXT NOT NULL DEFAULT 'open'
);
CREATE INDEX IF NOT EXISTS idx_commitments_project ON commitments(project_id);
CREATE INDEX IF NOT EXISTS idx_commitments_person ON commitments(person_id);
"#,
    // 10: sprints
    r#"
CREATE TABLE IF NOT EXISTS sprints (
    id              UUID PRIMARY KEY,
    project_id      UUID NOT NULL REFERENCES projects(id),
    priority_boost  DOUBLE PRECISION NOT NULL DEFAULT 1.0,
    starts_at       TIMESTAMPTZ NOT NULL,
    ends_at         TIMESTAMPTZ NOT NULL,
    is_active       BOOLEAN NOT NULL DEFAULT TRUE
);
CREATE INDEX IF NOT EXISTS idx_sprints_project ON sprints(project_id);
"#,
    // 11: skills
    r#"
CREATE TABLE IF NOT EXISTS skills (
    id                  UUID PRIMARY KEY,
    name                TEXT NOT NULL,
    description         TEXT NOT NULL DEFAULT '',
    source              TEXT NOT NULL,
    source_session_id   UUID,
    installed_path      TEXT NOT NULL,
    scope               TEXT NOT NULL,
    quality_score       DOUBLE PRECISION,
    content_hash        TEXT NOT NULL,
    is_active           BOOLEAN NOT NULL DEFAULT TRUE,
    triggers            JSONB NOT NULL DEFAULT '[]'
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_skills_name_scope_active
    ON skills(name, scope) WHERE is_active;
"#,
];
