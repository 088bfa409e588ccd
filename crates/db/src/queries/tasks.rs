// crates/db/src/queries/tasks.rs
use chrono::{DateTime, Utc};
use mnemo_types::{Id, Task};
use sqlx::PgPool;
use sqlx::Row;

use crate::DbResult;

use super::enums::{priority_from_str, priority_str, task_status_from_str, task_status_str};

fn row_to_task(row: &sqlx::postgres::PgRow) -> Task {
    Task {
        id: row.get("id"),
        project_id: row.get("project_id"),
        title: row.get("title"),
        status: task_status_from_str(row.get::<String, _>("status").as_str()),
        priority: priority_from_str(row.get::<String, _>("priority").as_str()),
        due_date: row.get("due_date"),
        user_pinned: row.get("user_pinned"),
    }
}

pub async fn get_task(pool: &PgPool, id: Id) -> DbResult<Option<Task>> {
    let row = sqlx::query("SELECT * FROM tasks WHERE id = $1").bind(id).fetch_optional(pool).await?;
    Ok(row.as_ref().map(row_to_task))
}

pub async fn upsert_task(pool: &PgPool, task: &Task) -> DbResult<Task> {
    let row = sqlx::query(
        r#"
        INSERT INTO tasks (id, project_id, title, status, priority, due_date, user_pinned)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET
            project_id = EXCLUDED.project_id,
            title = EXCLUDED.title,
            status = EXCLUDED.status,
            priority = EXCLUDED.priority,
            due_date = EXCLUDED.due_date,
            user_pinned = EXCLUDED.user_pinned
        RETURNING *
        "#,
    )
    .bind(task.id)
    .bind(task.project_id)
    .bind(&task.title)
    .bind(task_status_str(task.status))
    .bind(priority_str(task.priority))
    .bind(task.due_date)
    .bind(task.user_pinned)
    .fetch_one(pool)
    .await?;

    Ok(row_to_task(&row))
}

/// Open tasks joined to the given projects (§4.G Tasks branch). The
/// data model gives Task no assignee field, so "assigned to matched
/// people" (§4.G) is realized purely through `project_id` — see
/// DESIGN.md's Open Question note.
pub async fn open_tasks_for_projects(pool: &PgPool, project_ids: &[Id]) -> DbResult<Vec<Task>> {
    if project_ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query(
        r#"
        SELECT * FROM tasks
        WHERE project_id = ANY($1)
          AND status IN ('backlog', 'in_progress', 'waiting')
        "#,
    )
    .bind(project_ids)
    .fetch_all(pool)
    .await?;
    Ok(rows.iter().map(row_to_task).collect())
}

pub fn days_to_due(due: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (due - now).num_seconds() as f64 / 86_400.0
}
