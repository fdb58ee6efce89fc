use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::task::{TaskPriority, TaskRow, TaskStatus, TaskViewRow, TASK_VIEW_SELECT};

pub async fn find(db: &PgPool, id: Uuid) -> Result<Option<TaskRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Row lock for read-modify-write inside a transaction.
pub async fn find_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<TaskRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM tasks WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_view(db: &PgPool, id: Uuid) -> Result<Option<TaskViewRow>, sqlx::Error> {
    sqlx::query_as(&format!("{TASK_VIEW_SELECT} WHERE t.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn insert(conn: &mut PgConnection, task: &TaskRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO tasks
            (id, title, description, status, priority, assigned_to, created_by,
             estimated_hours, actual_hours, required_skills, due_date, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
        "#,
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.assigned_to)
    .bind(task.created_by)
    .bind(task.estimated_hours)
    .bind(task.actual_hours)
    .bind(&task.required_skills)
    .bind(task.due_date)
    .bind(task.created_at)
    .execute(conn)
    .await?;
    Ok(())
}

/// Writes every mutable column of `task` back.
pub async fn save(conn: &mut PgConnection, task: &TaskRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE tasks SET
            title = $2, description = $3, status = $4, priority = $5, assigned_to = $6,
            estimated_hours = $7, actual_hours = $8, required_skills = $9, due_date = $10,
            started_at = $11, completed_at = $12, ai_match_score = $13,
            ai_recommendation_reason = $14, updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(task.id)
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.assigned_to)
    .bind(task.estimated_hours)
    .bind(task.actual_hours)
    .bind(&task.required_skills)
    .bind(task.due_date)
    .bind(task.started_at)
    .bind(task.completed_at)
    .bind(task.ai_match_score)
    .bind(&task.ai_recommendation_reason)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete(conn: &mut PgConnection, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

pub async fn list_for_assignee(
    db: &PgPool,
    user_id: Uuid,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
) -> Result<Vec<TaskViewRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"{TASK_VIEW_SELECT}
        WHERE t.assigned_to = $1
          AND ($2::task_status IS NULL OR t.status = $2)
          AND ($3::task_priority IS NULL OR t.priority = $3)
        ORDER BY t.created_at DESC"#
    ))
    .bind(user_id)
    .bind(status)
    .bind(priority)
    .fetch_all(db)
    .await
}

/// Tasks assigned to any of `assignees`, newest first.
pub async fn list_for_assignees(
    db: &PgPool,
    assignees: &[Uuid],
    status: Option<TaskStatus>,
) -> Result<Vec<TaskViewRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"{TASK_VIEW_SELECT}
        WHERE t.assigned_to = ANY($1)
          AND ($2::task_status IS NULL OR t.status = $2)
        ORDER BY t.created_at DESC"#
    ))
    .bind(assignees)
    .bind(status)
    .fetch_all(db)
    .await
}

/// Every task, newest first. Admin view.
pub async fn list_all(db: &PgPool, status: Option<TaskStatus>) -> Result<Vec<TaskViewRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        r#"{TASK_VIEW_SELECT}
        WHERE ($1::task_status IS NULL OR t.status = $1)
        ORDER BY t.created_at DESC"#
    ))
    .bind(status)
    .fetch_all(db)
    .await
}

/// Most recently touched tasks of a user.
pub async fn recent_for_user(db: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<TaskRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM tasks WHERE assigned_to = $1 ORDER BY updated_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

/// Pending tasks of a user, highest priority first, then oldest.
pub async fn top_pending_for_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<TaskRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM tasks
        WHERE assigned_to = $1 AND status = 'pending'
        ORDER BY priority DESC, created_at ASC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db)
    .await
}

/// Tasks of a user touched since `since`, and how many of them were completed in that window.
pub async fn activity_since(
    db: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<(i64, i64), sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE updated_at >= $2),
            COUNT(*) FILTER (WHERE status = 'completed' AND completed_at >= $2)
        FROM tasks
        WHERE assigned_to = $1
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_one(db)
    .await
}
