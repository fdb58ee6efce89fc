use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::{CurrentUser, ManagerUser};
use crate::auth::handlers::check_len;
use crate::errors::AppError;
use crate::models::task::{TaskPriority, TaskResponse, TaskRow, TaskStatus};
use crate::models::user::{User, UserRole};
use crate::state::AppState;
use crate::tasks::{queries, workload};
use crate::users::queries as user_queries;

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_to: Option<Uuid>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub assigned_to: Option<Uuid>,
    pub required_skills: Option<Vec<String>>,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct MyTasksFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Deserialize)]
pub struct TeamTasksFilter {
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Uuid>,
}

fn check_estimate(hours: Option<f64>) -> Result<(), AppError> {
    match hours {
        Some(h) if !(0.5..=200.0).contains(&h) => Err(AppError::Validation(
            "estimated_hours must be between 0.5 and 200".to_string(),
        )),
        _ => Ok(()),
    }
}

impl CreateTaskRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_len("title", &self.title, 3, 255)?;
        check_estimate(self.estimated_hours)
    }
}

impl UpdateTaskRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            check_len("title", title, 3, 255)?;
        }
        check_estimate(self.estimated_hours)?;
        if matches!(self.actual_hours, Some(h) if h < 0.0) {
            return Err(AppError::Validation(
                "actual_hours cannot be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Applies `req` to `task`. Without `full_access` only status and actual hours change.
/// Stamps `started_at` / `completed_at` the first time those states are reached.
fn apply_update(task: &mut TaskRow, req: &UpdateTaskRequest, full_access: bool, now: DateTime<Utc>) {
    if let Some(status) = req.status {
        task.status = status;
    }
    if let Some(actual) = req.actual_hours {
        task.actual_hours = actual;
    }

    if full_access {
        if let Some(title) = &req.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = &req.description {
            task.description = Some(description.clone());
        }
        if let Some(priority) = req.priority {
            task.priority = priority;
        }
        if let Some(estimate) = req.estimated_hours {
            task.estimated_hours = Some(estimate);
        }
        if let Some(assignee) = req.assigned_to {
            task.assigned_to = Some(assignee);
        }
        if let Some(skills) = &req.required_skills {
            task.required_skills = skills.clone();
        }
        if let Some(due) = req.due_date {
            task.due_date = Some(due);
        }
    }

    if task.status == TaskStatus::InProgress && task.started_at.is_none() {
        task.started_at = Some(now);
    }
    if task.status == TaskStatus::Completed && task.completed_at.is_none() {
        task.completed_at = Some(now);
    }
}

/// Resolves an assignee the manager is allowed to give work to.
async fn assignable_user(state: &AppState, manager: &User, user_id: Uuid) -> Result<User, AppError> {
    let user = user_queries::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    if !manager.manages(&user) {
        return Err(AppError::Forbidden(
            "You can only assign tasks to members of your team".to_string(),
        ));
    }
    Ok(user)
}

async fn task_response(state: &AppState, id: Uuid) -> Result<TaskResponse, AppError> {
    queries::find_view(&state.db, id)
        .await?
        .map(TaskResponse::from)
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))
}

/// POST /api/v1/tasks
pub async fn handle_create_task(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), AppError> {
    req.validate()?;

    if let Some(assignee) = req.assigned_to {
        assignable_user(&state, &manager, assignee).await?;
    }

    let now = Utc::now();
    let task = TaskRow {
        id: Uuid::new_v4(),
        title: req.title.trim().to_string(),
        description: req.description,
        status: TaskStatus::Pending,
        priority: req.priority,
        assigned_to: req.assigned_to,
        created_by: manager.id,
        estimated_hours: req.estimated_hours,
        actual_hours: 0.0,
        required_skills: req.required_skills,
        due_date: req.due_date,
        started_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
        ai_match_score: None,
        ai_recommendation_reason: None,
    };

    let mut tx = state.db.begin().await?;
    queries::insert(&mut tx, &task).await?;
    workload::apply_transition(&mut tx, None, task.held_hours()).await?;
    tx.commit().await?;

    info!(task_id = %task.id, created_by = %manager.id, assigned_to = ?task.assigned_to, "Created task");
    Ok((StatusCode::CREATED, Json(task_response(&state, task.id).await?)))
}

/// GET /api/v1/tasks/my-tasks
pub async fn handle_my_tasks(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(filter): Query<MyTasksFilter>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let rows =
        queries::list_for_assignee(&state.db, current.user.id, filter.status, filter.priority)
            .await?;
    Ok(Json(rows.into_iter().map(TaskResponse::from).collect()))
}

/// GET /api/v1/tasks/team-tasks
pub async fn handle_team_tasks(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Query(filter): Query<TeamTasksFilter>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let rows = if manager.role == UserRole::Admin {
        match filter.assigned_to {
            Some(user_id) => queries::list_for_assignees(&state.db, &[user_id], filter.status).await?,
            None => queries::list_all(&state.db, filter.status).await?,
        }
    } else {
        let team: Vec<Uuid> = user_queries::direct_reports(&state.db, manager.id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();
        let assignees = match filter.assigned_to {
            Some(user_id) if !team.contains(&user_id) => {
                return Err(AppError::Forbidden(
                    "User is not part of your team".to_string(),
                ))
            }
            Some(user_id) => vec![user_id],
            None => team,
        };
        queries::list_for_assignees(&state.db, &assignees, filter.status).await?
    };
    Ok(Json(rows.into_iter().map(TaskResponse::from).collect()))
}

/// GET /api/v1/tasks/:id
pub async fn handle_get_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TaskResponse>, AppError> {
    let response = task_response(&state, id).await?;
    let user = &current.user;
    let allowed = response.task.assigned_to == Some(user.id)
        || response.task.created_by == user.id
        || user.role.is_manager();
    if !allowed {
        return Err(AppError::Forbidden("Access to this task denied".to_string()));
    }
    Ok(Json(response))
}

/// PUT /api/v1/tasks/:id
pub async fn handle_update_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    req.validate()?;
    let user = &current.user;
    let full_access = user.role.is_manager();

    if full_access {
        if let Some(assignee) = req.assigned_to {
            assignable_user(&state, user, assignee).await?;
        }
    }

    let mut tx = state.db.begin().await?;
    let mut task = queries::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))?;

    if !full_access && task.assigned_to != Some(user.id) {
        return Err(AppError::Forbidden(
            "You cannot update this task".to_string(),
        ));
    }

    let before = task.held_hours();
    apply_update(&mut task, &req, full_access, Utc::now());
    queries::save(&mut tx, &task).await?;
    workload::apply_transition(&mut tx, before, task.held_hours()).await?;
    tx.commit().await?;

    info!(task_id = %id, updated_by = %user.id, status = task.status.as_str(), "Updated task");
    Ok(Json(task_response(&state, id).await?))
}

/// DELETE /api/v1/tasks/:id
pub async fn handle_delete_task(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let mut tx = state.db.begin().await?;
    let task = queries::find_for_update(&mut tx, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {id} not found")))?;

    workload::apply_transition(&mut tx, task.held_hours(), None).await?;
    queries::delete(&mut tx, id).await?;
    tx.commit().await?;

    info!(task_id = %id, deleted_by = %manager.id, "Deleted task");
    Ok(Json(json!({ "message": "Task deleted successfully", "task_id": id })))
}
