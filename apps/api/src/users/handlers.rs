use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::{AdminUser, CurrentUser, ManagerUser};
use crate::auth::handlers::check_len;
use crate::errors::AppError;
use crate::models::skill::UserSkillResponse;
use crate::models::user::{round1, User, UserProfile};
use crate::skills::queries as skill_queries;
use crate::state::AppState;
use crate::users::queries;

#[derive(Debug, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub workload_capacity: Option<i32>,
}

impl ProfileUpdate {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.full_name {
            check_len("full_name", name, 3, 255)?;
        }
        if let Some(capacity) = self.workload_capacity {
            if !(1..=168).contains(&capacity) {
                return Err(AppError::Validation(
                    "workload_capacity must be between 1 and 168 hours".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    #[serde(default)]
    pub include_self: bool,
}

#[derive(Debug, Deserialize)]
pub struct AssignManagerQuery {
    pub manager_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TeamMemberSummary {
    pub id: Uuid,
    pub full_name: String,
    pub position: Option<String>,
    pub workload_percentage: f64,
    pub is_overloaded: bool,
    pub skills_count: i64,
}

impl TeamMemberSummary {
    fn new(user: &User, skills_count: i64) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            position: user.position.clone(),
            workload_percentage: round1(user.workload_percentage()),
            is_overloaded: user.is_overloaded(),
            skills_count,
        }
    }
}

/// GET /api/v1/users/me/profile
pub async fn handle_my_profile(current: CurrentUser) -> Json<UserProfile> {
    Json(UserProfile::from(&current.user))
}

/// PUT /api/v1/users/me/profile
pub async fn handle_update_my_profile(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    req.validate()?;

    let user = queries::update_profile(
        &state.db,
        current.user.id,
        req.full_name.as_deref().map(str::trim),
        req.department.as_deref(),
        req.position.as_deref(),
        req.workload_capacity,
    )
    .await?;

    info!(user_id = %user.id, "Updated profile");
    Ok(Json(UserProfile::from(&user)))
}

/// GET /api/v1/users/me/skills
pub async fn handle_my_skills(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<UserSkillResponse>>, AppError> {
    let rows = skill_queries::list_user_skills(&state.db, current.user.id).await?;
    Ok(Json(rows.into_iter().map(UserSkillResponse::from).collect()))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserProfile>, AppError> {
    let user = queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;

    if !manager.can_view(&user) {
        return Err(AppError::Forbidden(
            "User is not part of your team".to_string(),
        ));
    }

    Ok(Json(UserProfile::from(&user)))
}

/// GET /api/v1/users/team/members
pub async fn handle_team_members(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Query(params): Query<TeamQuery>,
) -> Result<Json<Vec<TeamMemberSummary>>, AppError> {
    let mut members = queries::direct_reports(&state.db, manager.id).await?;
    if params.include_self {
        members.insert(0, manager);
    }

    let mut summaries = Vec::with_capacity(members.len());
    for member in &members {
        let count = queries::skills_count(&state.db, member.id).await?;
        summaries.push(TeamMemberSummary::new(member, count));
    }

    Ok(Json(summaries))
}

/// POST /api/v1/users/:id/assign-manager?manager_id=
pub async fn handle_assign_manager(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
    Query(params): Query<AssignManagerQuery>,
) -> Result<Json<Value>, AppError> {
    if id == params.manager_id {
        return Err(AppError::Validation(
            "A user cannot be their own manager".to_string(),
        ));
    }

    queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?;
    let manager = queries::find_by_id(&state.db, params.manager_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Manager {} not found", params.manager_id)))?;

    if !manager.role.is_manager() {
        return Err(AppError::Validation(
            "The given user is not a manager".to_string(),
        ));
    }

    queries::set_manager(&state.db, id, manager.id).await?;
    info!(user_id = %id, manager_id = %manager.id, assigned_by = %admin.id, "Assigned manager");

    Ok(Json(json!({
        "message": "Manager assigned successfully",
        "user_id": id,
        "manager_id": manager.id
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{test_user, UserRole};

    fn update(capacity: Option<i32>, name: Option<&str>) -> ProfileUpdate {
        ProfileUpdate {
            full_name: name.map(String::from),
            department: None,
            position: None,
            workload_capacity: capacity,
        }
    }

    #[test]
    fn test_capacity_bounds() {
        assert!(update(Some(1), None).validate().is_ok());
        assert!(update(Some(168), None).validate().is_ok());
        assert!(update(Some(0), None).validate().is_err());
        assert!(update(Some(169), None).validate().is_err());
        assert!(update(None, Some("Al")).validate().is_err());
    }

    #[test]
    fn test_team_summary_from_user() {
        let user = test_user(UserRole::Member, 38.0, 40);
        let summary = TeamMemberSummary::new(&user, 4);
        assert_eq!(summary.workload_percentage, 95.0);
        assert!(summary.is_overloaded);
        assert_eq!(summary.skills_count, 4);
    }

    #[test]
    fn test_include_self_defaults_false() {
        let q: TeamQuery = serde_json::from_str("{}").unwrap();
        assert!(!q.include_self);
    }
}
