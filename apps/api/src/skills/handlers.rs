use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::auth::extractor::{CurrentUser, ManagerUser};
use crate::auth::handlers::check_len;
use crate::errors::AppError;
use crate::models::skill::{Skill, SkillLevel, UserSkillResponse};
use crate::models::user::User;
use crate::skills::queries;
use crate::state::AppState;
use crate::users::queries as user_queries;

#[derive(Debug, Deserialize)]
pub struct CreateSkillRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl CreateSkillRequest {
    fn validate(&self) -> Result<(), AppError> {
        check_len("name", &self.name, 2, 100)?;
        if let Some(category) = &self.category {
            check_len("category", category, 0, 100)?;
        }
        if let Some(description) = &self.description {
            check_len("description", description, 0, 255)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct SkillFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TargetUserQuery {
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AddUserSkillRequest {
    pub skill_id: Uuid,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default)]
    pub proficiency_score: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserSkillRequest {
    pub level: Option<SkillLevel>,
    pub proficiency_score: Option<f64>,
}

fn check_proficiency(score: f64) -> Result<(), AppError> {
    if !(0.0..=100.0).contains(&score) {
        return Err(AppError::Validation(
            "proficiency_score must be between 0 and 100".to_string(),
        ));
    }
    Ok(())
}

async fn load_user(state: &AppState, id: Uuid) -> Result<User, AppError> {
    user_queries::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))
}

async fn user_skill_response(state: &AppState, id: Uuid) -> Result<UserSkillResponse, AppError> {
    queries::find_user_skill(&state.db, id)
        .await?
        .map(UserSkillResponse::from)
        .ok_or_else(|| AppError::NotFound(format!("User skill {id} not found")))
}

/// POST /api/v1/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Json(req): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    req.validate()?;
    let name = req.name.trim();

    if queries::skill_name_taken(&state.db, name).await? {
        return Err(AppError::Validation(format!("Skill '{name}' already exists")));
    }

    let skill = queries::insert_skill(
        &state.db,
        name,
        req.category.as_deref().map(str::trim),
        req.description.as_deref(),
    )
    .await
    .map_err(AppError::on_duplicate(&format!("Skill '{name}' already exists")))?;

    info!(skill_id = %skill.id, created_by = %manager.id, "Created skill");
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    _current: CurrentUser,
    Query(filter): Query<SkillFilter>,
) -> Result<Json<Vec<Skill>>, AppError> {
    let skills = queries::list_skills(
        &state.db,
        filter.category.as_deref().filter(|c| !c.is_empty()),
        filter.search.as_deref().filter(|s| !s.is_empty()),
    )
    .await?;
    Ok(Json(skills))
}

/// GET /api/v1/skills/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
    _current: CurrentUser,
) -> Result<Json<Value>, AppError> {
    let categories = queries::categories(&state.db).await?;
    Ok(Json(json!({ "categories": categories })))
}

/// POST /api/v1/skills/user-skills?user_id=
pub async fn handle_add_user_skill(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(target): Query<TargetUserQuery>,
    Json(req): Json<AddUserSkillRequest>,
) -> Result<(StatusCode, Json<UserSkillResponse>), AppError> {
    check_proficiency(req.proficiency_score)?;

    let target_id = match target.user_id {
        Some(id) if id != current.user.id => {
            if !current.user.role.is_manager() {
                return Err(AppError::Forbidden(
                    "Only managers can add skills for other users".to_string(),
                ));
            }
            let target_user = load_user(&state, id).await?;
            if !current.user.manages(&target_user) {
                return Err(AppError::Forbidden(
                    "User is not part of your team".to_string(),
                ));
            }
            target_user.id
        }
        _ => current.user.id,
    };

    if queries::find_skill(&state.db, req.skill_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Skill {} not found", req.skill_id)));
    }
    if queries::user_has_skill(&state.db, target_id, req.skill_id).await? {
        return Err(AppError::Validation("User already has this skill".to_string()));
    }

    let id = queries::insert_user_skill(
        &state.db,
        target_id,
        req.skill_id,
        req.level,
        req.proficiency_score,
    )
    .await
    .map_err(AppError::on_duplicate("User already has this skill"))?;

    info!(user_id = %target_id, skill_id = %req.skill_id, "Added user skill");
    Ok((StatusCode::CREATED, Json(user_skill_response(&state, id).await?)))
}

/// GET /api/v1/skills/user-skills/me
pub async fn handle_my_user_skills(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<UserSkillResponse>>, AppError> {
    let rows = queries::list_user_skills(&state.db, current.user.id).await?;
    Ok(Json(rows.into_iter().map(UserSkillResponse::from).collect()))
}

/// GET /api/v1/skills/user-skills/:user_id
pub async fn handle_user_skills(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<UserSkillResponse>>, AppError> {
    if user_id != current.user.id {
        let target = load_user(&state, user_id).await?;
        if !current.user.can_view(&target) {
            return Err(AppError::Forbidden(
                "You cannot view this user's skills".to_string(),
            ));
        }
    }
    let rows = queries::list_user_skills(&state.db, user_id).await?;
    Ok(Json(rows.into_iter().map(UserSkillResponse::from).collect()))
}

/// PUT /api/v1/skills/user-skills/:user_skill_id
pub async fn handle_update_user_skill(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_skill_id): Path<Uuid>,
    Json(req): Json<UpdateUserSkillRequest>,
) -> Result<Json<UserSkillResponse>, AppError> {
    if let Some(score) = req.proficiency_score {
        check_proficiency(score)?;
    }

    let existing = user_skill_response(&state, user_skill_id).await?;
    let owner = load_user(&state, existing.user_id).await?;
    if !current.user.manages(&owner) {
        return Err(AppError::Forbidden(
            "Only the user's manager can edit skills".to_string(),
        ));
    }

    queries::update_user_skill(&state.db, user_skill_id, req.level, req.proficiency_score).await?;
    info!(user_skill_id = %user_skill_id, updated_by = %current.user.id, "Updated user skill");

    Ok(Json(user_skill_response(&state, user_skill_id).await?))
}

/// DELETE /api/v1/skills/user-skills/:user_skill_id
pub async fn handle_delete_user_skill(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(user_skill_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let existing = user_skill_response(&state, user_skill_id).await?;
    if existing.user_id != current.user.id {
        let owner = load_user(&state, existing.user_id).await?;
        if !current.user.manages(&owner) {
            return Err(AppError::Forbidden(
                "You cannot remove this skill".to_string(),
            ));
        }
    }

    queries::delete_user_skill(&state.db, user_skill_id).await?;
    info!(user_skill_id = %user_skill_id, removed_by = %current.user.id, "Removed user skill");

    Ok(Json(json!({
        "message": "Skill removed successfully",
        "user_skill_id": user_skill_id
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_skill_validation() {
        let req = |name: &str, category: Option<&str>| CreateSkillRequest {
            name: name.to_string(),
            category: category.map(String::from),
            description: None,
        };
        assert!(req("Go", None).validate().is_ok());
        assert!(req("G", None).validate().is_err());
        assert!(req("Rust", Some(&"c".repeat(101))).validate().is_err());
    }

    #[test]
    fn test_proficiency_bounds() {
        assert!(check_proficiency(0.0).is_ok());
        assert!(check_proficiency(100.0).is_ok());
        assert!(check_proficiency(100.5).is_err());
        assert!(check_proficiency(-1.0).is_err());
    }

    #[test]
    fn test_add_request_defaults() {
        let req: AddUserSkillRequest =
            serde_json::from_str(r#"{"skill_id": "00000000-0000-0000-0000-000000000001"}"#).unwrap();
        assert_eq!(req.level, SkillLevel::Beginner);
        assert_eq!(req.proficiency_score, 0.0);
    }
}
