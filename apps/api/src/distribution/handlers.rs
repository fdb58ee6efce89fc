use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::advisor::{
    self,
    briefs::TaskBrief,
    outputs::{Advised, TaskRecommendation},
};
use crate::auth::extractor::ManagerUser;
use crate::distribution::assignee;
use crate::distribution::rebalance::{self, RebalanceReport, TASKS_PER_OVERLOADED_MEMBER};
use crate::errors::AppError;
use crate::models::task::{TaskRow, TaskStatus};
use crate::models::user::User;
use crate::state::AppState;
use crate::tasks::{queries as task_queries, workload};

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub task_id: Uuid,
    #[serde(default)]
    pub auto_assign: bool,
}

#[derive(Debug, Deserialize)]
pub struct RebalanceQuery {
    #[serde(default)]
    pub apply: bool,
}

#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub email: String,
    pub position: Option<String>,
    pub department: Option<String>,
}

impl From<&User> for UserDetails {
    fn from(u: &User) -> Self {
        Self {
            email: u.email.clone(),
            position: u.position.clone(),
            department: u.department.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub task_id: Uuid,
    #[serde(flatten)]
    pub recommendation: Advised<TaskRecommendation>,
    pub user_details: Option<UserDetails>,
    pub assigned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Hands `task` to the recommended user and resets it to pending. Scores are
/// only recorded for an AI recommendation.
fn assign_recommended(task: &mut TaskRow, advised: &Advised<TaskRecommendation>) {
    task.assigned_to = Some(advised.value.recommended_user_id);
    task.status = TaskStatus::Pending;
    if advised.is_ai() {
        task.ai_match_score = Some(advised.value.match_score);
        task.ai_recommendation_reason = Some(advised.value.reasoning.clone());
    } else {
        task.ai_match_score = None;
        task.ai_recommendation_reason = None;
    }
}

/// POST /api/v1/ai/tasks/recommend
pub async fn handle_recommend(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    let task = task_queries::find(&state.db, req.task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", req.task_id)))?;

    let pool = assignee::load_pool(&state.db, &manager).await?;
    let advised = advisor::recommend(
        state.advisor.as_ref(),
        &TaskBrief::from(&task),
        &pool.candidates,
        &pool.context,
    )
    .await
    .ok_or_else(|| {
        AppError::UnprocessableEntity("No team member has available hours".to_string())
    })?;

    let user_details = pool
        .member(advised.value.recommended_user_id)
        .map(UserDetails::from);

    let mut assigned = false;
    if req.auto_assign {
        let mut tx = state.db.begin().await?;
        let mut locked = task_queries::find_for_update(&mut tx, task.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", task.id)))?;
        let before = locked.held_hours();
        assign_recommended(&mut locked, &advised);
        task_queries::save(&mut tx, &locked).await?;
        workload::apply_transition(&mut tx, before, locked.held_hours()).await?;
        tx.commit().await?;

        info!(
            task_id = %task.id,
            assigned_to = %advised.value.recommended_user_id,
            source = ?advised.source,
            "Auto-assigned task"
        );
        assigned = true;
    }

    Ok(Json(RecommendResponse {
        task_id: task.id,
        recommendation: advised,
        user_details,
        assigned,
        message: assigned.then_some("Task assigned successfully"),
    }))
}

/// POST /api/v1/ai/tasks/rebalance-team
pub async fn handle_rebalance_team(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Query(query): Query<RebalanceQuery>,
) -> Result<Json<RebalanceReport>, AppError> {
    let pool = assignee::load_pool(&state.db, &manager).await?;
    if pool.members.is_empty() {
        return Err(AppError::NotFound("Team not found".to_string()));
    }

    let mut overloaded = Vec::new();
    for member in pool.members.iter().filter(|m| m.is_overloaded()) {
        let tasks =
            task_queries::top_pending_for_user(&state.db, member.id, TASKS_PER_OVERLOADED_MEMBER)
                .await?;
        overloaded.push((member.clone(), tasks));
    }

    let mut moves = rebalance::plan_moves(state.advisor.as_ref(), &overloaded, &pool).await;

    if query.apply && !moves.is_empty() {
        let mut tx = state.db.begin().await?;
        rebalance::apply_moves(&mut tx, &mut moves).await?;
        tx.commit().await?;
    }

    info!(
        manager_id = %manager.id,
        overloaded = overloaded.len(),
        moves = moves.len(),
        apply = query.apply,
        "Rebalanced team workload"
    );
    Ok(Json(RebalanceReport::new(&pool.members, moves, query.apply)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::test_task;

    fn recommendation(user: Uuid) -> TaskRecommendation {
        TaskRecommendation {
            recommended_user_id: user,
            recommended_user_name: "Ana".to_string(),
            match_score: 91.0,
            reasoning: "Knows the codebase".to_string(),
            pros: vec![],
            cons: vec![],
            alternative_user_id: None,
            alternative_user_name: None,
            warnings: vec![],
        }
    }

    #[test]
    fn test_ai_assignment_records_score() {
        let mut task = test_task(TaskStatus::Blocked, Some(5.0), 1.0);
        let ana = Uuid::new_v4();

        assign_recommended(&mut task, &Advised::ai(recommendation(ana)));

        assert_eq!(task.assigned_to, Some(ana));
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.ai_match_score, Some(91.0));
        assert_eq!(task.ai_recommendation_reason.as_deref(), Some("Knows the codebase"));
    }

    #[test]
    fn test_fallback_assignment_clears_score() {
        let mut task = test_task(TaskStatus::Pending, Some(5.0), 0.0);
        task.ai_match_score = Some(70.0);
        let ana = Uuid::new_v4();

        assign_recommended(&mut task, &Advised::fallback(recommendation(ana)));

        assert_eq!(task.assigned_to, Some(ana));
        assert!(task.ai_match_score.is_none());
        assert!(task.ai_recommendation_reason.is_none());
    }

    #[test]
    fn test_request_defaults() {
        let req: RecommendRequest =
            serde_json::from_str(&format!(r#"{{"task_id": "{}"}}"#, Uuid::nil())).unwrap();
        assert!(!req.auto_assign);
    }
}
