use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::advisor::{
    self,
    briefs::{CheckinBrief, TaskSummary},
    outputs::{Advised, WellbeingInsight},
    prompts::MAX_TASKS_IN_PROMPT,
};
use crate::auth::extractor::{CurrentUser, ManagerUser};
use crate::errors::AppError;
use crate::models::user::User;
use crate::models::wellbeing::{EnergyLevel, MoodLevel, WellbeingCheckResponse, WellbeingCheckRow};
use crate::state::AppState;
use crate::tasks::queries as task_queries;
use crate::users::queries as user_queries;
use crate::wellbeing::metrics::{self, BurnoutReport, LocalMetrics, TeamWellbeingSummary};
use crate::wellbeing::queries;

const ANALYSIS_WINDOW_DAYS: i64 = 30;
const DEFAULT_BURNOUT_THRESHOLD: u32 = 70;

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub mood: MoodLevel,
    pub energy: EnergyLevel,
    pub notes: Option<String>,
}

impl CheckInRequest {
    fn validate(&self) -> Result<(), AppError> {
        match &self.notes {
            Some(notes) if notes.chars().count() > 500 => Err(AppError::Validation(
                "notes must be at most 500 characters".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub days: Option<i64>,
}

impl PeriodQuery {
    fn days_within(&self, default: i64, min: i64, max: i64) -> Result<i64, AppError> {
        let days = self.days.unwrap_or(default);
        if !(min..=max).contains(&days) {
            return Err(AppError::Validation(format!(
                "days must be between {min} and {max}"
            )));
        }
        Ok(days)
    }
}

#[derive(Debug, Deserialize)]
pub struct BurnoutQuery {
    pub user_id: Option<Uuid>,
    pub threshold: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct WellbeingAnalysis {
    pub user_id: Uuid,
    pub user_name: String,
    pub period_days: i64,
    pub check_ins_count: usize,
    pub analyzed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metrics: LocalMetrics,
    #[serde(flatten)]
    pub insight: Advised<WellbeingInsight>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    Analysis(WellbeingAnalysis),
    NoData {
        user_id: Uuid,
        user_name: String,
        message: &'static str,
        recommendation: &'static str,
    },
}

#[derive(Debug, Serialize)]
pub struct BurnoutAnalysis {
    pub user_id: Uuid,
    pub user_name: String,
    #[serde(flatten)]
    pub report: BurnoutReport,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BurnoutResponse {
    Report(BurnoutAnalysis),
    InsufficientData {
        user_id: Uuid,
        user_name: String,
        has_pattern: bool,
        message: &'static str,
    },
}

fn since(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// Runs the local metrics and the advisor over `days` of check-ins. An AI answer
/// is stored on the newest check, which is returned alongside when that happened.
async fn analyze_user(
    state: &AppState,
    user: &User,
    days: i64,
) -> Result<(AnalysisResponse, Option<WellbeingCheckRow>), AppError> {
    let checks = queries::checks_since(&state.db, user.id, since(days)).await?;
    let (Some(local), Some(newest)) = (metrics::local_metrics(&checks), checks.last()) else {
        return Ok((
            AnalysisResponse::NoData {
                user_id: user.id,
                user_name: user.full_name.clone(),
                message: "No well-being data available",
                recommendation: "Encourage regular check-ins",
            },
            None,
        ));
    };

    let mut tasks = task_queries::recent_for_user(&state.db, user.id, MAX_TASKS_IN_PROMPT as i64).await?;
    tasks.reverse();
    let checkin_briefs: Vec<CheckinBrief> = checks.iter().map(CheckinBrief::from).collect();
    let task_briefs: Vec<TaskSummary> = tasks.iter().map(TaskSummary::from).collect();

    info!(user_id = %user.id, check_ins = checks.len(), "Requesting well-being analysis");
    let insight = advisor::analyze_wellbeing(
        state.advisor.as_ref(),
        &user.full_name,
        &checkin_briefs,
        &task_briefs,
    )
    .await;

    let scored = if insight.is_ai() {
        let recommendations = serde_json::to_value(&insight.value.recommendations)
            .map_err(|e| AppError::Internal(e.into()))?;
        Some(
            queries::store_analysis(
                &state.db,
                newest.id,
                insight.value.sentiment_score,
                insight.value.burnout_risk,
                &recommendations,
            )
            .await?,
        )
    } else {
        None
    };

    let analysis = WellbeingAnalysis {
        user_id: user.id,
        user_name: user.full_name.clone(),
        period_days: days,
        check_ins_count: checks.len(),
        analyzed_at: Utc::now(),
        metrics: local,
        insight,
    };
    Ok((AnalysisResponse::Analysis(analysis), scored))
}

/// POST /api/v1/ai/wellbeing/check-in
pub async fn handle_check_in(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<WellbeingCheckResponse>), AppError> {
    req.validate()?;
    let user = &current.user;

    let check = queries::insert_check(&state.db, user.id, req.mood, req.energy, req.notes.as_deref()).await?;
    info!(user_id = %user.id, mood = check.mood.as_str(), "Recorded well-being check-in");

    let check = match analyze_user(&state, user, ANALYSIS_WINDOW_DAYS).await {
        Ok((_, Some(scored))) if scored.id == check.id => scored,
        Ok(_) => check,
        Err(e) => {
            warn!(user_id = %user.id, "Check-in analysis failed: {e}");
            check
        }
    };

    Ok((StatusCode::CREATED, Json(WellbeingCheckResponse::from(&check))))
}

/// GET /api/v1/ai/wellbeing/my-analysis
pub async fn handle_my_analysis(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let days = query.days_within(30, 7, 90)?;
    let (analysis, _) = analyze_user(&state, &current.user, days).await?;
    Ok(Json(analysis))
}

/// GET /api/v1/ai/wellbeing/my-history
pub async fn handle_my_history(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<Vec<WellbeingCheckResponse>>, AppError> {
    let days = query.days_within(30, 7, 90)?;
    let checks = queries::checks_since(&state.db, current.user.id, since(days)).await?;
    Ok(Json(
        checks.iter().rev().map(WellbeingCheckResponse::from).collect(),
    ))
}

/// GET /api/v1/ai/wellbeing/team-summary
pub async fn handle_team_summary(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<TeamWellbeingSummary>, AppError> {
    let days = query.days_within(7, 1, 30)?;
    let team = user_queries::direct_reports(&state.db, manager.id).await?;
    if team.is_empty() {
        return Err(AppError::NotFound("Team not found".to_string()));
    }

    let window_start = since(days);
    let mut members = Vec::with_capacity(team.len());
    for member in team {
        let latest = queries::latest_since(&state.db, member.id, window_start).await?;
        members.push((member, latest));
    }

    Ok(Json(metrics::team_summary(&members, days)))
}

/// GET /api/v1/ai/wellbeing/burnout-patterns
pub async fn handle_burnout_patterns(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<BurnoutQuery>,
) -> Result<Json<BurnoutResponse>, AppError> {
    let target = match query.user_id {
        Some(id) if id != current.user.id => user_queries::find_by_id(&state.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {id} not found")))?,
        _ => current.user.clone(),
    };
    if !current.user.can_view(&target) {
        return Err(AppError::Forbidden(
            "You cannot view this user's well-being".to_string(),
        ));
    }

    let threshold = query.threshold.unwrap_or(DEFAULT_BURNOUT_THRESHOLD);
    let checks = queries::checks_since(&state.db, target.id, since(ANALYSIS_WINDOW_DAYS)).await?;

    let response = match metrics::burnout_patterns(&checks, threshold) {
        Some(report) => BurnoutResponse::Report(BurnoutAnalysis {
            user_id: target.id,
            user_name: target.full_name,
            report,
        }),
        None => BurnoutResponse::InsufficientData {
            user_id: target.id,
            user_name: target.full_name,
            has_pattern: false,
            message: "Insufficient data for analysis (minimum 3 check-ins)",
        },
    };
    Ok(Json(response))
}
