use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::info;

use crate::advisor::{
    self,
    briefs::{MemberSnapshot, ProfileBrief, SkillBrief, TeamSnapshot},
    outputs::{Advised, DevelopmentPlan, TeamInsights},
};
use crate::auth::extractor::{CurrentUser, ManagerUser};
use crate::errors::AppError;
use crate::models::skill::UserSkillRow;
use crate::models::user::{round1, User};
use crate::models::wellbeing::WellbeingCheckRow;
use crate::skills::queries as skill_queries;
use crate::state::AppState;
use crate::tasks::queries as task_queries;
use crate::users::queries as user_queries;
use crate::wellbeing::queries as wellbeing_queries;

#[derive(Debug, Default, Deserialize)]
pub struct SkillPlanRequest {
    pub target_role: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
}

impl Period {
    pub fn days(self) -> i64 {
        match self {
            Period::Week => 7,
            Period::Month => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InsightsQuery {
    #[serde(default)]
    pub period: Period,
}

fn skill_brief(row: &UserSkillRow) -> SkillBrief {
    SkillBrief {
        name: row.skill_name.clone(),
        level: row.level.display_name().to_string(),
        proficiency_score: row.proficiency_score,
    }
}

fn member_snapshot(
    member: &User,
    (tasks_in_period, tasks_completed): (i64, i64),
    skills_count: i64,
    last_check: Option<&WellbeingCheckRow>,
) -> MemberSnapshot {
    MemberSnapshot {
        name: member.full_name.clone(),
        position: member.position.clone(),
        workload_percentage: round1(member.workload_percentage()),
        tasks_in_period,
        tasks_completed,
        skills_count,
        last_mood: last_check.map(|c| c.mood.as_str().to_string()),
        last_energy: last_check.map(|c| c.energy.as_str().to_string()),
        last_burnout_risk: last_check.and_then(|c| c.ai_burnout_risk),
    }
}

/// POST /api/v1/ai/development/skill-plan
pub async fn handle_skill_plan(
    State(state): State<AppState>,
    current: CurrentUser,
    body: Option<Json<SkillPlanRequest>>,
) -> Result<Json<Advised<DevelopmentPlan>>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let user = &current.user;

    let skills: Vec<SkillBrief> = skill_queries::list_user_skills(&state.db, user.id)
        .await?
        .iter()
        .map(skill_brief)
        .collect();
    let profile = ProfileBrief {
        name: user.full_name.clone(),
        position: user.position.clone(),
        department: user.department.clone(),
    };
    let target_role = req
        .target_role
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    info!(user_id = %user.id, skills = skills.len(), target_role = ?target_role, "Generating development plan");
    let plan = advisor::development_plan(state.advisor.as_ref(), &profile, &skills, target_role).await;
    Ok(Json(plan))
}

/// GET /api/v1/ai/insights/team
pub async fn handle_team_insights(
    State(state): State<AppState>,
    ManagerUser(manager): ManagerUser,
    Query(query): Query<InsightsQuery>,
) -> Result<Json<Advised<TeamInsights>>, AppError> {
    let period = query.period;
    let since = Utc::now() - Duration::days(period.days());
    let team = user_queries::direct_reports(&state.db, manager.id).await?;

    let mut members = Vec::with_capacity(team.len());
    for member in &team {
        let activity = task_queries::activity_since(&state.db, member.id, since).await?;
        let skills_count = user_queries::skills_count(&state.db, member.id).await?;
        let last_check = wellbeing_queries::latest_since(&state.db, member.id, since).await?;
        members.push(member_snapshot(member, activity, skills_count, last_check.as_ref()));
    }

    let snapshot = TeamSnapshot {
        period: period.as_str().to_string(),
        team_size: team.len(),
        members,
    };

    info!(manager_id = %manager.id, period = period.as_str(), team_size = team.len(), "Generating team insights");
    Ok(Json(advisor::team_insights(state.advisor.as_ref(), &snapshot).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{test_user, UserRole};
    use crate::models::wellbeing::{test_check, EnergyLevel, MoodLevel};

    #[test]
    fn test_period_parsing() {
        let q: InsightsQuery = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(q.period, Period::Week);
        assert_eq!(q.period.days(), 7);

        let q: InsightsQuery = serde_json::from_str(r#"{"period": "month"}"#).unwrap();
        assert_eq!(q.period.days(), 30);

        assert!(serde_json::from_str::<InsightsQuery>(r#"{"period": "year"}"#).is_err());
    }

    #[test]
    fn test_member_snapshot() {
        let member = test_user(UserRole::Member, 20.0, 40);
        let mut check = test_check(MoodLevel::Good, EnergyLevel::Low);
        check.ai_burnout_risk = Some(35);

        let snapshot = member_snapshot(&member, (4, 2), 3, Some(&check));
        assert_eq!(snapshot.workload_percentage, 50.0);
        assert_eq!(snapshot.tasks_in_period, 4);
        assert_eq!(snapshot.tasks_completed, 2);
        assert_eq!(snapshot.last_mood.as_deref(), Some("good"));
        assert_eq!(snapshot.last_energy.as_deref(), Some("low"));
        assert_eq!(snapshot.last_burnout_risk, Some(35));

        let quiet = member_snapshot(&member, (0, 0), 0, None);
        assert!(quiet.last_mood.is_none());
        assert!(quiet.last_burnout_risk.is_none());
    }
}
