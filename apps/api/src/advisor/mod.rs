//! Advisor — the AI-backed recommendation component.
//!
//! `Advisor` is the seam: handlers only see the trait, carried in `AppState`
//! as `Arc<dyn Advisor>`. `LlmAdvisor` answers through the Gemini client.
//! The `recommend` / `analyze_wellbeing` / `development_plan` / `team_insights`
//! functions below wrap any advisor with answer checks and fallbacks, so a
//! handler always gets an `Advised<T>` tagged `ai` or `fallback`.

pub mod briefs;
pub mod fallback;
pub mod outputs;
pub mod prompts;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, LlmError};

use briefs::{
    CandidateProfile, CheckinBrief, ProfileBrief, SkillBrief, TaskBrief, TaskSummary, TeamContext,
    TeamSnapshot,
};
use outputs::{Advised, DevelopmentPlan, TaskRecommendation, TeamInsights, WellbeingInsight};

#[async_trait]
pub trait Advisor: Send + Sync {
    async fn recommend_assignee(
        &self,
        task: &TaskBrief,
        candidates: &[CandidateProfile],
        team: &TeamContext,
    ) -> Result<TaskRecommendation, LlmError>;

    async fn analyze_wellbeing(
        &self,
        user_name: &str,
        checkins: &[CheckinBrief],
        tasks: &[TaskSummary],
    ) -> Result<WellbeingInsight, LlmError>;

    async fn development_plan(
        &self,
        profile: &ProfileBrief,
        skills: &[SkillBrief],
        target_role: Option<&str>,
    ) -> Result<DevelopmentPlan, LlmError>;

    async fn team_insights(&self, snapshot: &TeamSnapshot) -> Result<TeamInsights, LlmError>;
}

/// Gemini-backed advisor.
pub struct LlmAdvisor {
    llm: LlmClient,
}

impl LlmAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Advisor for LlmAdvisor {
    async fn recommend_assignee(
        &self,
        task: &TaskBrief,
        candidates: &[CandidateProfile],
        team: &TeamContext,
    ) -> Result<TaskRecommendation, LlmError> {
        let prompt = prompts::recommendation_prompt(task, candidates, team);
        self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await
    }

    async fn analyze_wellbeing(
        &self,
        user_name: &str,
        checkins: &[CheckinBrief],
        tasks: &[TaskSummary],
    ) -> Result<WellbeingInsight, LlmError> {
        let prompt = prompts::wellbeing_prompt(user_name, checkins, tasks);
        self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await
    }

    async fn development_plan(
        &self,
        profile: &ProfileBrief,
        skills: &[SkillBrief],
        target_role: Option<&str>,
    ) -> Result<DevelopmentPlan, LlmError> {
        let prompt = prompts::development_plan_prompt(profile, skills, target_role);
        self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await
    }

    async fn team_insights(&self, snapshot: &TeamSnapshot) -> Result<TeamInsights, LlmError> {
        let prompt = prompts::team_insights_prompt(snapshot);
        self.llm.call_json(&prompt, JSON_ONLY_SYSTEM).await
    }
}

/// Recommends an assignee among `candidates`. An answer naming someone outside
/// the list is treated like a failed call. `None` only when `candidates` is empty.
pub async fn recommend(
    advisor: &dyn Advisor,
    task: &TaskBrief,
    candidates: &[CandidateProfile],
    team: &TeamContext,
) -> Option<Advised<TaskRecommendation>> {
    if candidates.is_empty() {
        return None;
    }

    info!("Requesting assignee recommendation for '{}'", task.title);
    match advisor.recommend_assignee(task, candidates, team).await {
        Ok(rec) => match candidates.iter().find(|c| c.id == rec.recommended_user_id) {
            Some(chosen) => {
                let mut rec = rec.clamp();
                rec.recommended_user_name = chosen.name.clone();
                if rec
                    .alternative_user_id
                    .map_or(false, |alt| !candidates.iter().any(|c| c.id == alt))
                {
                    rec.alternative_user_id = None;
                    rec.alternative_user_name = None;
                }
                return Some(Advised::ai(rec));
            }
            None => warn!(
                "Advisor recommended unknown user {}, using fallback",
                rec.recommended_user_id
            ),
        },
        Err(e) => warn!("Assignee recommendation failed, using fallback: {e}"),
    }

    fallback::recommendation(candidates).map(Advised::fallback)
}

pub async fn analyze_wellbeing(
    advisor: &dyn Advisor,
    user_name: &str,
    checkins: &[CheckinBrief],
    tasks: &[TaskSummary],
) -> Advised<WellbeingInsight> {
    match advisor.analyze_wellbeing(user_name, checkins, tasks).await {
        Ok(insight) => Advised::ai(insight.clamp()),
        Err(e) => {
            warn!("Well-being analysis failed, using fallback: {e}");
            Advised::fallback(fallback::wellbeing())
        }
    }
}

pub async fn development_plan(
    advisor: &dyn Advisor,
    profile: &ProfileBrief,
    skills: &[SkillBrief],
    target_role: Option<&str>,
) -> Advised<DevelopmentPlan> {
    match advisor.development_plan(profile, skills, target_role).await {
        Ok(plan) => Advised::ai(plan),
        Err(e) => {
            warn!("Development plan failed, using fallback: {e}");
            Advised::fallback(fallback::development_plan())
        }
    }
}

pub async fn team_insights(advisor: &dyn Advisor, snapshot: &TeamSnapshot) -> Advised<TeamInsights> {
    match advisor.team_insights(snapshot).await {
        Ok(insights) => Advised::ai(insights),
        Err(e) => {
            warn!("Team insights failed, using fallback: {e}");
            Advised::fallback(fallback::team_insights())
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Scripted advisor: recommends `pick` (or fails when `None`), fails everything else.
    pub struct StubAdvisor {
        pub pick: Option<Uuid>,
        pub calls: Mutex<usize>,
    }

    impl StubAdvisor {
        pub fn picking(pick: Option<Uuid>) -> Self {
            Self {
                pick,
                calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl Advisor for StubAdvisor {
        async fn recommend_assignee(
            &self,
            _task: &TaskBrief,
            _candidates: &[CandidateProfile],
            _team: &TeamContext,
        ) -> Result<TaskRecommendation, LlmError> {
            *self.calls.lock().unwrap() += 1;
            let id = self.pick.ok_or(LlmError::EmptyContent)?;
            Ok(TaskRecommendation {
                recommended_user_id: id,
                recommended_user_name: "model name".to_string(),
                match_score: 87.0,
                reasoning: "Best skill match".to_string(),
                pros: vec![],
                cons: vec![],
                alternative_user_id: Some(Uuid::new_v4()),
                alternative_user_name: Some("Ghost".to_string()),
                warnings: vec![],
            })
        }

        async fn analyze_wellbeing(
            &self,
            _user_name: &str,
            _checkins: &[CheckinBrief],
            _tasks: &[TaskSummary],
        ) -> Result<WellbeingInsight, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn development_plan(
            &self,
            _profile: &ProfileBrief,
            _skills: &[SkillBrief],
            _target_role: Option<&str>,
        ) -> Result<DevelopmentPlan, LlmError> {
            Err(LlmError::EmptyContent)
        }

        async fn team_insights(&self, _snapshot: &TeamSnapshot) -> Result<TeamInsights, LlmError> {
            Err(LlmError::RateLimited { retries: 3 })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubAdvisor;
    use super::*;
    use crate::advisor::briefs::test_candidate;
    use crate::advisor::outputs::Source;

    fn task() -> TaskBrief {
        TaskBrief {
            title: "Write docs".to_string(),
            description: None,
            priority: "low".to_string(),
            estimated_hours: Some(2.0),
            required_skills: vec![],
            due_date: None,
        }
    }

    fn team() -> Vec<CandidateProfile> {
        vec![test_candidate("Ana", 60.0), test_candidate("Bruno", 10.0)]
    }

    #[tokio::test]
    async fn test_valid_pick_is_ai_with_canonical_name() {
        let candidates = team();
        let stub = StubAdvisor::picking(Some(candidates[0].id));
        let ctx = TeamContext::from_candidates(&candidates, 0);

        let advised = recommend(&stub, &task(), &candidates, &ctx).await.unwrap();

        assert_eq!(advised.source, Source::Ai);
        assert_eq!(advised.value.recommended_user_id, candidates[0].id);
        assert_eq!(advised.value.recommended_user_name, "Ana");
        assert!(advised.value.alternative_user_id.is_none());
    }

    #[tokio::test]
    async fn test_unknown_pick_falls_back_to_least_loaded() {
        let candidates = team();
        let stub = StubAdvisor::picking(Some(uuid::Uuid::new_v4()));
        let ctx = TeamContext::from_candidates(&candidates, 0);

        let advised = recommend(&stub, &task(), &candidates, &ctx).await.unwrap();

        assert_eq!(advised.source, Source::Fallback);
        assert_eq!(advised.value.recommended_user_id, candidates[1].id);
        assert_eq!(advised.value.match_score, 50.0);
    }

    #[tokio::test]
    async fn test_failed_call_falls_back() {
        let candidates = team();
        let stub = StubAdvisor::picking(None);
        let ctx = TeamContext::from_candidates(&candidates, 0);
        let advised = recommend(&stub, &task(), &candidates, &ctx).await.unwrap();
        assert!(!advised.is_ai());
    }

    #[tokio::test]
    async fn test_no_candidates_skips_the_call() {
        let stub = StubAdvisor::picking(None);
        let ctx = TeamContext::from_candidates(&[], 0);
        assert!(recommend(&stub, &task(), &[], &ctx).await.is_none());
        assert_eq!(*stub.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_other_operations_fall_back() {
        let stub = StubAdvisor::picking(None);
        let insight = analyze_wellbeing(&stub, "Ana", &[], &[]).await;
        assert_eq!(insight.source, Source::Fallback);
        assert_eq!(insight.value.trend, "stable");

        let profile = ProfileBrief {
            name: "Ana".to_string(),
            position: None,
            department: None,
        };
        assert!(!development_plan(&stub, &profile, &[], None).await.is_ai());

        let snapshot = TeamSnapshot {
            period: "week".to_string(),
            team_size: 0,
            members: vec![],
        };
        assert!(!team_insights(&stub, &snapshot).await.is_ai());
    }
}
