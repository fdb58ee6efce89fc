//! Deterministic answers used when the model is unreachable or its answer is unusable.

use crate::advisor::briefs::CandidateProfile;
use crate::advisor::outputs::{DevelopmentPlan, TaskRecommendation, TeamInsights, WellbeingInsight};

/// Picks the least-loaded candidate. `None` when there is nobody to pick.
pub fn recommendation(candidates: &[CandidateProfile]) -> Option<TaskRecommendation> {
    let best = candidates
        .iter()
        .min_by(|a, b| a.workload.total_cmp(&b.workload))?;

    Some(TaskRecommendation {
        recommended_user_id: best.id,
        recommended_user_name: best.name.clone(),
        match_score: 50.0,
        reasoning: "Automatic selection based on the lowest current workload (AI unavailable)"
            .to_string(),
        pros: vec!["Lowest current workload".to_string()],
        cons: vec!["Recommendation made without a full AI analysis".to_string()],
        alternative_user_id: None,
        alternative_user_name: None,
        warnings: vec!["AI system temporarily unavailable".to_string()],
    })
}

pub fn wellbeing() -> WellbeingInsight {
    WellbeingInsight {
        sentiment_score: 0,
        burnout_risk: 0,
        trend: "stable".to_string(),
        main_concerns: vec!["AI analysis unavailable".to_string()],
        positive_aspects: vec![],
        recommendations: vec![],
        manager_alert: None,
        motivational_message: "Keep taking care of yourself! Your health matters.".to_string(),
    }
}

pub fn development_plan() -> DevelopmentPlan {
    DevelopmentPlan {
        strengths: vec!["Detailed analysis is temporarily unavailable".to_string()],
        next_steps: vec!["Try again later".to_string()],
        timeline: "N/A".to_string(),
        ..Default::default()
    }
}

pub fn team_insights() -> TeamInsights {
    TeamInsights {
        summary: "Team analysis temporarily unavailable".to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::briefs::test_candidate;

    #[test]
    fn test_picks_least_loaded() {
        let candidates = vec![
            test_candidate("Ana", 80.0),
            test_candidate("Bruno", 20.5),
            test_candidate("Carla", 45.0),
        ];
        let rec = recommendation(&candidates).unwrap();
        assert_eq!(rec.recommended_user_id, candidates[1].id);
        assert_eq!(rec.recommended_user_name, "Bruno");
        assert_eq!(rec.match_score, 50.0);
        assert!(!rec.warnings.is_empty());
    }

    #[test]
    fn test_no_candidates_no_pick() {
        assert!(recommendation(&[]).is_none());
    }

    #[test]
    fn test_neutral_wellbeing() {
        let insight = wellbeing();
        assert_eq!(insight.trend, "stable");
        assert_eq!(insight.burnout_risk, 0);
        assert!(insight.manager_alert.is_none());
    }

    #[test]
    fn test_empty_plan_and_insights() {
        assert!(development_plan().skill_gaps.is_empty());
        assert_eq!(development_plan().timeline, "N/A");
        assert_eq!(team_insights().team_health_score, 0);
        assert!(team_insights().summary.contains("unavailable"));
    }
}
