//! Inputs handed to the advisor. Each is a trimmed, prompt-ready view of rows
//! the handlers already loaded; no brief carries secrets or password hashes.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::task::TaskRow;
use crate::models::wellbeing::WellbeingCheckRow;

#[derive(Debug, Clone, Serialize)]
pub struct TaskBrief {
    pub title: String,
    pub description: Option<String>,
    pub priority: String,
    pub estimated_hours: Option<f64>,
    pub required_skills: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl From<&TaskRow> for TaskBrief {
    fn from(t: &TaskRow) -> Self {
        Self {
            title: t.title.clone(),
            description: t.description.clone(),
            priority: t.priority.as_str().to_string(),
            estimated_hours: t.estimated_hours,
            required_skills: t.required_skills.clone(),
            due_date: t.due_date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub position: Option<String>,
    pub skills: Vec<String>,
    /// Percentage of capacity, one decimal.
    pub workload: f64,
    pub available_hours: f64,
    pub energy: String,
    pub mood: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamContext {
    pub team_size: usize,
    pub average_workload: f64,
    pub overloaded_members: usize,
}

impl TeamContext {
    pub fn from_candidates(candidates: &[CandidateProfile], overloaded_members: usize) -> Self {
        let average_workload = if candidates.is_empty() {
            0.0
        } else {
            candidates.iter().map(|c| c.workload).sum::<f64>() / candidates.len() as f64
        };
        Self {
            team_size: candidates.len(),
            average_workload: (average_workload * 10.0).round() / 10.0,
            overloaded_members,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckinBrief {
    pub date: String,
    pub mood: String,
    pub energy: String,
    pub notes: Option<String>,
}

impl From<&WellbeingCheckRow> for CheckinBrief {
    fn from(c: &WellbeingCheckRow) -> Self {
        Self {
            date: c.created_at.format("%Y-%m-%d").to_string(),
            mood: c.mood.as_str().to_string(),
            energy: c.energy.as_str().to_string(),
            notes: c.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub title: String,
    pub status: String,
    pub actual_hours: f64,
    pub estimated_hours: f64,
}

impl From<&TaskRow> for TaskSummary {
    fn from(t: &TaskRow) -> Self {
        Self {
            title: t.title.clone(),
            status: t.status.as_str().to_string(),
            actual_hours: t.actual_hours,
            estimated_hours: t.estimated_hours.unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileBrief {
    pub name: String,
    pub position: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillBrief {
    pub name: String,
    pub level: String,
    pub proficiency_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberSnapshot {
    pub name: String,
    pub position: Option<String>,
    pub workload_percentage: f64,
    pub tasks_in_period: i64,
    pub tasks_completed: i64,
    pub skills_count: i64,
    pub last_mood: Option<String>,
    pub last_energy: Option<String>,
    pub last_burnout_risk: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamSnapshot {
    pub period: String,
    pub team_size: usize,
    pub members: Vec<MemberSnapshot>,
}

#[cfg(test)]
pub(crate) fn test_candidate(name: &str, workload: f64) -> CandidateProfile {
    CandidateProfile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        username: name.to_lowercase(),
        position: None,
        skills: vec![],
        workload,
        available_hours: 10.0,
        energy: "medium".to_string(),
        mood: "neutral".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{test_task, TaskStatus};
    use crate::models::wellbeing::{test_check, EnergyLevel, MoodLevel};

    #[test]
    fn test_team_context_average() {
        let ctx = TeamContext::from_candidates(&[test_candidate("A", 50.0), test_candidate("B", 25.0)], 1);
        assert_eq!(ctx.team_size, 2);
        assert_eq!(ctx.average_workload, 37.5);
        assert_eq!(ctx.overloaded_members, 1);
        assert_eq!(TeamContext::from_candidates(&[], 0).average_workload, 0.0);
    }

    #[test]
    fn test_briefs_use_wire_names() {
        let check = test_check(MoodLevel::VeryGood, EnergyLevel::VeryHigh);
        let brief = CheckinBrief::from(&check);
        assert_eq!(brief.mood, "very_good");
        assert_eq!(brief.energy, "very_high");

        let summary = TaskSummary::from(&test_task(TaskStatus::InProgress, None, 2.0));
        assert_eq!(summary.status, "in_progress");
        assert_eq!(summary.estimated_hours, 0.0);
    }
}
