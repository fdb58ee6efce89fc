use crate::advisor::briefs::{
    CandidateProfile, CheckinBrief, ProfileBrief, SkillBrief, TaskBrief, TaskSummary, TeamContext,
    TeamSnapshot,
};
use crate::llm_client::prompts::{expected_json, ID_FIDELITY_INSTRUCTION, TONE_INSTRUCTION};

/// Only the most recent check-ins and tasks are sent with a well-being analysis.
pub const MAX_CHECKINS_IN_PROMPT: usize = 10;
pub const MAX_TASKS_IN_PROMPT: usize = 5;

const RECOMMENDATION_SHAPE: &str = r#"{
    "recommended_user_id": "<id copied from the candidate list>",
    "recommended_user_name": "<name>",
    "match_score": <0-100>,
    "reasoning": "<clear, concise explanation>",
    "pros": ["<advantage>"],
    "cons": ["<disadvantage>"],
    "alternative_user_id": "<id copied from the candidate list or null>",
    "alternative_user_name": "<name or null>",
    "warnings": ["<overload or risk warning, if any>"]
}"#;

const WELLBEING_SHAPE: &str = r#"{
    "sentiment_score": <-100 to 100>,
    "burnout_risk": <0-100>,
    "trend": "<improving|stable|declining>",
    "main_concerns": ["<concern>"],
    "positive_aspects": ["<positive aspect>"],
    "recommendations": [
        {"type": "<break|task_reduction|support|recognition>", "description": "<specific action>", "priority": "<low|medium|high>"}
    ],
    "manager_alert": "<message for the manager when there is a risk, else null>",
    "motivational_message": "<personal motivational message for the employee>"
}"#;

const PLAN_SHAPE: &str = r#"{
    "skill_gaps": [{"skill_name": "<missing skill>", "importance": "<low|medium|high>", "reason": "<why it matters>"}],
    "improvement_areas": [{"current_skill": "<skill>", "current_level": "<level>", "target_level": "<level>", "action_plan": "<how to improve>"}],
    "learning_recommendations": [
        {"type": "<course|project|mentoring|practice>", "title": "<title>", "description": "<details>", "estimated_duration": "<duration>", "priority": "<low|medium|high>"}
    ],
    "strengths": ["<strength>"],
    "next_steps": ["<next step>"],
    "timeline": "<suggested schedule>"
}"#;

const INSIGHTS_SHAPE: &str = r#"{
    "summary": "<2-3 line executive summary>",
    "team_health_score": <0-100>,
    "productivity_score": <0-100>,
    "wellbeing_score": <0-100>,
    "key_insights": [{"category": "<productivity|wellbeing|skills|distribution>", "insight": "<insight>", "impact": "<low|medium|high>"}],
    "alerts": [
        {"type": "<overload|burnout|skill_gap|inequality>", "severity": "<low|medium|high|critical>", "affected_users": ["<name>"], "description": "<alert>", "suggested_action": "<action>"}
    ],
    "opportunities": [{"area": "<area>", "description": "<description>", "potential_impact": "<expected impact>"}],
    "recommendations": [{"priority": "<low|medium|high>", "action": "<action>", "expected_outcome": "<outcome>", "estimated_effort": "<effort>"}],
    "top_performers": ["<name>"],
    "needs_attention": ["<name>"]
}"#;

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "N/A".to_string())
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn recommendation_prompt(
    task: &TaskBrief,
    candidates: &[CandidateProfile],
    team: &TeamContext,
) -> String {
    let candidate_lines = candidates
        .iter()
        .map(|c| {
            format!(
                "- id={} | {} ({}) | Skills: {} | Workload: {}% | Available: {}h | Energy: {} | Mood: {}",
                c.id,
                c.name,
                or_na(c.position.as_deref()),
                join_or_none(&c.skills),
                c.workload,
                c.available_hours,
                c.energy,
                c.mood
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let team_json = serde_json::to_string_pretty(team).unwrap_or_default();

    format!(
        "You are SmartLeader AI, an intelligent task distribution system.\n\n\
         # TASK TO ASSIGN\n\
         Title: {title}\n\
         Description: {description}\n\
         Priority: {priority}\n\
         Estimated hours: {hours}\n\
         Required skills: {skills}\n\
         Due date: {due}\n\n\
         # CANDIDATES\n{candidate_lines}\n\n\
         # TEAM CONTEXT\n{team_json}\n\n\
         # YOUR MISSION\n\
         Recommend the best person for this task, considering:\n\
         1. Skill match\n\
         2. Current workload (avoid overload)\n\
         3. Well-being (energy and mood)\n\
         4. Fairness of distribution\n\n\
         {shape}\n\n{ids}\n{tone}",
        title = task.title,
        description = or_na(task.description.as_deref()),
        priority = task.priority,
        hours = or_na(task.estimated_hours),
        skills = join_or_none(&task.required_skills),
        due = or_na(task.due_date.map(|d| d.format("%Y-%m-%d"))),
        shape = expected_json(RECOMMENDATION_SHAPE),
        ids = ID_FIDELITY_INSTRUCTION,
        tone = TONE_INSTRUCTION,
    )
}

/// `checkins` and `tasks` are oldest first; only the tail is sent.
pub fn wellbeing_prompt(user_name: &str, checkins: &[CheckinBrief], tasks: &[TaskSummary]) -> String {
    let history = checkins[checkins.len().saturating_sub(MAX_CHECKINS_IN_PROMPT)..]
        .iter()
        .map(|c| {
            format!(
                "- {}: Mood={}, Energy={}, Note={}",
                c.date,
                c.mood,
                c.energy,
                c.notes.as_deref().unwrap_or("no note")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let recent_tasks = tasks[tasks.len().saturating_sub(MAX_TASKS_IN_PROMPT)..]
        .iter()
        .map(|t| {
            format!(
                "- {} (Status: {}, Hours: {}/{})",
                t.title, t.status, t.actual_hours, t.estimated_hours
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are SmartLeader AI, a specialist in workplace well-being and mental health.\n\n\
         # EMPLOYEE\nName: {user_name}\n\n\
         # WELL-BEING HISTORY (latest check-ins)\n{history}\n\n\
         # RECENT TASKS\n{recent_tasks}\n\n\
         # YOUR MISSION\n\
         Analyse the history and identify:\n\
         1. Mood and energy trends\n\
         2. Worrying patterns\n\
         3. Signs of burnout or overload\n\
         4. Personalised recommendations\n\n\
         {shape}\n\n{tone}",
        shape = expected_json(WELLBEING_SHAPE),
        tone = TONE_INSTRUCTION,
    )
}

pub fn development_plan_prompt(
    profile: &ProfileBrief,
    skills: &[SkillBrief],
    target_role: Option<&str>,
) -> String {
    let skill_lines = if skills.is_empty() {
        "- no skills registered yet".to_string()
    } else {
        skills
            .iter()
            .map(|s| format!("- {}: level {} ({}%)", s.name, s.level, s.proficiency_score))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let target = target_role
        .map(|r| format!("\nTarget role: {r}"))
        .unwrap_or_default();

    format!(
        "You are SmartLeader AI, a specialist in professional development.\n\n\
         # EMPLOYEE\n\
         Name: {name}\n\
         Current position: {position}\n\
         Department: {department}{target}\n\n\
         # CURRENT SKILLS\n{skill_lines}\n\n\
         # YOUR MISSION\n\
         Build a personalised development plan:\n\
         1. Identify skill gaps\n\
         2. Suggest improvement areas\n\
         3. Recommend concrete actions\n\
         4. Prioritise based on the current profile\n\n\
         {shape}\n\nBe motivating, realistic and focused on sustainable growth.",
        name = profile.name,
        position = or_na(profile.position.as_deref()),
        department = or_na(profile.department.as_deref()),
        shape = expected_json(PLAN_SHAPE),
    )
}

pub fn team_insights_prompt(snapshot: &TeamSnapshot) -> String {
    let data = serde_json::to_string_pretty(snapshot).unwrap_or_default();
    format!(
        "You are SmartLeader AI, an executive assistant for team management.\n\n\
         # TEAM DATA ({period})\n{data}\n\n\
         # YOUR MISSION\n\
         Analyse the data and give the manager actionable insights:\n\
         1. Overall picture of the team\n\
         2. Alerts and risks\n\
         3. Improvement opportunities\n\
         4. Strategic recommendations\n\n\
         {shape}\n\nBe strategic, objective and focused on concrete actions.",
        period = snapshot.period,
        shape = expected_json(INSIGHTS_SHAPE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::briefs::test_candidate;

    fn task() -> TaskBrief {
        TaskBrief {
            title: "Migrate billing".to_string(),
            description: None,
            priority: "urgent".to_string(),
            estimated_hours: Some(12.0),
            required_skills: vec!["SQL".to_string(), "Rust".to_string()],
            due_date: None,
        }
    }

    #[test]
    fn test_recommendation_prompt_lists_candidate_ids() {
        let candidates = vec![test_candidate("Ana", 40.0), test_candidate("Bruno", 75.5)];
        let team = TeamContext::from_candidates(&candidates, 0);
        let prompt = recommendation_prompt(&task(), &candidates, &team);

        assert!(prompt.contains(&format!("id={}", candidates[0].id)));
        assert!(prompt.contains(&format!("id={}", candidates[1].id)));
        assert!(prompt.contains("Workload: 75.5%"));
        assert!(prompt.contains("Required skills: SQL, Rust"));
        assert!(prompt.contains("Description: N/A"));
        assert!(prompt.contains("\"recommended_user_id\""));
    }

    fn checkin(n: usize) -> CheckinBrief {
        CheckinBrief {
            date: format!("2024-01-{:02}", n),
            mood: "good".to_string(),
            energy: "high".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_wellbeing_prompt_keeps_latest_ten() {
        let checkins: Vec<CheckinBrief> = (1..=12).map(checkin).collect();
        let prompt = wellbeing_prompt("Ana", &checkins, &[]);
        assert!(!prompt.contains("2024-01-02:"));
        assert!(prompt.contains("2024-01-03:"));
        assert!(prompt.contains("2024-01-12:"));
        assert!(prompt.contains("Note=no note"));
    }

    #[test]
    fn test_plan_prompt_target_role_optional() {
        let profile = ProfileBrief {
            name: "Ana".to_string(),
            position: Some("Developer".to_string()),
            department: None,
        };
        let with = development_plan_prompt(&profile, &[], Some("Tech Lead"));
        let without = development_plan_prompt(&profile, &[], None);
        assert!(with.contains("Target role: Tech Lead"));
        assert!(!without.contains("Target role"));
        assert!(without.contains("no skills registered yet"));
    }

    #[test]
    fn test_insights_prompt_embeds_period() {
        let snapshot = TeamSnapshot {
            period: "month".to_string(),
            team_size: 0,
            members: vec![],
        };
        assert!(team_insights_prompt(&snapshot).contains("# TEAM DATA (month)"));
    }
}
