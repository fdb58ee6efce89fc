use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "skill_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn display_name(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

impl Default for SkillLevel {
    fn default() -> Self {
        SkillLevel::Beginner
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A user skill joined with its catalog entry.
#[derive(Debug, Clone, FromRow)]
pub struct UserSkillRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub skill_category: Option<String>,
    pub level: SkillLevel,
    pub proficiency_score: f64,
    pub tasks_completed_count: i32,
    pub last_used: Option<DateTime<Utc>>,
    pub is_ai_detected: bool,
}

pub const USER_SKILL_SELECT: &str = r#"
    SELECT us.id, us.user_id, us.skill_id, s.name AS skill_name, s.category AS skill_category,
           us.level, us.proficiency_score, us.tasks_completed_count, us.last_used, us.is_ai_detected
    FROM user_skills us
    JOIN skills s ON s.id = us.skill_id
"#;

#[derive(Debug, Clone, Serialize)]
pub struct UserSkillResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub skill_id: Uuid,
    pub skill_name: String,
    pub skill_category: Option<String>,
    pub level: SkillLevel,
    pub level_name: &'static str,
    pub proficiency_score: f64,
    pub tasks_completed_count: i32,
    pub last_used: Option<DateTime<Utc>>,
    pub is_ai_detected: bool,
}

impl From<UserSkillRow> for UserSkillResponse {
    fn from(r: UserSkillRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            skill_id: r.skill_id,
            skill_name: r.skill_name,
            skill_category: r.skill_category,
            level: r.level,
            level_name: r.level.display_name(),
            proficiency_score: r.proficiency_score,
            tasks_completed_count: r.tasks_completed_count,
            last_used: r.last_used,
            is_ai_detected: r.is_ai_detected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serde_and_display() {
        let level: SkillLevel = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(level, SkillLevel::Advanced);
        assert_eq!(level.display_name(), "Advanced");
        assert_eq!(SkillLevel::default(), SkillLevel::Beginner);
    }

    #[test]
    fn test_response_carries_level_name() {
        let row = UserSkillRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            skill_id: Uuid::new_v4(),
            skill_name: "Rust".to_string(),
            skill_category: Some("Languages".to_string()),
            level: SkillLevel::Expert,
            proficiency_score: 88.0,
            tasks_completed_count: 3,
            last_used: None,
            is_ai_detected: false,
        };
        let json = serde_json::to_value(UserSkillResponse::from(row)).unwrap();
        assert_eq!(json["level"], "expert");
        assert_eq!(json["level_name"], "Expert");
    }
}
