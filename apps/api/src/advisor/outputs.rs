use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Where an advisor answer came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Ai,
    Fallback,
}

/// An advisor answer tagged with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Advised<T> {
    #[serde(flatten)]
    pub value: T,
    pub source: Source,
}

impl<T> Advised<T> {
    pub fn ai(value: T) -> Self {
        Self { value, source: Source::Ai }
    }

    pub fn fallback(value: T) -> Self {
        Self { value, source: Source::Fallback }
    }

    pub fn is_ai(&self) -> bool {
        self.source == Source::Ai
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecommendation {
    pub recommended_user_id: Uuid,
    #[serde(default)]
    pub recommended_user_name: String,
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
    #[serde(default, deserialize_with = "lenient_uuid")]
    pub alternative_user_id: Option<Uuid>,
    #[serde(default)]
    pub alternative_user_name: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WellbeingRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub priority: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WellbeingInsight {
    /// -100 (very negative) to 100 (very positive).
    #[serde(deserialize_with = "sentiment")]
    pub sentiment_score: i32,
    /// 0 to 100.
    #[serde(deserialize_with = "percent_i32")]
    pub burnout_risk: i32,
    /// improving | stable | declining
    pub trend: String,
    pub main_concerns: Vec<String>,
    pub positive_aspects: Vec<String>,
    pub recommendations: Vec<WellbeingRecommendation>,
    pub manager_alert: Option<String>,
    pub motivational_message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillGap {
    pub skill_name: String,
    pub importance: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementArea {
    pub current_skill: String,
    pub current_level: String,
    pub target_level: String,
    pub action_plan: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub estimated_duration: String,
    pub priority: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevelopmentPlan {
    pub skill_gaps: Vec<SkillGap>,
    pub improvement_areas: Vec<ImprovementArea>,
    pub learning_recommendations: Vec<LearningRecommendation>,
    pub strengths: Vec<String>,
    pub next_steps: Vec<String>,
    pub timeline: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyInsight {
    pub category: String,
    pub insight: String,
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamAlert {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub affected_users: Vec<String>,
    pub description: String,
    pub suggested_action: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Opportunity {
    pub area: String,
    pub description: String,
    pub potential_impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionRecommendation {
    pub priority: String,
    pub action: String,
    pub expected_outcome: String,
    pub estimated_effort: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamInsights {
    pub summary: String,
    #[serde(deserialize_with = "percent_u8")]
    pub team_health_score: u8,
    #[serde(deserialize_with = "percent_u8")]
    pub productivity_score: u8,
    #[serde(deserialize_with = "percent_u8")]
    pub wellbeing_score: u8,
    pub key_insights: Vec<KeyInsight>,
    pub alerts: Vec<TeamAlert>,
    pub opportunities: Vec<Opportunity>,
    pub recommendations: Vec<ActionRecommendation>,
    pub top_performers: Vec<String>,
    pub needs_attention: Vec<String>,
}

/// Models answer scores as integers, floats or numeric strings. `null` reads as zero.
fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(0.0),
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| de::Error::custom(format!("unreadable score {n}"))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| de::Error::custom(format!("unreadable score '{s}'"))),
        other => Err(de::Error::custom(format!("unreadable score {other}"))),
    }
}

fn sentiment<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(score(deserializer)?.round().clamp(-100.0, 100.0) as i32)
}

fn percent_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(score(deserializer)?.round().clamp(0.0, 100.0) as i32)
}

fn percent_u8<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    Ok(score(deserializer)?.round().clamp(0.0, 100.0) as u8)
}

/// Anything that is not a UUID string (`""`, `"none"`, a number) reads as no alternative.
fn lenient_uuid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Uuid>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Uuid::parse_str(s.trim()).ok(),
        _ => None,
    })
}

impl TaskRecommendation {
    pub fn clamp(mut self) -> Self {
        self.match_score = self.match_score.clamp(0.0, 100.0);
        self
    }
}

impl WellbeingInsight {
    pub fn clamp(mut self) -> Self {
        self.sentiment_score = self.sentiment_score.clamp(-100, 100);
        self.burnout_risk = self.burnout_risk.clamp(0, 100);
        self
    }
}
