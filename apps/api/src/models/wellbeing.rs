use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "mood_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MoodLevel {
    VeryBad,
    Bad,
    Neutral,
    Good,
    VeryGood,
}

impl MoodLevel {
    pub fn score(self) -> u8 {
        match self {
            MoodLevel::VeryBad => 1,
            MoodLevel::Bad => 2,
            MoodLevel::Neutral => 3,
            MoodLevel::Good => 4,
            MoodLevel::VeryGood => 5,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "😞",
            MoodLevel::Bad => "😟",
            MoodLevel::Neutral => "😐",
            MoodLevel::Good => "🙂",
            MoodLevel::VeryGood => "😄",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "very_bad",
            MoodLevel::Bad => "bad",
            MoodLevel::Neutral => "neutral",
            MoodLevel::Good => "good",
            MoodLevel::VeryGood => "very_good",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "energy_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    Exhausted,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl EnergyLevel {
    pub fn score(self) -> u8 {
        match self {
            EnergyLevel::Exhausted => 1,
            EnergyLevel::Low => 2,
            EnergyLevel::Medium => 3,
            EnergyLevel::High => 4,
            EnergyLevel::VeryHigh => 5,
        }
    }

    pub fn bars(self) -> &'static str {
        match self {
            EnergyLevel::Exhausted => "🔋",
            EnergyLevel::Low => "🔋🔋",
            EnergyLevel::Medium => "🔋🔋🔋",
            EnergyLevel::High => "🔋🔋🔋🔋",
            EnergyLevel::VeryHigh => "🔋🔋🔋🔋🔋",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyLevel::Exhausted => "exhausted",
            EnergyLevel::Low => "low",
            EnergyLevel::Medium => "medium",
            EnergyLevel::High => "high",
            EnergyLevel::VeryHigh => "very_high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WellbeingCheckRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: MoodLevel,
    pub energy: EnergyLevel,
    pub notes: Option<String>,
    pub ai_sentiment_score: Option<i32>,
    pub ai_burnout_risk: Option<i32>,
    pub ai_recommendations: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl WellbeingCheckRow {
    pub fn is_concerning(&self) -> bool {
        matches!(self.mood, MoodLevel::VeryBad | MoodLevel::Bad)
            || matches!(self.energy, EnergyLevel::Exhausted | EnergyLevel::Low)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WellbeingCheckResponse {
    pub id: Uuid,
    pub mood: MoodLevel,
    pub mood_emoji: &'static str,
    pub energy: EnergyLevel,
    pub energy_bars: &'static str,
    pub notes: Option<String>,
    pub ai_sentiment_score: Option<i32>,
    pub ai_burnout_risk: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&WellbeingCheckRow> for WellbeingCheckResponse {
    fn from(c: &WellbeingCheckRow) -> Self {
        Self {
            id: c.id,
            mood: c.mood,
            mood_emoji: c.mood.emoji(),
            energy: c.energy,
            energy_bars: c.energy.bars(),
            notes: c.notes.clone(),
            ai_sentiment_score: c.ai_sentiment_score,
            ai_burnout_risk: c.ai_burnout_risk,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_check(mood: MoodLevel, energy: EnergyLevel) -> WellbeingCheckRow {
    WellbeingCheckRow {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        mood,
        energy,
        notes: None,
        ai_sentiment_score: None,
        ai_burnout_risk: None,
        ai_recommendations: None,
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concerning_on_low_mood_or_energy() {
        assert!(test_check(MoodLevel::Bad, EnergyLevel::High).is_concerning());
        assert!(test_check(MoodLevel::Good, EnergyLevel::Low).is_concerning());
        assert!(!test_check(MoodLevel::Neutral, EnergyLevel::Medium).is_concerning());
    }

    #[test]
    fn test_response_includes_visuals() {
        let check = test_check(MoodLevel::VeryGood, EnergyLevel::Exhausted);
        let json = serde_json::to_value(WellbeingCheckResponse::from(&check)).unwrap();
        assert_eq!(json["mood"], "very_good");
        assert_eq!(json["mood_emoji"], "😄");
        assert_eq!(json["energy"], "exhausted");
        assert_eq!(json["energy_bars"], "🔋");
    }
}
