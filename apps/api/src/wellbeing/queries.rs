use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::wellbeing::{EnergyLevel, MoodLevel, WellbeingCheckRow};

pub async fn insert_check(
    db: &PgPool,
    user_id: Uuid,
    mood: MoodLevel,
    energy: EnergyLevel,
    notes: Option<&str>,
) -> Result<WellbeingCheckRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO wellbeing_checks (id, user_id, mood, energy, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(mood)
    .bind(energy)
    .bind(notes)
    .fetch_one(db)
    .await
}

/// Stores the advisor's reading on a check.
pub async fn store_analysis(
    db: &PgPool,
    check_id: Uuid,
    sentiment_score: i32,
    burnout_risk: i32,
    recommendations: &Value,
) -> Result<WellbeingCheckRow, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE wellbeing_checks
        SET ai_sentiment_score = $2, ai_burnout_risk = $3, ai_recommendations = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(check_id)
    .bind(sentiment_score)
    .bind(burnout_risk)
    .bind(recommendations)
    .fetch_one(db)
    .await
}

/// Checks since `since`, oldest first.
pub async fn checks_since(
    db: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Vec<WellbeingCheckRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM wellbeing_checks WHERE user_id = $1 AND created_at >= $2 ORDER BY created_at ASC",
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(db)
    .await
}

pub async fn latest_since(
    db: &PgPool,
    user_id: Uuid,
    since: DateTime<Utc>,
) -> Result<Option<WellbeingCheckRow>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM wellbeing_checks
        WHERE user_id = $1 AND created_at >= $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_optional(db)
    .await
}

pub async fn latest(db: &PgPool, user_id: Uuid) -> Result<Option<WellbeingCheckRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM wellbeing_checks WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(db)
    .await
}
