use sqlx::PgPool;
use uuid::Uuid;

use crate::models::skill::{Skill, SkillLevel, UserSkillRow, USER_SKILL_SELECT};

pub async fn insert_skill(
    db: &PgPool,
    name: &str,
    category: Option<&str>,
    description: Option<&str>,
) -> Result<Skill, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO skills (id, name, category, description) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(category)
    .bind(description)
    .fetch_one(db)
    .await
}

pub async fn skill_name_taken(db: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM skills WHERE LOWER(name) = LOWER($1))")
        .bind(name)
        .fetch_one(db)
        .await
}

/// `ILIKE` pattern matching `search` literally anywhere in the value.
fn substring_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Catalog listing; both filters are optional, `search` is a case-insensitive substring.
pub async fn list_skills(
    db: &PgPool,
    category: Option<&str>,
    search: Option<&str>,
) -> Result<Vec<Skill>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM skills
        WHERE ($1::TEXT IS NULL OR category = $1)
          AND ($2::TEXT IS NULL OR name ILIKE $2 ESCAPE '\')
        ORDER BY name
        "#,
    )
    .bind(category)
    .bind(search.map(substring_pattern))
    .fetch_all(db)
    .await
}

pub async fn categories(db: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT DISTINCT category FROM skills WHERE category IS NOT NULL ORDER BY category",
    )
    .fetch_all(db)
    .await
}

pub async fn find_skill(db: &PgPool, id: Uuid) -> Result<Option<Skill>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_user_skills(db: &PgPool, user_id: Uuid) -> Result<Vec<UserSkillRow>, sqlx::Error> {
    sqlx::query_as(&format!(
        "{USER_SKILL_SELECT} WHERE us.user_id = $1 ORDER BY s.name"
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_user_skill(db: &PgPool, id: Uuid) -> Result<Option<UserSkillRow>, sqlx::Error> {
    sqlx::query_as(&format!("{USER_SKILL_SELECT} WHERE us.id = $1"))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn user_has_skill(db: &PgPool, user_id: Uuid, skill_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM user_skills WHERE user_id = $1 AND skill_id = $2)",
    )
    .bind(user_id)
    .bind(skill_id)
    .fetch_one(db)
    .await
}

pub async fn insert_user_skill(
    db: &PgPool,
    user_id: Uuid,
    skill_id: Uuid,
    level: SkillLevel,
    proficiency_score: f64,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        INSERT INTO user_skills (id, user_id, skill_id, level, proficiency_score)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(skill_id)
    .bind(level)
    .bind(proficiency_score)
    .fetch_one(db)
    .await
}

pub async fn update_user_skill(
    db: &PgPool,
    id: Uuid,
    level: Option<SkillLevel>,
    proficiency_score: Option<f64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE user_skills SET
            level = COALESCE($2, level),
            proficiency_score = COALESCE($3, proficiency_score),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(level)
    .bind(proficiency_score)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete_user_skill(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_skills WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

/// Skill names per user, for the given users, in one round-trip.
pub async fn skill_names_by_user(
    db: &PgPool,
    user_ids: &[Uuid],
) -> Result<Vec<(Uuid, String)>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT us.user_id, s.name
        FROM user_skills us
        JOIN skills s ON s.id = us.skill_id
        WHERE us.user_id = ANY($1)
        ORDER BY s.name
        "#,
    )
    .bind(user_ids)
    .fetch_all(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_wildcards_are_literal() {
        assert_eq!(substring_pattern("rust"), "%rust%");
        assert_eq!(substring_pattern("100%"), "%100\\%%");
        assert_eq!(substring_pattern("snake_case"), "%snake\\_case%");
        assert_eq!(substring_pattern("a\\b"), "%a\\\\b%");
    }
}
