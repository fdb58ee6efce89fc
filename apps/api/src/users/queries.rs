use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{User, UserRole};

pub struct NewUser<'a> {
    pub email: &'a str,
    pub username: &'a str,
    pub full_name: &'a str,
    pub password_hash: &'a str,
    pub department: Option<&'a str>,
    pub position: Option<&'a str>,
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Looks a user up by username or email. An email match wins over a username match.
pub async fn find_by_login(db: &PgPool, login: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT * FROM users
        WHERE username = $1 OR LOWER(email) = LOWER($1)
        ORDER BY (LOWER(email) = LOWER($1)) DESC
        LIMIT 1
        "#,
    )
    .bind(login)
    .fetch_optional(db)
    .await
}

pub async fn email_or_username_taken(
    db: &PgPool,
    email: &str,
    username: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER($1) OR username = $2)",
    )
    .bind(email)
    .bind(username)
    .fetch_one(db)
    .await
}

/// Inserts a new `member`. Registration never grants elevated roles.
pub async fn insert(db: &PgPool, new_user: &NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO users (id, email, username, full_name, password_hash, role, department, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_user.email)
    .bind(new_user.username)
    .bind(new_user.full_name)
    .bind(new_user.password_hash)
    .bind(UserRole::Member)
    .bind(new_user.department)
    .bind(new_user.position)
    .fetch_one(db)
    .await
}

pub async fn touch_last_login(db: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn update_profile(
    db: &PgPool,
    id: Uuid,
    full_name: Option<&str>,
    department: Option<&str>,
    position: Option<&str>,
    workload_capacity: Option<i32>,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE users SET
            full_name = COALESCE($2, full_name),
            department = COALESCE($3, department),
            position = COALESCE($4, position),
            workload_capacity = COALESCE($5, workload_capacity),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(full_name)
    .bind(department)
    .bind(position)
    .bind(workload_capacity)
    .fetch_one(db)
    .await
}

pub async fn set_manager(db: &PgPool, id: Uuid, manager_id: Uuid) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        "UPDATE users SET manager_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(manager_id)
    .fetch_one(db)
    .await
}

/// Active users reporting directly to `manager_id`, by name.
pub async fn direct_reports(db: &PgPool, manager_id: Uuid) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM users WHERE manager_id = $1 AND is_active ORDER BY full_name",
    )
    .bind(manager_id)
    .fetch_all(db)
    .await
}

/// Users the given manager may assign work to: direct reports, or every active
/// member for an admin.
pub async fn assignable_members(db: &PgPool, manager: &User) -> Result<Vec<User>, sqlx::Error> {
    if manager.role == UserRole::Admin {
        sqlx::query_as("SELECT * FROM users WHERE role = $1 AND is_active ORDER BY full_name")
            .bind(UserRole::Member)
            .fetch_all(db)
            .await
    } else {
        sqlx::query_as(
            "SELECT * FROM users WHERE manager_id = $1 AND role = $2 AND is_active ORDER BY full_name",
        )
        .bind(manager.id)
        .bind(UserRole::Member)
        .fetch_all(db)
        .await
    }
}

pub async fn skills_count(db: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM user_skills WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db)
        .await
}
