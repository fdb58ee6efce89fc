use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::hash_password;
use crate::models::user::UserRole;

/// Password shared by every seeded demo account.
pub const DEMO_PASSWORD: &str = "Demo@1234";

const DEMO_SKILLS: &[(&str, &str)] = &[
    ("Rust", "Programming"),
    ("Python", "Programming"),
    ("TypeScript", "Programming"),
    ("SQL", "Data"),
    ("Data Analysis", "Data"),
    ("React", "Frontend"),
    ("UI Design", "Design"),
    ("DevOps", "Infrastructure"),
    ("Cloud Architecture", "Infrastructure"),
    ("Project Management", "Management"),
    ("Communication", "Soft Skills"),
    ("Leadership", "Soft Skills"),
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies pending schema migrations from `./migrations`.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");
    Ok(())
}

/// Inserts a small demo team when the users table is empty.
pub async fn seed_demo_data(pool: &PgPool) -> Result<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        info!("Skipping demo seed: {existing} users already present");
        return Ok(());
    }

    let password_hash = hash_password(DEMO_PASSWORD.to_string())
        .await
        .context("Failed to hash demo password")?;

    let mut tx = pool.begin().await?;

    let admin_id = Uuid::new_v4();
    let manager_id = Uuid::new_v4();
    let demo_users = [
        (admin_id, "admin", "Alex Admin", UserRole::Admin, "Management", "Director", None),
        (manager_id, "manager", "Morgan Manager", UserRole::Manager, "Engineering", "Team Lead", Some(admin_id)),
        (Uuid::new_v4(), "ana", "Ana Silva", UserRole::Member, "Engineering", "Backend Developer", Some(manager_id)),
        (Uuid::new_v4(), "bruno", "Bruno Costa", UserRole::Member, "Engineering", "Frontend Developer", Some(manager_id)),
        (Uuid::new_v4(), "carla", "Carla Souza", UserRole::Member, "Engineering", "Data Analyst", Some(manager_id)),
    ];

    for (id, username, full_name, role, department, position, manager) in demo_users {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, email, username, full_name, password_hash, role, is_verified,
                 department, position, manager_id)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7, $8, $9)
            "#,
        )
        .bind(id)
        .bind(format!("{username}@smartleader.dev"))
        .bind(username)
        .bind(full_name)
        .bind(&password_hash)
        .bind(role)
        .bind(department)
        .bind(position)
        .bind(manager)
        .execute(&mut *tx)
        .await?;
    }

    for (name, category) in DEMO_SKILLS {
        sqlx::query("INSERT INTO skills (id, name, category) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(category)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!(
        "Seeded {} demo users and {} skills",
        demo_users.len(),
        DEMO_SKILLS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::validate_password;

    #[test]
    fn test_demo_password_passes_policy() {
        assert!(validate_password(DEMO_PASSWORD).is_ok());
    }

    #[test]
    fn test_demo_skill_names_unique() {
        let mut names: Vec<String> = DEMO_SKILLS.iter().map(|(n, _)| n.to_lowercase()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), DEMO_SKILLS.len());
    }
}
