pub mod health;
pub mod middleware;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::distribution::handlers as distribution;
use crate::insights::handlers as insights;
use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::tasks::handlers as tasks;
use crate::users::handlers as users;
use crate::wellbeing::handlers as wellbeing;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        // Users
        .route(
            "/api/v1/users/me/profile",
            get(users::handle_my_profile).put(users::handle_update_my_profile),
        )
        .route("/api/v1/users/me/skills", get(users::handle_my_skills))
        .route("/api/v1/users/team/members", get(users::handle_team_members))
        .route("/api/v1/users/:id", get(users::handle_get_user))
        .route(
            "/api/v1/users/:id/assign-manager",
            post(users::handle_assign_manager),
        )
        // Skills
        .route(
            "/api/v1/skills",
            get(skills::handle_list_skills).post(skills::handle_create_skill),
        )
        .route("/api/v1/skills/categories", get(skills::handle_list_categories))
        .route("/api/v1/skills/user-skills", post(skills::handle_add_user_skill))
        .route("/api/v1/skills/user-skills/me", get(skills::handle_my_user_skills))
        // GET takes a user id; PUT and DELETE take a user-skill id.
        .route(
            "/api/v1/skills/user-skills/:id",
            get(skills::handle_user_skills)
                .put(skills::handle_update_user_skill)
                .delete(skills::handle_delete_user_skill),
        )
        // Tasks
        .route("/api/v1/tasks", post(tasks::handle_create_task))
        .route("/api/v1/tasks/my-tasks", get(tasks::handle_my_tasks))
        .route("/api/v1/tasks/team-tasks", get(tasks::handle_team_tasks))
        .route(
            "/api/v1/tasks/:id",
            get(tasks::handle_get_task)
                .put(tasks::handle_update_task)
                .delete(tasks::handle_delete_task),
        )
        // Well-being
        .route("/api/v1/ai/wellbeing/check-in", post(wellbeing::handle_check_in))
        .route("/api/v1/ai/wellbeing/my-analysis", get(wellbeing::handle_my_analysis))
        .route("/api/v1/ai/wellbeing/my-history", get(wellbeing::handle_my_history))
        .route("/api/v1/ai/wellbeing/team-summary", get(wellbeing::handle_team_summary))
        .route(
            "/api/v1/ai/wellbeing/burnout-patterns",
            get(wellbeing::handle_burnout_patterns),
        )
        // Distribution
        .route("/api/v1/ai/tasks/recommend", post(distribution::handle_recommend))
        .route(
            "/api/v1/ai/tasks/rebalance-team",
            post(distribution::handle_rebalance_team),
        )
        // Insights
        .route("/api/v1/ai/development/skill-plan", post(insights::handle_skill_plan))
        .route("/api/v1/ai/insights/team", get(insights::handle_team_insights))
        .layer(from_fn(middleware::process_time))
        .with_state(state)
}
