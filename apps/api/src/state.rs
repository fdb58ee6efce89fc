use std::sync::Arc;

use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::advisor::Advisor;
use crate::auth::jwt::JwtKeys;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Token revocation list.
    pub redis: RedisClient,
    /// Assignment, well-being and insight recommendations. Default: `LlmAdvisor`.
    pub advisor: Arc<dyn Advisor>,
    pub jwt: JwtKeys,
}
