use redis::AsyncCommands;
use uuid::Uuid;

use crate::auth::jwt::Claims;

fn revoked_key(jti: Uuid) -> String {
    format!("revoked:{jti}")
}

/// Marks a token as revoked until it would have expired anyway.
pub async fn revoke(redis: &redis::Client, claims: &Claims) -> redis::RedisResult<()> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.set_ex(revoked_key(claims.jti), 1u8, claims.remaining_seconds())
        .await
}

pub async fn is_revoked(redis: &redis::Client, jti: Uuid) -> redis::RedisResult<bool> {
    let mut conn = redis.get_multiplexed_async_connection().await?;
    conn.exists(revoked_key(jti)).await
}
