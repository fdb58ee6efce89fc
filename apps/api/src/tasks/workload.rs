//! Workload bookkeeping.
//!
//! An assigned task in an open state holds its estimated hours on the
//! assignee's `current_workload`. Every mutation computes the held hours before
//! and after and applies only the difference, clamped so a workload never drops
//! below zero.

use sqlx::PgConnection;
use uuid::Uuid;

/// `(user, hours)` a task holds, as returned by `TaskRow::held_hours`.
pub type Held = Option<(Uuid, f64)>;

/// Per-user workload adjustments needed to go from `before` to `after`.
pub fn held_deltas(before: Held, after: Held) -> Vec<(Uuid, f64)> {
    let deltas = match (before, after) {
        (Some((b, hb)), Some((a, ha))) if a == b => vec![(a, ha - hb)],
        (Some((b, hb)), Some((a, ha))) => vec![(b, -hb), (a, ha)],
        (Some((b, hb)), None) => vec![(b, -hb)],
        (None, Some((a, ha))) => vec![(a, ha)],
        (None, None) => vec![],
    };
    deltas.into_iter().filter(|(_, d)| *d != 0.0).collect()
}

pub async fn apply_delta(conn: &mut PgConnection, user_id: Uuid, delta: f64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users SET current_workload = GREATEST(0, current_workload + $1) WHERE id = $2",
    )
    .bind(delta)
    .bind(user_id)
    .execute(conn)
    .await?;
    Ok(())
}

/// Applies the workload effect of a task moving from `before` to `after`.
pub async fn apply_transition(conn: &mut PgConnection, before: Held, after: Held) -> Result<(), sqlx::Error> {
    for (user_id, delta) in held_deltas(before, after) {
        apply_delta(&mut *conn, user_id, delta).await?;
    }
    Ok(())
}
