//! Moving pending work off overloaded team members.

use serde::Serialize;
use sqlx::PgConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::advisor::{self, briefs::TaskBrief, outputs::Source, Advisor};
use crate::distribution::assignee::CandidatePool;
use crate::models::task::{TaskRow, TaskStatus};
use crate::models::user::User;
use crate::tasks::{queries as task_queries, workload};

/// Pending tasks per overloaded member sent for a new recommendation.
pub const TASKS_PER_OVERLOADED_MEMBER: i64 = 3;

#[derive(Debug, Clone, Serialize)]
pub struct ProposedMove {
    pub task_id: Uuid,
    pub task_title: String,
    pub from_user: String,
    pub from_user_id: Uuid,
    pub to_user: String,
    pub to_user_id: Uuid,
    pub reason: String,
    pub match_score: f64,
    pub source: Source,
    /// Set once the move has been written.
    pub applied: bool,
}

impl ProposedMove {
    /// The task still belongs to the planned owner and is still pending.
    pub fn still_applies_to(&self, task: &TaskRow) -> bool {
        task.id == self.task_id
            && task.assigned_to == Some(self.from_user_id)
            && task.status == TaskStatus::Pending
    }
}

#[derive(Debug, Serialize)]
pub struct RebalanceReport {
    pub overloaded_count: usize,
    pub underloaded_count: usize,
    pub recommendations: Vec<ProposedMove>,
    pub applied: bool,
    pub applied_count: usize,
    pub summary: String,
}

impl RebalanceReport {
    /// `applied` tells whether applying was requested. Each move carries its own outcome.
    pub fn new(team: &[User], recommendations: Vec<ProposedMove>, applied: bool) -> Self {
        let applied_count = recommendations.iter().filter(|m| m.applied).count();
        let mut summary = format!(
            "{} task(s) recommended for redistribution",
            recommendations.len()
        );
        if applied {
            summary.push_str(&format!(", {applied_count} applied"));
        }
        Self {
            overloaded_count: team.iter().filter(|u| u.is_overloaded()).count(),
            underloaded_count: team.iter().filter(|u| u.is_underloaded()).count(),
            recommendations,
            applied,
            applied_count,
            summary,
        }
    }
}

/// Asks for a new assignee for each task of each overloaded member.
/// A move is proposed only when someone else is recommended.
pub async fn plan_moves(
    advisor: &dyn Advisor,
    overloaded: &[(User, Vec<TaskRow>)],
    pool: &CandidatePool,
) -> Vec<ProposedMove> {
    let mut moves = Vec::new();
    for (owner, tasks) in overloaded {
        for task in tasks {
            let brief = TaskBrief::from(task);
            let Some(advised) =
                advisor::recommend(advisor, &brief, &pool.candidates, &pool.context).await
            else {
                continue;
            };
            let rec = advised.value;
            if rec.recommended_user_id == owner.id {
                debug!(task_id = %task.id, "Recommendation keeps task with its owner");
                continue;
            }
            moves.push(ProposedMove {
                task_id: task.id,
                task_title: task.title.clone(),
                from_user: owner.username.clone(),
                from_user_id: owner.id,
                to_user: rec.recommended_user_name,
                to_user_id: rec.recommended_user_id,
                reason: rec.reasoning,
                match_score: rec.match_score,
                source: advised.source,
                applied: false,
            });
        }
    }
    moves
}

/// Reassigns every proposed task inside the caller's transaction and marks the
/// moves that were written. Tasks that changed owner or left `pending` since
/// planning are skipped.
pub async fn apply_moves(conn: &mut PgConnection, moves: &mut [ProposedMove]) -> Result<usize, sqlx::Error> {
    let mut applied = 0;
    for proposed in moves.iter_mut() {
        let Some(mut task) = task_queries::find_for_update(&mut *conn, proposed.task_id).await? else {
            continue;
        };
        if !proposed.still_applies_to(&task) {
            debug!(task_id = %task.id, "Task changed since planning, skipping move");
            continue;
        }

        let before = task.held_hours();
        task.assigned_to = Some(proposed.to_user_id);
        if proposed.source == Source::Ai {
            task.ai_match_score = Some(proposed.match_score);
            task.ai_recommendation_reason = Some(proposed.reason.clone());
        } else {
            task.ai_match_score = None;
            task.ai_recommendation_reason = None;
        }
        task_queries::save(&mut *conn, &task).await?;
        workload::apply_transition(&mut *conn, before, task.held_hours()).await?;
        proposed.applied = true;
        applied += 1;
    }
    info!(applied, proposed = moves.len(), "Applied rebalance moves");
    Ok(applied)
}
