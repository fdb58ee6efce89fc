use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
    Blocked,
}

impl TaskStatus {
    /// Open tasks hold their estimated hours on the assignee's workload.
    pub fn is_open(self) -> bool {
        matches!(
            self,
            TaskStatus::Pending | TaskStatus::InProgress | TaskStatus::Blocked
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
            TaskStatus::Blocked => "blocked",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
            TaskPriority::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub created_by: Uuid,
    pub estimated_hours: Option<f64>,
    pub actual_hours: f64,
    pub required_skills: Vec<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ai_match_score: Option<f64>,
    pub ai_recommendation_reason: Option<String>,
}

impl TaskRow {
    pub fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => now > due && self.status != TaskStatus::Completed,
            None => false,
        }
    }

    pub fn is_overdue(&self) -> bool {
        self.is_overdue_at(Utc::now())
    }

    pub fn progress_percentage(&self) -> f64 {
        match self.estimated_hours {
            Some(est) if est > 0.0 => (self.actual_hours / est * 100.0).min(100.0),
            _ => 0.0,
        }
    }

    /// The (assignee, hours) pair this task currently adds to a workload, if any.
    pub fn held_hours(&self) -> Option<(Uuid, f64)> {
        held_hours(self.assigned_to, self.status, self.estimated_hours)
    }
}

pub fn held_hours(
    assigned_to: Option<Uuid>,
    status: TaskStatus,
    estimated_hours: Option<f64>,
) -> Option<(Uuid, f64)> {
    match (assigned_to, estimated_hours) {
        (Some(user), Some(hours)) if status.is_open() && hours > 0.0 => Some((user, hours)),
        _ => None,
    }
}

/// Task joined with assignee/creator display names.
#[derive(Debug, Clone, FromRow)]
pub struct TaskViewRow {
    #[sqlx(flatten)]
    pub task: TaskRow,
    pub assigned_user_name: Option<String>,
    pub creator_name: Option<String>,
}

/// Column list for `TaskViewRow` queries; append WHERE / ORDER BY clauses.
pub const TASK_VIEW_SELECT: &str = r#"
    SELECT t.*, a.full_name AS assigned_user_name, c.full_name AS creator_name
    FROM tasks t
    LEFT JOIN users a ON a.id = t.assigned_to
    LEFT JOIN users c ON c.id = t.created_by
"#;

#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: TaskRow,
    pub progress_percentage: f64,
    pub is_overdue: bool,
    pub assigned_user_name: Option<String>,
    pub creator_name: String,
}

impl From<TaskViewRow> for TaskResponse {
    fn from(row: TaskViewRow) -> Self {
        Self {
            progress_percentage: row.task.progress_percentage(),
            is_overdue: row.task.is_overdue(),
            assigned_user_name: row.assigned_user_name,
            creator_name: row.creator_name.unwrap_or_else(|| "System".to_string()),
            task: row.task,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_task(status: TaskStatus, estimated: Option<f64>, actual: f64) -> TaskRow {
    let now = Utc::now();
    TaskRow {
        id: Uuid::new_v4(),
        title: "Ship the release".to_string(),
        description: None,
        status,
        priority: TaskPriority::Medium,
        assigned_to: Some(Uuid::new_v4()),
        created_by: Uuid::new_v4(),
        estimated_hours: estimated,
        actual_hours: actual,
        required_skills: vec![],
        due_date: None,
        started_at: None,
        completed_at: None,
        created_at: now,
        updated_at: now,
        ai_match_score: None,
        ai_recommendation_reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_progress_capped_at_hundred() {
        assert_eq!(test_task(TaskStatus::InProgress, Some(4.0), 2.0).progress_percentage(), 50.0);
        assert_eq!(test_task(TaskStatus::InProgress, Some(4.0), 9.0).progress_percentage(), 100.0);
        assert_eq!(test_task(TaskStatus::InProgress, None, 9.0).progress_percentage(), 0.0);
        assert_eq!(test_task(TaskStatus::InProgress, Some(0.0), 1.0).progress_percentage(), 0.0);
    }

    #[test]
    fn test_overdue_ignores_completed() {
        let now = Utc::now();
        let mut task = test_task(TaskStatus::Pending, None, 0.0);
        assert!(!task.is_overdue_at(now));

        task.due_date = Some(now - Duration::hours(1));
        assert!(task.is_overdue_at(now));

        task.status = TaskStatus::Completed;
        assert!(!task.is_overdue_at(now));
    }

    #[test]
    fn test_held_hours_only_for_open_assigned_tasks() {
        let open = test_task(TaskStatus::Blocked, Some(6.0), 0.0);
        assert_eq!(open.held_hours(), Some((open.assigned_to.unwrap(), 6.0)));

        assert!(test_task(TaskStatus::Completed, Some(6.0), 0.0).held_hours().is_none());
        assert!(test_task(TaskStatus::Cancelled, Some(6.0), 0.0).held_hours().is_none());
        assert!(test_task(TaskStatus::Pending, None, 0.0).held_hours().is_none());

        let mut unassigned = test_task(TaskStatus::Pending, Some(3.0), 0.0);
        unassigned.assigned_to = None;
        assert!(unassigned.held_hours().is_none());
    }

    #[test]
    fn test_priority_ordering_urgent_highest() {
        let mut priorities = vec![
            TaskPriority::Medium,
            TaskPriority::Urgent,
            TaskPriority::Low,
            TaskPriority::High,
        ];
        priorities.sort_by(|a, b| b.cmp(a));
        assert_eq!(
            priorities,
            vec![
                TaskPriority::Urgent,
                TaskPriority::High,
                TaskPriority::Medium,
                TaskPriority::Low
            ]
        );
    }

    #[test]
    fn test_response_defaults_creator_name() {
        let row = TaskViewRow {
            task: test_task(TaskStatus::Pending, Some(2.0), 1.0),
            assigned_user_name: Some("Ana".to_string()),
            creator_name: None,
        };
        let response = TaskResponse::from(row);
        assert_eq!(response.creator_name, "System");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["progress_percentage"], 50.0);
        assert_eq!(json["assigned_user_name"], "Ana");
    }
}
