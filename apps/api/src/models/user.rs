use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Above this share of capacity a user counts as overloaded.
pub const OVERLOAD_THRESHOLD_PCT: f64 = 90.0;
/// Below this share of capacity a user counts as underloaded.
pub const UNDERLOAD_THRESHOLD_PCT: f64 = 70.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Member,
    Manager,
    Admin,
}

impl UserRole {
    pub fn is_manager(self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Admin)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub department: Option<String>,
    pub position: Option<String>,
    pub manager_id: Option<Uuid>,
    pub workload_capacity: i32,
    pub current_workload: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    pub fn workload_percentage(&self) -> f64 {
        workload_percentage(self.current_workload, self.workload_capacity)
    }

    pub fn is_overloaded(&self) -> bool {
        self.workload_percentage() > OVERLOAD_THRESHOLD_PCT
    }

    pub fn is_underloaded(&self) -> bool {
        self.workload_percentage() < UNDERLOAD_THRESHOLD_PCT
    }

    pub fn available_hours(&self) -> f64 {
        (self.workload_capacity as f64 - self.current_workload).max(0.0)
    }

    /// True when `self` may act on `other` as their manager.
    /// Admins manage everyone; managers only their direct reports.
    pub fn manages(&self, other: &User) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Manager => other.manager_id == Some(self.id),
            UserRole::Member => false,
        }
    }

    /// Self, or someone `self` manages.
    pub fn can_view(&self, other: &User) -> bool {
        self.id == other.id || self.manages(other)
    }
}

pub fn workload_percentage(current: f64, capacity: i32) -> f64 {
    if capacity <= 0 {
        return 0.0;
    }
    current / capacity as f64 * 100.0
}

/// Trimmed user view embedded in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub position: Option<String>,
    pub is_active: bool,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            username: u.username.clone(),
            full_name: u.full_name.clone(),
            role: u.role,
            department: u.department.clone(),
            position: u.position.clone(),
            is_active: u.is_active,
        }
    }
}

/// Full profile including workload figures.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub department: Option<String>,
    pub position: Option<String>,
    pub manager_id: Option<Uuid>,
    pub workload_capacity: i32,
    pub current_workload: f64,
    pub workload_percentage: f64,
    pub available_hours: f64,
    pub is_overloaded: bool,
}

impl From<&User> for UserProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            username: u.username.clone(),
            full_name: u.full_name.clone(),
            role: u.role,
            department: u.department.clone(),
            position: u.position.clone(),
            manager_id: u.manager_id,
            workload_capacity: u.workload_capacity,
            current_workload: u.current_workload,
            workload_percentage: round1(u.workload_percentage()),
            available_hours: u.available_hours(),
            is_overloaded: u.is_overloaded(),
        }
    }
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
pub(crate) fn test_user(role: UserRole, current: f64, capacity: i32) -> User {
    User {
        id: Uuid::new_v4(),
        email: "someone@example.com".to_string(),
        username: "someone".to_string(),
        full_name: "Some One".to_string(),
        password_hash: "$2b$04$hash".to_string(),
        role,
        is_active: true,
        is_verified: true,
        department: None,
        position: None,
        manager_id: None,
        workload_capacity: capacity,
        current_workload: current,
        created_at: Utc::now(),
        updated_at: None,
        last_login: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_percentage_zero_capacity() {
        assert_eq!(workload_percentage(10.0, 0), 0.0);
    }

    #[test]
    fn test_overload_is_strictly_above_ninety() {
        assert!(!test_user(UserRole::Member, 36.0, 40).is_overloaded());
        assert!(test_user(UserRole::Member, 37.0, 40).is_overloaded());
    }

    #[test]
    fn test_underload_below_seventy() {
        assert!(test_user(UserRole::Member, 27.0, 40).is_underloaded());
        assert!(!test_user(UserRole::Member, 28.0, 40).is_underloaded());
    }

    #[test]
    fn test_available_hours_never_negative() {
        assert_eq!(test_user(UserRole::Member, 50.0, 40).available_hours(), 0.0);
        assert_eq!(test_user(UserRole::Member, 12.5, 40).available_hours(), 27.5);
    }

    #[test]
    fn test_manages_scopes_by_role() {
        let manager = test_user(UserRole::Manager, 0.0, 40);
        let admin = test_user(UserRole::Admin, 0.0, 40);
        let peer = test_user(UserRole::Member, 0.0, 40);
        let mut report = test_user(UserRole::Member, 0.0, 40);
        report.manager_id = Some(manager.id);

        assert!(manager.manages(&report));
        assert!(!manager.manages(&peer));
        assert!(admin.manages(&peer));
        assert!(!peer.manages(&report));
        assert!(peer.can_view(&peer));
        assert!(!peer.can_view(&report));
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = test_user(UserRole::Member, 0.0, 40);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "member");
    }

    #[test]
    fn test_profile_rounds_percentage() {
        let user = test_user(UserRole::Member, 10.0, 30);
        let profile = UserProfile::from(&user);
        assert_eq!(profile.workload_percentage, 33.3);
    }
}
