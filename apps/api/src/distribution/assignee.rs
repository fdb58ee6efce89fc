//! Candidate pools handed to the advisor when choosing an assignee.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::advisor::briefs::{CandidateProfile, TeamContext};
use crate::models::user::{round1, User};
use crate::models::wellbeing::WellbeingCheckRow;
use crate::skills::queries as skill_queries;
use crate::users::queries as user_queries;
use crate::wellbeing::queries as wellbeing_queries;

/// Members a manager may assign to, with the ones that still have room
/// turned into candidate profiles.
pub struct CandidatePool {
    pub members: Vec<User>,
    pub candidates: Vec<CandidateProfile>,
    pub context: TeamContext,
}

impl CandidatePool {
    pub fn member(&self, id: Uuid) -> Option<&User> {
        self.members.iter().find(|m| m.id == id)
    }
}

pub fn candidate_profile(
    user: &User,
    skills: Vec<String>,
    latest: Option<&WellbeingCheckRow>,
) -> CandidateProfile {
    CandidateProfile {
        id: user.id,
        name: user.full_name.clone(),
        username: user.username.clone(),
        position: user.position.clone(),
        skills,
        workload: round1(user.workload_percentage()),
        available_hours: user.available_hours(),
        energy: latest.map_or("medium", |c| c.energy.as_str()).to_string(),
        mood: latest.map_or("neutral", |c| c.mood.as_str()).to_string(),
    }
}

pub async fn load_pool(db: &PgPool, manager: &User) -> Result<CandidatePool, sqlx::Error> {
    let members = user_queries::assignable_members(db, manager).await?;
    let available: Vec<&User> = members.iter().filter(|m| m.available_hours() > 0.0).collect();

    let ids: Vec<Uuid> = available.iter().map(|m| m.id).collect();
    let mut skills: HashMap<Uuid, Vec<String>> = HashMap::new();
    for (user_id, name) in skill_queries::skill_names_by_user(db, &ids).await? {
        skills.entry(user_id).or_default().push(name);
    }

    let mut candidates = Vec::with_capacity(available.len());
    for member in available {
        let latest = wellbeing_queries::latest(db, member.id).await?;
        candidates.push(candidate_profile(
            member,
            skills.remove(&member.id).unwrap_or_default(),
            latest.as_ref(),
        ));
    }

    let overloaded = members.iter().filter(|m| m.is_overloaded()).count();
    let context = TeamContext::from_candidates(&candidates, overloaded);
    Ok(CandidatePool {
        members,
        candidates,
        context,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{test_user, UserRole};
    use crate::models::wellbeing::{test_check, EnergyLevel, MoodLevel};

    #[test]
    fn test_profile_defaults_without_checkin() {
        let user = test_user(UserRole::Member, 12.0, 40);
        let profile = candidate_profile(&user, vec!["Rust".to_string()], None);
        assert_eq!(profile.workload, 30.0);
        assert_eq!(profile.available_hours, 28.0);
        assert_eq!(profile.energy, "medium");
        assert_eq!(profile.mood, "neutral");
        assert_eq!(profile.skills, vec!["Rust"]);
    }

    #[test]
    fn test_profile_uses_latest_checkin() {
        let user = test_user(UserRole::Member, 10.0, 30);
        let check = test_check(MoodLevel::Bad, EnergyLevel::Exhausted);
        let profile = candidate_profile(&user, vec![], Some(&check));
        assert_eq!(profile.workload, 33.3);
        assert_eq!(profile.energy, "exhausted");
        assert_eq!(profile.mood, "bad");
    }
}
