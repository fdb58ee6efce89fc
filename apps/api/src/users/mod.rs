//! User profiles, team membership and manager assignment.

pub mod handlers;
pub mod queries;
