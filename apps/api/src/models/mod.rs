pub mod skill;
pub mod task;
pub mod user;
pub mod wellbeing;
