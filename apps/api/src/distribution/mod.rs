//! Advisor-driven task assignment and team rebalancing.

pub mod assignee;
pub mod handlers;
pub mod rebalance;
