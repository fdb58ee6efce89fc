//! Well-being check-ins, their analysis and team summaries.

pub mod handlers;
pub mod metrics;
pub mod queries;
