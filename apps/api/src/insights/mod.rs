//! Development plans and team insights.

pub mod handlers;
