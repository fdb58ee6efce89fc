use axum::Json;
use serde_json::{json, Value};

pub const SERVICE_NAME: &str = "smartleader-api";

/// GET /health
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "name": "SmartLeader API",
        "version": env!("CARGO_PKG_VERSION"),
        "health": "/health",
    }))
}
