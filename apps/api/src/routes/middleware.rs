use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::info;

pub const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Logs every request with its status and latency, and reports the latency
/// in seconds in the `x-process-time` header.
pub async fn process_time(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let mut response = next.run(request).await;

    let elapsed = started.elapsed();
    info!(
        "{method} {path} -> {} ({:.3}s)",
        response.status().as_u16(),
        elapsed.as_secs_f64()
    );
    if let Ok(value) = HeaderValue::from_str(&format!("{:.3}", elapsed.as_secs_f64())) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }
    response
}
