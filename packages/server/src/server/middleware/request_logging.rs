use std::time::Instant;

use axum::{extract::Request, http::header, middleware::Next, response::Response};
use tracing::{info, warn};

use super::ClientIp;

/// Log each request on arrival and on completion with status and duration.
///
/// Runs inside `extract_client_ip`, so the [`ClientIp`] extension is available.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = request
        .extensions()
        .get::<ClientIp>()
        .map(|ClientIp(ip)| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    info!(%method, %path, %client_ip, %user_agent, "Request started");

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let duration_ms = started.elapsed().as_millis() as u64;

    if response.status().is_server_error() {
        warn!(%method, %path, status, duration_ms, %client_ip, "Request completed");
    } else {
        info!(%method, %path, status, duration_ms, %client_ip, "Request completed");
    }

    response
}
