//! Origin gate middleware.
//!
//! Every request passes through here, matched routes and the 404 fallback
//! alike. The `Origin` header must equal the configured value exactly;
//! anything else is rejected with 403. One access-log line is emitted per
//! request after the gate ran, so rejected requests are logged with the
//! status the abort path set.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::server::AppState;

pub async fn origin_gate(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();

    let method = req.method().clone();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    // Absent or non-UTF-8 headers compare as the empty string, which only
    // matches an empty configured origin.
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let client = client_ip(&req);

    let response = if origin == state.config.access.allowed_origin {
        next.run(req).await
    } else {
        tracing::error!(origin = %origin, "origin rejected");
        (
            StatusCode::FORBIDDEN,
            Json(serde_json::json!({ "status": "forbidden" })),
        )
            .into_response()
    };

    let status = response.status().as_u16();
    let latency = started.elapsed();
    tracing::info!(
        client = %client,
        origin = %origin,
        method = %method,
        path = %path,
        status,
        latency = ?latency,
        "request"
    );

    response
}

/// Resolve the client address: proxy headers first, then the socket peer.
fn client_ip(req: &Request<Body>) -> String {
    if let Some(forwarded) = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = req
        .headers()
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
