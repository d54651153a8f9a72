use axum::{extract::State, response::Json};

use crate::models::system::{ProbeResponse, ServiceInfo};
use crate::server::SystemState;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is alive", body = ProbeResponse))
)]
pub async fn health(State(state): State<SystemState>) -> Json<ProbeResponse> {
    Json(ProbeResponse::new("healthy", &state.identity))
}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/ready",
    responses((status = 200, description = "Service accepts requests", body = ProbeResponse))
)]
pub async fn ready(State(state): State<SystemState>) -> Json<ProbeResponse> {
    Json(ProbeResponse::new("ready", &state.identity))
}

/// Service information
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service name, version and endpoints", body = ServiceInfo))
)]
pub async fn service_info(State(state): State<SystemState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: state.identity.service.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: state.identity.hostname.clone(),
        endpoints: state
            .endpoints
            .iter()
            .map(|(name, route)| (name.to_string(), route.to_string()))
            .collect(),
    })
}
