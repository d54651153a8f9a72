use crate::handlers;
use crate::models::system::{ProbeResponse, ServiceInfo};
use crate::models::{
    CalculateRequest, CalculateResponse, ErrorResponse, ExecuteRequest, ExecuteResponse,
    Metadata, ParseErrorResponse, ParseRequest, ParseResponse,
};
use crate::server::{GatewayState, ParserState, PeerState, Service, SystemState};
use axum::{
    Json, Router,
    routing::{get, post},
};
use calcmesh_core::{
    AstNode, Delegation, Delegations, EventLogEntry, InstanceIdentity, LogEntry, Operands,
    Operator, ParseRecord,
};
use utoipa::OpenApi;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::calculate::calculate,
        handlers::parse::parse,
        handlers::execute::execute,
        handlers::system::health,
        handlers::system::ready,
        handlers::system::service_info
    ),
    components(schemas(
        AstNode,
        Operator,
        CalculateRequest,
        CalculateResponse,
        Metadata,
        ParseRequest,
        ParseResponse,
        ParseErrorResponse,
        ExecuteRequest,
        ExecuteResponse,
        EventLogEntry,
        ParseRecord,
        LogEntry,
        Delegation,
        Delegations,
        Operands,
        ErrorResponse,
        ProbeResponse,
        ServiceInfo
    ))
)]
pub struct ApiDoc;

/// Build the router for a service: its role endpoints, probes and the
/// OpenAPI document.
pub fn create_app(service: Service, identity: InstanceIdentity) -> Router {
    let (role_router, endpoints) = match service {
        Service::Gateway(state) => (
            gateway_routes(state),
            vec![("calculate", "POST /calculate")],
        ),
        Service::Parser(state) => (parser_routes(state), vec![("parse", "POST /parse")]),
        Service::Peer(state) => (peer_routes(state), vec![("execute", "POST /execute")]),
    };

    role_router.merge(system_routes(SystemState {
        identity,
        endpoints,
    }))
}

fn gateway_routes(state: GatewayState) -> Router {
    Router::new()
        .route("/calculate", post(handlers::calculate))
        .with_state(state)
}

fn parser_routes(state: ParserState) -> Router {
    Router::new()
        .route("/parse", post(handlers::parse))
        .with_state(state)
}

fn peer_routes(state: PeerState) -> Router {
    Router::new()
        .route("/execute", post(handlers::execute))
        .with_state(state)
}

fn system_routes(mut state: SystemState) -> Router {
    state.endpoints.extend([
        ("health", "GET /health"),
        ("ready", "GET /ready"),
        ("openapi", "GET /api-docs/openapi.json"),
    ]);
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .route("/ready", get(handlers::ready))
        .route(OPENAPI_PATH, get(openapi))
        .with_state(state)
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
