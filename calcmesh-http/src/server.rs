use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use calcmesh_core::{
    ExpressionParser, HttpTransport, InstanceIdentity, InternalResult, LocalParser, MeshConfig,
    OperandEvaluator, OperationExecutor, Operator, Orchestrator, RemoteParser,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes::create_app;

/// What a process serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    /// `/calculate`, parsing remotely unless `embedded_parser` is set
    Gateway { embedded_parser: bool },
    /// `/parse`
    Parser,
    /// `/execute` for one operator
    Peer(Operator),
}

impl ServiceRole {
    pub fn default_port(&self) -> u16 {
        match self {
            ServiceRole::Gateway { .. } => 8080,
            ServiceRole::Parser => 8081,
            ServiceRole::Peer(Operator::Add) => 8082,
            ServiceRole::Peer(Operator::Subtract) => 8083,
            ServiceRole::Peer(Operator::Multiply) => 8084,
            ServiceRole::Peer(Operator::Divide) => 8086,
        }
    }

    pub fn default_service_name(&self) -> String {
        match self {
            ServiceRole::Gateway { .. } => "gateway-service".to_string(),
            ServiceRole::Parser => "parser-service".to_string(),
            ServiceRole::Peer(op) => InstanceIdentity::service_name_for(*op),
        }
    }
}

#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Orchestrator,
    pub max_expression_length: usize,
}

#[derive(Clone)]
pub struct ParserState {
    pub parser: LocalParser,
    pub max_expression_length: usize,
}

#[derive(Clone)]
pub struct PeerState {
    pub executor: OperationExecutor,
}

/// Identity and endpoint list reported by the probes.
#[derive(Debug, Clone)]
pub struct SystemState {
    pub identity: InstanceIdentity,
    pub endpoints: Vec<(&'static str, &'static str)>,
}

/// The role-specific part of a running service.
#[derive(Clone)]
pub enum Service {
    Gateway(GatewayState),
    Parser(ParserState),
    Peer(PeerState),
}

impl Service {
    /// Wires the core components for `role` with real HTTP delegation.
    pub fn build(
        role: ServiceRole,
        identity: &InstanceIdentity,
        mesh: &MeshConfig,
    ) -> InternalResult<Self> {
        let service = match role {
            ServiceRole::Parser => Service::Parser(ParserState {
                parser: LocalParser::new(identity.clone()),
                max_expression_length: mesh.max_expression_length,
            }),
            ServiceRole::Gateway { embedded_parser } => {
                let transport = HttpTransport::new(mesh.request_timeout)?;
                let parser: Arc<dyn ExpressionParser> = if embedded_parser {
                    Arc::new(LocalParser::new(identity.clone()))
                } else {
                    Arc::new(RemoteParser::new(
                        transport.client().clone(),
                        &mesh.parser_url,
                    ))
                };
                let evaluator =
                    OperandEvaluator::new(Arc::new(mesh.peers.clone()), Arc::new(transport));
                Service::Gateway(GatewayState {
                    orchestrator: Orchestrator::new(parser, evaluator),
                    max_expression_length: mesh.max_expression_length,
                })
            }
            ServiceRole::Peer(operator) => {
                let transport = HttpTransport::new(mesh.request_timeout)?;
                let evaluator =
                    OperandEvaluator::new(Arc::new(mesh.peers.clone()), Arc::new(transport));
                Service::Peer(PeerState {
                    executor: OperationExecutor::new(operator, identity.clone(), evaluator),
                })
            }
        };
        Ok(service)
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Start the HTTP server
pub async fn start_server(
    config: ServerConfig,
    service: Service,
    identity: InstanceIdentity,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = with_layers(create_app(service, identity.clone()));

    let addr = format!("{}:{}", config.host, config.port).parse::<SocketAddr>()?;
    info!(
        "Starting {} on {} (hostname {})",
        identity.service, addr, identity.hostname
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Adds request tracing and a permissive CORS policy.
pub fn with_layers(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    app.layer(TraceLayer::new_for_http()).layer(cors)
}
