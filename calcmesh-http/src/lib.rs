//! calcmesh HTTP services
//!
//! One binary, three roles: the gateway behind `/calculate`, the parser behind
//! `/parse` and the operator peers behind `/execute`. Every role also serves
//! `/health`, `/ready`, `/` and its OpenAPI document.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod server;

use calcmesh_core::InstanceIdentity;
use server::{Service, ServerConfig, start_server};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Start a calcmesh service with a custom configuration
pub async fn start_with_config(
    config: ServerConfig,
    service: Service,
    identity: InstanceIdentity,
) -> Result<(), Box<dyn std::error::Error>> {
    start_server(config, service, identity).await
}
