use std::path::PathBuf;

use calcmesh_core::{InstanceIdentity, MeshConfig, Operator, config};
use calcmesh_http::server::{Service, ServerConfig, ServiceRole};
use clap::{Parser, Subcommand};
use strum::IntoEnumIterator;
use tracing::info;

/// calcmesh HTTP service
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host address to bind to
    #[arg(short = 'H', long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (defaults to the role's conventional port)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Service name written to audit records
    #[arg(long, env = "SERVICE_NAME")]
    service_name: Option<String>,

    /// Host name written to audit records (defaults to the OS hostname)
    #[arg(long, env = "HOSTNAME")]
    hostname: Option<String>,

    /// JSON mesh configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Parser service base URL
    #[arg(long, env = "PARSER_SERVICE_URL")]
    parser_url: Option<String>,

    /// Addition peer base URL
    #[arg(long, env = "ADDITION_SERVICE_URL")]
    addition_url: Option<String>,

    /// Subtraction peer base URL
    #[arg(long, env = "SUBTRACTION_SERVICE_URL")]
    subtraction_url: Option<String>,

    /// Multiplication peer base URL
    #[arg(long, env = "MULTIPLICATION_SERVICE_URL")]
    multiplication_url: Option<String>,

    /// Division peer base URL
    #[arg(long, env = "DIVISION_SERVICE_URL")]
    division_url: Option<String>,

    /// Role to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /calculate
    Gateway {
        /// Parse in-process instead of calling the parser service
        #[arg(long)]
        embedded_parser: bool,
    },
    /// Serve POST /parse
    Parser,
    /// Serve POST /execute for one operator
    Peer {
        /// Operator symbol (+ - * /) or name (addition, subtraction, ...)
        #[arg(short, long, value_parser = parse_operator)]
        operator: Operator,
    },
}

fn parse_operator(value: &str) -> Result<Operator, String> {
    Operator::iter()
        .find(|op| op.symbol() == value || op.name() == value)
        .ok_or_else(|| format!("unknown operator '{}'", value))
}

impl Cli {
    fn role(&self) -> ServiceRole {
        match self.command {
            Commands::Gateway { embedded_parser } => ServiceRole::Gateway { embedded_parser },
            Commands::Parser => ServiceRole::Parser,
            Commands::Peer { operator } => ServiceRole::Peer(operator),
        }
    }

    /// File configuration first, then explicit flags and environment on top.
    fn mesh_config(&self) -> calcmesh_core::InternalResult<MeshConfig> {
        let mut mesh: MeshConfig = match &self.config {
            Some(path) => config::from_file(path)?,
            None => MeshConfig::default(),
        };

        let overrides = [
            (&self.parser_url, &mut mesh.parser_url),
            (&self.addition_url, &mut mesh.peers.addition),
            (&self.subtraction_url, &mut mesh.peers.subtraction),
            (&self.multiplication_url, &mut mesh.peers.multiplication),
            (&self.division_url, &mut mesh.peers.division),
        ];
        for (value, target) in overrides {
            if let Some(value) = value {
                *target = value.clone();
            }
        }
        Ok(mesh)
    }

    fn identity(&self, role: ServiceRole) -> InstanceIdentity {
        let service = self
            .service_name
            .clone()
            .unwrap_or_else(|| role.default_service_name());
        match &self.hostname {
            Some(hostname) if !hostname.is_empty() => InstanceIdentity::new(service, hostname),
            _ => InstanceIdentity::detect(service),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    calcmesh_http::init_tracing(&cli.log_level);

    let role = cli.role();
    let mesh = cli.mesh_config()?;
    let identity = cli.identity(role);
    info!("peer addresses: {:?}", mesh.peers);

    let service = Service::build(role, &identity, &mesh)?;
    let config = ServerConfig {
        host: cli.host.clone(),
        port: cli.port.unwrap_or_else(|| role.default_port()),
    };

    calcmesh_http::start_with_config(config, service, identity).await
}
