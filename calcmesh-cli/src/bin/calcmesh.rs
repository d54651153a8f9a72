use std::process;
use std::sync::Arc;

use calcmesh_cli::{
    api_client::{ApiClient, ApiError},
    render::{OutputFormat, calculation_table, to_json},
};
use calcmesh_core::{
    AstNode, CalculateError, InstanceIdentity, LocalParser, LoopbackTransport, OperandEvaluator,
    Orchestrator, ParseError, PeerAddressTable, config::local_hostname,
    protocol::CalculateResponse,
};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "calcmesh")]
#[command(about = "Client for the calcmesh calculation services", long_about = None)]
struct Cli {
    /// Gateway base URL
    #[arg(
        long,
        global = true,
        env = "CALCMESH_API_URL",
        default_value = "http://localhost:8080"
    )]
    api_url: String,

    #[arg(long, short, global = true, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression through a running gateway
    Calc { expression: String },
    /// Parse an expression locally and print its AST
    Parse { expression: String },
    /// Evaluate with the gateway, parser and all four peers in this process
    Local { expression: String },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Calculate(#[from] CalculateError),
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // stdout carries results only
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<String, CliError> {
    match &cli.command {
        Commands::Calc { expression } => {
            info!("Calculating via {}", cli.api_url);
            let response = ApiClient::new(&cli.api_url).calculate(expression).await?;
            render_calculation(&response, cli.output)
        }
        Commands::Parse { expression } => {
            let ast = calcmesh_core::parse(expression)?;
            render_ast(&ast, cli.output)
        }
        Commands::Local { expression } => {
            let response = local_orchestrator().calculate(expression).await?;
            render_calculation(&response, cli.output)
        }
    }
}

fn local_orchestrator() -> Orchestrator {
    let hostname = local_hostname();
    let peers = PeerAddressTable::default();
    debug!("Starting loopback mesh on {}", hostname);
    let transport = LoopbackTransport::mesh(peers.clone(), &hostname);
    let parser = LocalParser::new(InstanceIdentity::new("parser-service", hostname));
    Orchestrator::new(
        Arc::new(parser),
        OperandEvaluator::new(Arc::new(peers), transport),
    )
}

fn render_calculation(response: &CalculateResponse, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => to_json(response)?,
        OutputFormat::Table => calculation_table(response),
    })
}

fn render_ast(ast: &AstNode, format: OutputFormat) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::Json => to_json(ast)?,
        OutputFormat::Table => ast.to_string(),
    })
}
