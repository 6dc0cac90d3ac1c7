//! Domain Probe MCP Server
//!
//! Exposes domain registration checking to MCP clients over stdio, plus an
//! optional HTTP liveness endpoint.

mod health;
mod server;

use clap::Parser;
use domain_probe_lib::{load_env_config, CheckConfig, ConfigManager, DomainChecker};
use rmcp::transport::stdio;
use rmcp::ServiceExt;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// CLI arguments for domain-probe-mcp
#[derive(Parser, Debug)]
#[command(name = "domain-probe-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server for checking domain registration")]
struct Args {
    /// Skip starting the health check server
    #[arg(long = "skip-health-check")]
    skip_health_check: bool,

    /// Address of the health check server
    #[arg(long = "health-addr", value_name = "ADDR", default_value = "0.0.0.0:8080")]
    health_addr: String,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE")]
    config: Option<String>,

    /// Debug logging
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // stdout carries the protocol
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(if args.debug { "debug" } else { "info" })),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let env_config = load_env_config();
    let manager = ConfigManager::new(args.debug);
    let file_config = match args.config.as_ref().or(env_config.config.as_ref()) {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };
    let config = env_config.apply_to(file_config.apply_to(CheckConfig::default()));
    let checker =
        DomainChecker::with_config(config).with_directory(Arc::new(file_config.build_directory()));

    if !args.skip_health_check {
        match TcpListener::bind(&args.health_addr).await {
            Ok(listener) => {
                info!(addr = %args.health_addr, "Starting health check server");
                tokio::spawn(health::serve(listener));
            }
            Err(e) => warn!(addr = %args.health_addr, error = %e, "Health check server error"),
        }
    }

    info!(version = domain_probe_lib::VERSION, "Starting MCP server on stdio");
    let service = server::DomainProbeServer::new(checker).serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
