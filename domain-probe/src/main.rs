//! Domain Probe CLI Application
//!
//! A command-line interface for checking whether domains are registered,
//! using WHOIS with DNS fallback. Thin front end over domain-probe-lib.

mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use domain_probe_lib::{
    load_env_config, parse_domain_list, parse_timeout_string, validate_batch, CheckConfig,
    ConfigManager, DomainChecker, DomainProbeError, DomainStatus, FileConfig, RegistryDirectory,
    MAX_CONCURRENCY,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::process;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for domain-probe
#[derive(Parser, Debug, Default)]
#[command(name = "domain-probe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check domain registration using WHOIS with DNS fallback")]
#[command(
    long_about = "Check whether domains are registered by querying the WHOIS server of their TLD.\n\nWhen WHOIS is unreachable, a DNS lookup decides instead. Up to 50 domains per run."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// Domain names to check
    #[arg(value_name = "DOMAINS", help_heading = "Domain Selection")]
    pub domains: Vec<String>,

    /// Input file with domains (one per line, # for comments)
    #[arg(
        short = 'f',
        long = "file",
        value_name = "FILE",
        help_heading = "Domain Selection"
    )]
    pub file: Option<String>,

    /// List all supported TLDs and exit
    #[arg(long = "list-tlds", help_heading = "Domain Selection")]
    pub list_tlds: bool,

    /// Output results as a JSON array
    #[arg(short = 'j', long = "json", help_heading = "Output Format")]
    pub json: bool,

    /// Output results as a JSON object keyed by domain
    #[arg(long = "map", help_heading = "Output Format")]
    pub map: bool,

    /// Max concurrent domain checks (default: 1, max: 50)
    #[arg(
        short = 'c',
        long = "concurrency",
        value_name = "N",
        help_heading = "Performance"
    )]
    pub concurrency: Option<usize>,

    /// WHOIS connect timeout, e.g. "10s"
    #[arg(long = "connect-timeout", value_name = "DURATION", help_heading = "Performance")]
    pub connect_timeout: Option<String>,

    /// WHOIS read deadline, e.g. "10s"
    #[arg(long = "read-timeout", value_name = "DURATION", help_heading = "Performance")]
    pub read_timeout: Option<String>,

    /// Use specific config file instead of automatic discovery
    #[arg(long = "config", value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<String>,

    /// Show details, timings and debug logs
    #[arg(short = 'd', long = "debug", help_heading = "Configuration")]
    pub debug: bool,
}

/// One JSON array entry: the domain plus its status record.
#[derive(Serialize)]
struct DomainRecord<'a> {
    domain: &'a str,
    #[serde(flatten)]
    status: &'a DomainStatus,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.debug);

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so JSON on stdout stays clean.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(concurrency) = args.concurrency {
        if concurrency == 0 || concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "Concurrency must be between 1 and {}",
                MAX_CONCURRENCY
            ));
        }
    }

    for timeout in [&args.connect_timeout, &args.read_timeout].into_iter().flatten() {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid timeout '{}'. Use format like '5s', '30s', '2m'",
                timeout
            ));
        }
    }

    Ok(())
}

async fn run(args: Args) -> Result<(), DomainProbeError> {
    let (config, directory) = build_config(&args)?;

    if args.list_tlds {
        for tld in directory.known_tlds() {
            println!("{}", tld);
        }
        return Ok(());
    }

    let domains = collect_domains(&args)?;
    validate_batch(&domains)?;

    debug!(
        domains = domains.len(),
        concurrency = config.concurrency,
        "Starting domain checks"
    );
    let checker = DomainChecker::with_config(config).with_directory(Arc::new(directory));
    let started = Instant::now();

    if args.map {
        let results: BTreeMap<String, DomainStatus> =
            checker.check_domains_map(&domains).await.into_iter().collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    let statuses = checker.check_domains(&domains).await;

    if args.json {
        let records: Vec<DomainRecord<'_>> = domains
            .iter()
            .zip(&statuses)
            .map(|(domain, status)| DomainRecord { domain, status })
            .collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for (domain, status) in domains.iter().zip(&statuses) {
            ui::print_result(domain, status, args.debug);
        }
        if statuses.len() > 1 {
            println!();
            ui::print_summary(&ui::Tally::from_statuses(&statuses), started.elapsed());
        }
    }

    Ok(())
}

/// Build the runtime configuration. Precedence: CLI > env > file > built-in.
fn build_config(args: &Args) -> Result<(CheckConfig, RegistryDirectory), DomainProbeError> {
    let env_config = load_env_config();
    let manager = ConfigManager::new(args.debug);

    let file_config: FileConfig = match args.config.as_ref().or(env_config.config.as_ref()) {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let mut config = env_config.apply_to(file_config.apply_to(CheckConfig::default()));

    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    if let Some(timeout) = args.connect_timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_connect_timeout(timeout);
    }
    if let Some(timeout) = args.read_timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_read_timeout(timeout);
    }

    Ok((config, file_config.build_directory()))
}

/// Domains from positional args first, then from the file.
fn collect_domains(args: &Args) -> Result<Vec<String>, DomainProbeError> {
    let mut domains = args.domains.clone();

    if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainProbeError::file_error(path.as_str(), format!("Failed to read domain file: {}", e))
        })?;
        domains.extend(parse_domain_list(&content));
    }

    Ok(domains)
}
