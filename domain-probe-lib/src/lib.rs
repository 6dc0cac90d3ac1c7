//! # Domain Probe Library
//!
//! Decides whether domain names are registered by querying WHOIS, falling
//! back to DNS when the WHOIS server cannot be reached.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domain_probe_lib::{CheckConfig, DomainChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = DomainChecker::with_config(CheckConfig::default().with_concurrency(4));
//!     let domains = vec!["example.com".to_string(), "example.io".to_string()];
//!
//!     for (domain, status) in domains.iter().zip(checker.check_batch(&domains).await?) {
//!         println!("{}: {} ({})", domain, status.status, status.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **WHOIS**: per-TLD servers, including compound (`com.cn`) and Han IDN TLDs
//! - **DNS Fallback**: used only when WHOIS is unreachable
//! - **Ordered Batches**: bounded concurrency, results in input order
//! - **Configurable**: TOML files and `DP_*` environment variables

// Re-export main public API types and functions
// This makes them available as domain_probe_lib::TypeName
pub use checker::DomainChecker;
pub use config::{
    load_env_config, parse_timeout_string, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::DomainProbeError;
pub use protocols::{DnsProbe, HickoryDnsProbe, NameNotFound, RegistryDirectory, WhoisClient, WhoisResponse};
pub use tld::resolve_tld;
pub use types::{
    CheckConfig, CheckDomainsResponse, CheckStatus, DomainStatus, SimpleDomainStatus,
    MAX_CONCURRENCY,
};
pub use utils::{parse_domain_list, validate_batch, MAX_BATCH_SIZE};

// Public modules
pub mod checker;
pub mod concurrent;
pub mod protocols;
pub mod tld;

// Internal modules
mod config;
mod error;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainProbeError>;

// Library version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
