//! Core data types for domain registration checking.
//!
//! This module defines the per-domain status record, the runtime configuration
//! knobs, and the simplified projection handed to tool-facing transports.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Timing key for the WHOIS attempt.
pub const TIMING_WHOIS: &str = "whois_query";
/// Timing key for the DNS fallback attempt.
pub const TIMING_DNS: &str = "dns_query";

/// Upper bound for concurrent checks; matches the batch size limit.
pub const MAX_CONCURRENCY: usize = 50;

/// Outcome of a single domain check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// The domain is taken
    Registered,
    /// The domain looks available
    Unregistered,
    /// No decision could be made
    Failed,
}

/// Result of a domain registration check.
///
/// Built fresh for every check and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainStatus {
    /// Final decision
    pub status: CheckStatus,

    /// Short machine-oriented reason
    pub reason: String,

    /// Longer human-readable explanation
    pub details: String,

    /// Named timings ("whois_query", "dns_query") as seconds, e.g. "0.42s"
    #[serde(rename = "timingInfo")]
    pub timing_info: BTreeMap<String, String>,
}

impl DomainStatus {
    pub(crate) fn new(
        status: CheckStatus,
        reason: impl Into<String>,
        details: impl Into<String>,
        timing_info: BTreeMap<String, String>,
    ) -> Self {
        Self {
            status,
            reason: reason.into(),
            details: details.into(),
            timing_info,
        }
    }

    /// Coarse projection used by the tool-facing contract.
    pub fn is_registered(&self) -> bool {
        self.status == CheckStatus::Registered
    }
}

/// Format a duration the way timing entries are reported: seconds, two decimals.
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f64())
}

/// Configuration options for domain checking operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckConfig {
    /// Maximum number of domains evaluated at once.
    /// Default: 1 (strictly sequential), Range: 1-50
    pub concurrency: usize,

    /// Bound on the WHOIS TCP connect
    /// Default: 10 seconds
    #[serde(skip)]
    pub connect_timeout: Duration,

    /// Deadline for the whole WHOIS read loop, counted from the query write
    /// Default: 10 seconds
    #[serde(skip)]
    pub read_timeout: Duration,

    /// Per-query DNS resolver timeout
    /// Default: 5 seconds
    #[serde(skip)]
    pub dns_timeout: Duration,

    /// TCP port WHOIS servers listen on
    /// Default: 43
    pub whois_port: u16,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            dns_timeout: Duration::from_secs(5),
            whois_port: 43,
        }
    }
}

impl CheckConfig {
    /// Set how many domains may be evaluated concurrently (clamped to 1-50).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CONCURRENCY);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = timeout;
        self
    }

    /// Override the WHOIS port (tests point this at a local mock server).
    pub fn with_whois_port(mut self, port: u16) -> Self {
        self.whois_port = port;
        self
    }
}

/// Tool-facing projection of a [`DomainStatus`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimpleDomainStatus {
    /// true: registered, false: available or undetermined
    pub registered: bool,
}

/// Tool-facing response: one entry per distinct domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CheckDomainsResponse {
    pub results: HashMap<String, SimpleDomainStatus>,
}

impl CheckDomainsResponse {
    /// Pair domains with their statuses by position.
    ///
    /// A domain listed twice keeps the status of its last occurrence.
    pub fn from_results(domains: &[String], statuses: &[DomainStatus]) -> Self {
        let results = domains
            .iter()
            .zip(statuses)
            .map(|(domain, status)| {
                (
                    domain.clone(),
                    SimpleDomainStatus {
                        registered: status.is_registered(),
                    },
                )
            })
            .collect();
        Self { results }
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Registered => write!(f, "registered"),
            CheckStatus::Unregistered => write!(f, "unregistered"),
            CheckStatus::Failed => write!(f, "failed"),
        }
    }
}
