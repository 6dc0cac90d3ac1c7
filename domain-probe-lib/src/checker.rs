//! Main domain checker implementation.
//!
//! `DomainChecker` turns a domain name into exactly one [`DomainStatus`]:
//!
//! 1. Resolve the TLD. Unsupported TLDs fail immediately, no network work.
//! 2. Query WHOIS once. Timing is recorded whatever the outcome.
//! 3. If WHOIS failed, probe DNS once and decide from that.
//! 4. If WHOIS answered, look for a "not found" signature in the text.
//!    No signature means registered.

use crate::concurrent::run_ordered;
use crate::error::DomainProbeError;
use crate::protocols::{DnsProbe, HickoryDnsProbe, RegistryDirectory, WhoisClient, WhoisResponse};
use crate::tld::{last_label, resolve_tld};
use crate::types::{format_seconds, CheckConfig, CheckStatus, DomainStatus, TIMING_DNS, TIMING_WHOIS};
use crate::utils::validate_batch;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn};

pub const REASON_UNSUPPORTED_TLD: &str = "Unsupported TLD";
pub const REASON_DNS_RESOLVED: &str = "DNS resolution successful";
pub const REASON_DNS_NO_RECORDS: &str = "No DNS records found";
pub const REASON_BOTH_FAILED: &str = "Both WHOIS and DNS queries failed";
pub const REASON_WHOIS_AVAILABLE: &str = "Domain available according to WHOIS";
pub const REASON_WHOIS_REGISTERED: &str = "Domain registered according to WHOIS";

const TRUNCATED_NOTE: &str = " (WHOIS response may be truncated)";

/// Main domain checker that coordinates WHOIS, DNS and the registry directory.
///
/// # Example
///
/// ```rust,no_run
/// use domain_probe_lib::DomainChecker;
///
/// #[tokio::main]
/// async fn main() {
///     let checker = DomainChecker::new();
///     let status = checker.check_domain("example.com").await;
///     println!("{}: {}", status.status, status.reason);
/// }
/// ```
#[derive(Clone)]
pub struct DomainChecker {
    /// Configuration settings for this checker instance
    config: CheckConfig,
    /// Immutable TLD tables shared by every evaluation
    directory: Arc<RegistryDirectory>,
    /// WHOIS client (primary signal)
    whois_client: WhoisClient,
    /// DNS prober (fallback signal)
    dns_probe: Arc<dyn DnsProbe>,
}

impl DomainChecker {
    /// Create a checker with the built-in directory and default configuration.
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Create a checker with custom configuration and the built-in directory.
    pub fn with_config(config: CheckConfig) -> Self {
        let dns_probe = Arc::new(HickoryDnsProbe::new(config.dns_timeout));
        Self::with_parts(config, Arc::new(RegistryDirectory::builtin()), dns_probe)
    }

    /// Create a checker from explicit parts.
    pub fn with_parts(
        config: CheckConfig,
        directory: Arc<RegistryDirectory>,
        dns_probe: Arc<dyn DnsProbe>,
    ) -> Self {
        let whois_client = WhoisClient::new()
            .with_port(config.whois_port)
            .with_connect_timeout(config.connect_timeout)
            .with_read_timeout(config.read_timeout);

        Self {
            config,
            directory,
            whois_client,
            dns_probe,
        }
    }

    /// Replace the registry directory.
    pub fn with_directory(mut self, directory: Arc<RegistryDirectory>) -> Self {
        self.directory = directory;
        self
    }

    /// Replace the DNS prober.
    pub fn with_dns_probe(mut self, dns_probe: Arc<dyn DnsProbe>) -> Self {
        self.dns_probe = dns_probe;
        self
    }

    /// Get the current configuration for this checker.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Get the registry directory used by this checker.
    pub fn directory(&self) -> &RegistryDirectory {
        &self.directory
    }

    /// Check a single domain.
    ///
    /// Never fails: every problem is reported as a `failed` status.
    #[instrument(skip(self), fields(domain = %domain))]
    pub async fn check_domain(&self, domain: &str) -> DomainStatus {
        let mut timing = BTreeMap::new();

        let tld = resolve_tld(&self.directory, domain);
        if tld.is_empty() {
            let err = DomainProbeError::unsupported_tld(domain, last_label(domain));
            debug!(error = %err, "Skipping domain with unsupported TLD");
            return DomainStatus::new(
                CheckStatus::Failed,
                REASON_UNSUPPORTED_TLD,
                err.to_string(),
                timing,
            );
        }

        let started = Instant::now();
        let whois = self.whois_client.query(&self.directory, domain).await;
        timing.insert(TIMING_WHOIS.to_string(), format_seconds(started.elapsed()));

        match whois {
            Ok(response) => self.classify(&tld, &response, timing),
            Err(whois_err) => {
                warn!(error = %whois_err, "WHOIS query failed, falling back to DNS");
                self.dns_fallback(domain, whois_err, timing).await
            }
        }
    }

    /// Decide from WHOIS text. A matching "not found" pattern means available.
    fn classify(
        &self,
        tld: &str,
        response: &WhoisResponse,
        timing: BTreeMap<String, String>,
    ) -> DomainStatus {
        let note = if response.complete {
            ""
        } else {
            warn!(server = %response.server, "Classifying a possibly truncated WHOIS response");
            TRUNCATED_NOTE
        };

        match self.directory.match_not_found(tld, &response.text) {
            Some(pattern) => {
                debug!(pattern = %pattern, "WHOIS response matched a not-found pattern");
                DomainStatus::new(
                    CheckStatus::Unregistered,
                    REASON_WHOIS_AVAILABLE,
                    format!("Domain is not registered (confirmed by WHOIS){}", note),
                    timing,
                )
            }
            None => DomainStatus::new(
                CheckStatus::Registered,
                REASON_WHOIS_REGISTERED,
                format!("Domain is registered (confirmed by WHOIS){}", note),
                timing,
            ),
        }
    }

    async fn dns_fallback(
        &self,
        domain: &str,
        whois_err: DomainProbeError,
        mut timing: BTreeMap<String, String>,
    ) -> DomainStatus {
        let started = Instant::now();
        let dns = self.dns_probe.probe(domain).await;
        timing.insert(TIMING_DNS.to_string(), format_seconds(started.elapsed()));

        match dns {
            Ok(true) => DomainStatus::new(
                CheckStatus::Registered,
                REASON_DNS_RESOLVED,
                "Domain is registered (confirmed by DNS lookup)",
                timing,
            ),
            Ok(false) => DomainStatus::new(
                CheckStatus::Unregistered,
                REASON_DNS_NO_RECORDS,
                "Domain is not registered (confirmed by DNS lookup)",
                timing,
            ),
            Err(dns_err) => {
                warn!(error = %dns_err, "DNS fallback failed as well");
                DomainStatus::new(
                    CheckStatus::Failed,
                    REASON_BOTH_FAILED,
                    format!("WHOIS error: {}, DNS error: {}", whois_err, dns_err),
                    timing,
                )
            }
        }
    }

    /// Check multiple domains.
    ///
    /// Returns one status per input, in input order. Up to
    /// `config.concurrency` domains are evaluated at once.
    pub async fn check_domains(&self, domains: &[String]) -> Vec<DomainStatus> {
        debug!(
            total = domains.len(),
            concurrency = self.config.concurrency,
            "Starting batch check"
        );

        run_ordered(domains, self.config.concurrency, |domain| {
            let domain = domain.clone();
            async move { self.check_domain(&domain).await }
        })
        .await
    }

    /// Check multiple domains and key the results by domain name.
    ///
    /// When a domain appears twice, the later result wins.
    pub async fn check_domains_map(&self, domains: &[String]) -> HashMap<String, DomainStatus> {
        let statuses = self.check_domains(domains).await;
        domains.iter().cloned().zip(statuses).collect()
    }

    /// Validate a batch request, then check it.
    ///
    /// # Errors
    ///
    /// Returns `DomainProbeError::InvalidRequest` for an empty list, more than
    /// 50 domains, or an empty / over-long domain. Nothing is queried then.
    pub async fn check_batch(
        &self,
        domains: &[String],
    ) -> Result<Vec<DomainStatus>, DomainProbeError> {
        validate_batch(domains)?;
        Ok(self.check_domains(domains).await)
    }
}

impl Default for DomainChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct UnreachableDns;

    #[async_trait]
    impl DnsProbe for UnreachableDns {
        async fn probe(&self, _domain: &str) -> Result<bool, DomainProbeError> {
            panic!("DNS must not be consulted");
        }
    }

    fn checker() -> DomainChecker {
        DomainChecker::with_parts(
            CheckConfig::default(),
            Arc::new(RegistryDirectory::builtin()),
            Arc::new(UnreachableDns),
        )
    }

    fn response(text: &str, complete: bool) -> WhoisResponse {
        WhoisResponse {
            server: "whois.test".to_string(),
            text: text.to_string(),
            complete,
        }
    }

    #[test]
    fn test_classify_not_found_pattern() {
        let status = checker().classify(
            "com",
            &response("No match for \"EXAMPLE-TEST.COM\".", true),
            BTreeMap::new(),
        );
        assert_eq!(status.status, CheckStatus::Unregistered);
        assert_eq!(status.reason, REASON_WHOIS_AVAILABLE);
        assert_eq!(status.details, "Domain is not registered (confirmed by WHOIS)");
    }

    #[test]
    fn test_classify_defaults_to_registered() {
        let status = checker().classify("io", &response("", true), BTreeMap::new());
        assert_eq!(status.status, CheckStatus::Registered);
        assert_eq!(status.reason, REASON_WHOIS_REGISTERED);
    }

    #[test]
    fn test_classify_uses_tld_specific_patterns() {
        // "Domain not found" is only in the default set, not in the .com set
        let status = checker().classify("com", &response("Domain not found", true), BTreeMap::new());
        assert_eq!(status.status, CheckStatus::Registered);

        let status = checker().classify("io", &response("Domain not found", true), BTreeMap::new());
        assert_eq!(status.status, CheckStatus::Unregistered);
    }

    #[test]
    fn test_classify_flags_truncated_response() {
        let status = checker().classify("io", &response("Domain Name: X.IO", false), BTreeMap::new());
        assert_eq!(status.status, CheckStatus::Registered);
        assert!(status.details.ends_with(TRUNCATED_NOTE));
    }

    #[tokio::test]
    async fn test_unsupported_tld_skips_all_network_work() {
        let status = checker().check_domain("example.nonexistenttld").await;
        assert_eq!(status.status, CheckStatus::Failed);
        assert_eq!(status.reason, REASON_UNSUPPORTED_TLD);
        assert_eq!(
            status.details,
            "Unsupported top-level domain: nonexistenttld"
        );
        assert!(status.timing_info.is_empty());
    }

    #[tokio::test]
    async fn test_check_batch_rejects_before_querying() {
        let err = checker().check_batch(&[]).await.unwrap_err();
        assert!(matches!(err, DomainProbeError::InvalidRequest { .. }));
    }
}
