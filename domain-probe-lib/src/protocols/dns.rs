//! DNS fallback prober.
//!
//! Used only when WHOIS is unreachable. A domain that resolves is taken; a
//! resolver answer saying the name does not exist means it is probably
//! available; every other resolver failure is reported as an error.

use crate::error::DomainProbeError;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Errors that can tell whether they mean "this name does not exist".
pub trait NameNotFound {
    fn is_name_not_found(&self) -> bool;
}

/// Only NXDOMAIN and an empty NOERROR answer mean the name does not exist.
/// SERVFAIL, REFUSED and the other rcodes hickory folds into
/// `NoRecordsFound` are resolver failures.
impl NameNotFound for ResolveError {
    fn is_name_not_found(&self) -> bool {
        matches!(
            self.kind(),
            ResolveErrorKind::NoRecordsFound {
                response_code: ResponseCode::NXDomain | ResponseCode::NoError,
                ..
            }
        )
    }
}

/// Registration signal from DNS.
#[async_trait]
pub trait DnsProbe: Send + Sync {
    /// `Ok(true)` if the name resolves, `Ok(false)` if it does not exist.
    async fn probe(&self, domain: &str) -> Result<bool, DomainProbeError>;
}

/// Translate a lookup outcome into the probe contract.
pub fn interpret_lookup<E>(
    domain: &str,
    outcome: Result<usize, E>,
) -> Result<bool, DomainProbeError>
where
    E: NameNotFound + std::fmt::Display,
{
    match outcome {
        Ok(count) => Ok(count > 0),
        Err(e) if e.is_name_not_found() => Ok(false),
        Err(e) => Err(DomainProbeError::dns(domain, e.to_string())),
    }
}

/// [`DnsProbe`] backed by hickory's async resolver.
#[derive(Clone)]
pub struct HickoryDnsProbe {
    resolver: TokioAsyncResolver,
}

impl HickoryDnsProbe {
    /// Resolver built from the system configuration.
    ///
    /// Falls back to the resolver's default upstreams when the system
    /// configuration cannot be read.
    pub fn new(timeout: Duration) -> Self {
        let (config, mut opts) = match hickory_resolver::system_conf::read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                warn!(error = %e, "Could not read system resolver configuration, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = timeout;
        opts.attempts = 2;

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }
}

impl Default for HickoryDnsProbe {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl DnsProbe for HickoryDnsProbe {
    #[instrument(skip(self), fields(domain = %domain))]
    async fn probe(&self, domain: &str) -> Result<bool, DomainProbeError> {
        let outcome = self
            .resolver
            .lookup_ip(domain)
            .await
            .map(|lookup| lookup.iter().count());
        debug!(resolved = ?outcome.as_ref().ok(), "DNS lookup finished");
        interpret_lookup(domain, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::proto::op::Query;
    use hickory_resolver::proto::rr::{Name, RecordType};
    use std::fmt;

    #[derive(Debug)]
    struct FakeError {
        not_found: bool,
    }

    impl NameNotFound for FakeError {
        fn is_name_not_found(&self) -> bool {
            self.not_found
        }
    }

    impl fmt::Display for FakeError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            if self.not_found {
                write!(f, "no such host")
            } else {
                write!(f, "server misbehaving")
            }
        }
    }

    #[test]
    fn test_resolved_addresses_mean_registered() {
        assert!(interpret_lookup::<FakeError>("a.com", Ok(2)).unwrap());
        assert!(!interpret_lookup::<FakeError>("a.com", Ok(0)).unwrap());
    }

    #[test]
    fn test_not_found_means_unregistered() {
        let outcome = interpret_lookup("free.com", Err(FakeError { not_found: true }));
        assert!(!outcome.unwrap());
    }

    #[test]
    fn test_other_errors_are_surfaced() {
        let err = interpret_lookup("x.com", Err(FakeError { not_found: false })).unwrap_err();
        assert_eq!(
            err,
            DomainProbeError::dns("x.com", "server misbehaving")
        );
    }

    fn no_records(response_code: ResponseCode) -> ResolveError {
        let query = Query::query(Name::from_ascii("x.com.").unwrap(), RecordType::A);
        ResolveError::from(ResolveErrorKind::NoRecordsFound {
            query: Box::new(query),
            soa: None,
            negative_ttl: None,
            response_code,
            trusted: false,
        })
    }

    #[test]
    fn test_resolve_error_classification() {
        assert!(no_records(ResponseCode::NXDomain).is_name_not_found());
        assert!(no_records(ResponseCode::NoError).is_name_not_found());
        assert!(!no_records(ResponseCode::ServFail).is_name_not_found());
        assert!(!no_records(ResponseCode::Refused).is_name_not_found());
        assert!(!ResolveError::from("connection reset").is_name_not_found());
    }

    #[test]
    fn test_failing_resolver_is_not_unregistered() {
        let outcome = interpret_lookup("x.com", Err(no_records(ResponseCode::ServFail)));
        assert!(matches!(outcome, Err(DomainProbeError::DnsError { .. })));

        let outcome = interpret_lookup("x.com", Err(no_records(ResponseCode::Refused)));
        assert!(outcome.is_err());

        let outcome = interpret_lookup("x.com", Err(no_records(ResponseCode::NXDomain)));
        assert!(!outcome.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_real_lookup_for_taken_domain() {
        let probe = HickoryDnsProbe::default();
        assert!(probe.probe("google.com").await.unwrap());
    }
}
