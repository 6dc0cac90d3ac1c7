//! Protocol implementations used to decide registration status.
//!
//! WHOIS is the primary signal, DNS the fallback, and the registry directory
//! tells both where to look and what an "available" answer looks like.

/// DNS fallback prober
pub mod dns;

/// Registry directory (TLD → WHOIS server and not-found patterns)
pub mod registry;

/// WHOIS protocol implementation
pub mod whois;

// Re-export commonly used functions and types
pub use dns::{DnsProbe, HickoryDnsProbe, NameNotFound};
pub use registry::RegistryDirectory;
pub use whois::{WhoisClient, WhoisResponse};
