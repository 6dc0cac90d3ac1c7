//! Error handling for domain probing operations.
//!
//! Every failure that can happen while checking a single domain is described
//! here. The evaluator turns these into a `failed` status instead of returning
//! them, so only request validation and configuration loading hand a
//! `DomainProbeError` back to callers.

use std::fmt;
use std::time::Duration;

/// Main error type for domain probing operations.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainProbeError {
    /// The batch request was rejected before any network activity
    InvalidRequest { message: String },

    /// No directory entry matches the domain's suffix
    UnsupportedTld { domain: String, suffix: String },

    /// WHOIS connection or request failure
    WhoisError {
        server: String,
        message: String,
    },

    /// DNS resolution failed with something other than "name not found"
    DnsError { domain: String, message: String },

    /// An operation did not finish within its deadline
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Configuration errors (invalid settings, bad TOML, etc.)
    ConfigError { message: String },

    /// File I/O errors when reading configuration or domain lists
    FileError { path: String, message: String },

    /// Generic internal errors that don't fit other categories
    Internal { message: String },
}

impl DomainProbeError {
    /// Create a new request validation error.
    pub fn invalid_request<M: Into<String>>(message: M) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a new unsupported TLD error.
    pub fn unsupported_tld<D: Into<String>, S: Into<String>>(domain: D, suffix: S) -> Self {
        Self::UnsupportedTld {
            domain: domain.into(),
            suffix: suffix.into(),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<S: Into<String>, M: Into<String>>(server: S, message: M) -> Self {
        Self::WhoisError {
            server: server.into(),
            message: message.into(),
        }
    }

    /// Create a new DNS error.
    pub fn dns<D: Into<String>, M: Into<String>>(domain: D, message: M) -> Self {
        Self::DnsError {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRequest { message } => write!(f, "{}", message),
            Self::UnsupportedTld { suffix, .. } => {
                write!(f, "Unsupported top-level domain: {}", suffix)
            }
            Self::WhoisError { server, message } => {
                write!(f, "{} ({})", message, server)
            }
            Self::DnsError { domain, message } => {
                write!(f, "lookup {}: {}", domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainProbeError {}

impl From<std::io::Error> for DomainProbeError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("I/O error: {}", err))
    }
}

impl From<serde_json::Error> for DomainProbeError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("JSON serialization failed: {}", err))
    }
}

impl From<toml::de::Error> for DomainProbeError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigError {
            message: format!("Failed to parse TOML configuration: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DomainProbeError::unsupported_tld("example.zzz", "zzz");
        assert_eq!(err.to_string(), "Unsupported top-level domain: zzz");

        let err = DomainProbeError::whois("whois.nic.io", "failed to connect to WHOIS server: refused");
        assert_eq!(
            err.to_string(),
            "failed to connect to WHOIS server: refused (whois.nic.io)"
        );

        let err = DomainProbeError::invalid_request("domains list cannot be empty");
        assert_eq!(err.to_string(), "domains list cannot be empty");
    }

    #[test]
    fn test_io_and_json_errors_become_internal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DomainProbeError = io.into();
        assert!(matches!(err, DomainProbeError::Internal { .. }));
        assert_eq!(err.to_string(), "Internal error: I/O error: denied");

        let parsed: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: DomainProbeError = parsed.unwrap_err().into();
        assert!(err.to_string().contains("JSON serialization failed"));
    }

    #[test]
    fn test_toml_error_becomes_config_error() {
        let parsed: Result<toml::Table, _> = toml::from_str("[defaults");
        let err: DomainProbeError = parsed.unwrap_err().into();
        assert!(matches!(err, DomainProbeError::ConfigError { .. }));
    }
}
