//! Configuration file parsing and management.
//!
//! This module handles loading configuration from TOML files and `DP_*`
//! environment variables, and merging them with proper precedence rules.
//! The merged result is turned into the immutable [`CheckConfig`] and
//! [`RegistryDirectory`] once, at startup.

use crate::error::DomainProbeError;
use crate::protocols::RegistryDirectory;
use crate::types::{CheckConfig, MAX_CONCURRENCY};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Configuration loaded from TOML files.
///
/// ```toml
/// [defaults]
/// concurrency = 4
/// read_timeout = "15s"
///
/// [whois_servers]
/// dev = "whois.nic.google"
///
/// [not_found_patterns]
/// dev = ["Domain not found"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FileConfig {
    /// Default values for runtime knobs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Extra or replacement WHOIS servers, keyed by TLD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whois_servers: Option<HashMap<String, String>>,

    /// Extra or replacement not-found patterns, keyed by TLD or "default"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_found_patterns: Option<HashMap<String, Vec<String>>>,
}

/// Default configuration values that map to CLI options.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DefaultsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency: Option<usize>,

    /// WHOIS connect timeout (as string, e.g. "5s", "1m")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<String>,

    /// WHOIS read deadline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout: Option<String>,

    /// DNS resolver timeout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_timeout: Option<String>,
}

impl FileConfig {
    /// Apply file defaults on top of `config`. Unset values are left alone.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        let Some(defaults) = &self.defaults else {
            return config;
        };

        if let Some(concurrency) = defaults.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = defaults.connect_timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_connect_timeout(timeout);
        }
        if let Some(timeout) = defaults.read_timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_read_timeout(timeout);
        }
        if let Some(timeout) = defaults.dns_timeout.as_deref().and_then(parse_timeout_string) {
            config = config.with_dns_timeout(timeout);
        }
        config
    }

    /// Build the registry directory: built-in tables overlaid with this file's.
    pub fn build_directory(&self) -> RegistryDirectory {
        let no_servers = HashMap::new();
        let no_patterns = HashMap::new();
        RegistryDirectory::builtin().with_overrides(
            self.whois_servers.as_ref().unwrap_or(&no_servers),
            self.not_found_patterns.as_ref().unwrap_or(&no_patterns),
        )
    }
}

/// Configuration discovery and loading functionality.
pub struct ConfigManager {
    /// Whether to report which config files were picked up
    pub verbose: bool,
}

impl ConfigManager {
    /// Create a new configuration manager.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// `FileError` when the file is missing or unreadable, `ConfigError` when
    /// it is not valid TOML or fails validation.
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<FileConfig, DomainProbeError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DomainProbeError::file_error(
                path.to_string_lossy(),
                "Configuration file not found",
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            DomainProbeError::file_error(
                path.to_string_lossy(),
                format!("Failed to read configuration file: {}", e),
            )
        })?;

        let config: FileConfig = toml::from_str(&content)?;
        self.validate_config(&config)?;

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Discover and load configuration files in precedence order.
    ///
    /// XDG config first, then the home directory file, then the local file.
    /// Later files win. Files that fail to load are skipped with a warning.
    pub fn discover_and_load(&self) -> Result<FileConfig, DomainProbeError> {
        let candidates = [
            self.get_xdg_config_path(),
            self.get_global_config_path(),
            self.get_local_config_path(),
        ];

        let mut merged_config = FileConfig::default();
        let mut loaded_files = Vec::new();

        for path in candidates.into_iter().flatten() {
            match self.load_file(&path) {
                Ok(config) => {
                    merged_config = self.merge_configs(merged_config, config);
                    loaded_files.push(path);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping configuration file"),
            }
        }

        if self.verbose && !loaded_files.is_empty() {
            for path in &loaded_files {
                info!(path = %path.display(), "Using configuration file");
            }
        }

        Ok(merged_config)
    }

    fn get_local_config_path(&self) -> Option<PathBuf> {
        let path = Path::new("./domain-probe.toml");
        path.exists().then(|| path.to_path_buf())
    }

    fn get_global_config_path(&self) -> Option<PathBuf> {
        let home = env::var_os("HOME")?;
        let path = Path::new(&home).join(".domain-probe.toml");
        path.exists().then_some(path)
    }

    /// Follows the XDG Base Directory Specification.
    fn get_xdg_config_path(&self) -> Option<PathBuf> {
        let config_dir = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))?;

        let path = config_dir.join("domain-probe").join("config.toml");
        path.exists().then_some(path)
    }

    /// Merge two configurations. Values from `higher` win.
    pub fn merge_configs(&self, lower: FileConfig, higher: FileConfig) -> FileConfig {
        FileConfig {
            defaults: match (lower.defaults, higher.defaults) {
                (Some(lower_defaults), Some(higher_defaults)) => Some(DefaultsConfig {
                    concurrency: higher_defaults.concurrency.or(lower_defaults.concurrency),
                    connect_timeout: higher_defaults
                        .connect_timeout
                        .or(lower_defaults.connect_timeout),
                    read_timeout: higher_defaults.read_timeout.or(lower_defaults.read_timeout),
                    dns_timeout: higher_defaults.dns_timeout.or(lower_defaults.dns_timeout),
                }),
                (lower_defaults, higher_defaults) => higher_defaults.or(lower_defaults),
            },
            whois_servers: merge_maps(lower.whois_servers, higher.whois_servers),
            not_found_patterns: merge_maps(lower.not_found_patterns, higher.not_found_patterns),
        }
    }

    /// Validate a configuration for common issues.
    pub fn validate_config(&self, config: &FileConfig) -> Result<(), DomainProbeError> {
        if let Some(defaults) = &config.defaults {
            if let Some(concurrency) = defaults.concurrency {
                if concurrency == 0 || concurrency > MAX_CONCURRENCY {
                    return Err(DomainProbeError::config(format!(
                        "Concurrency must be between 1 and {}",
                        MAX_CONCURRENCY
                    )));
                }
            }

            let timeouts = [
                ("connect_timeout", &defaults.connect_timeout),
                ("read_timeout", &defaults.read_timeout),
                ("dns_timeout", &defaults.dns_timeout),
            ];
            for (name, value) in timeouts {
                if let Some(value) = value {
                    if parse_timeout_string(value).is_none() {
                        return Err(DomainProbeError::config(format!(
                            "Invalid {} '{}'. Use format like '5s', '30s', '2m'",
                            name, value
                        )));
                    }
                }
            }
        }

        if let Some(servers) = &config.whois_servers {
            for (tld, server) in servers {
                if tld.is_empty() || server.trim().is_empty() {
                    return Err(DomainProbeError::config(format!(
                        "WHOIS server entry '{}' must name a TLD and a host",
                        tld
                    )));
                }
            }
        }

        if let Some(patterns) = &config.not_found_patterns {
            for (tld, list) in patterns {
                if list.is_empty() || list.iter().any(|p| p.is_empty()) {
                    return Err(DomainProbeError::config(format!(
                        "Not-found patterns for '{}' cannot be empty",
                        tld
                    )));
                }
            }
        }

        Ok(())
    }
}

fn merge_maps<V>(
    lower: Option<HashMap<String, V>>,
    higher: Option<HashMap<String, V>>,
) -> Option<HashMap<String, V>> {
    match (lower, higher) {
        (Some(mut lower), Some(higher)) => {
            lower.extend(higher);
            Some(lower)
        }
        (lower, higher) => higher.or(lower),
    }
}

/// Environment variable configuration (`DP_*`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvConfig {
    pub concurrency: Option<usize>,
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub dns_timeout: Option<Duration>,
    pub config: Option<String>,
}

impl EnvConfig {
    /// Apply environment values on top of `config`.
    pub fn apply_to(&self, mut config: CheckConfig) -> CheckConfig {
        if let Some(concurrency) = self.concurrency {
            config = config.with_concurrency(concurrency);
        }
        if let Some(timeout) = self.connect_timeout {
            config = config.with_connect_timeout(timeout);
        }
        if let Some(timeout) = self.read_timeout {
            config = config.with_read_timeout(timeout);
        }
        if let Some(timeout) = self.dns_timeout {
            config = config.with_dns_timeout(timeout);
        }
        config
    }
}

/// Load configuration from `DP_*` environment variables.
///
/// Invalid values are logged as warnings and ignored.
pub fn load_env_config() -> EnvConfig {
    env_config_from(|key| env::var(key).ok())
}

fn env_config_from<F>(lookup: F) -> EnvConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut env_config = EnvConfig::default();

    if let Some(val) = lookup("DP_CONCURRENCY") {
        match val.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_CONCURRENCY).contains(&n) => {
                debug!(concurrency = n, "Using DP_CONCURRENCY");
                env_config.concurrency = Some(n);
            }
            _ => warn!(
                "Invalid DP_CONCURRENCY='{}', must be 1-{}",
                val, MAX_CONCURRENCY
            ),
        }
    }

    let timeouts: [(&str, &mut Option<Duration>); 3] = [
        ("DP_CONNECT_TIMEOUT", &mut env_config.connect_timeout),
        ("DP_READ_TIMEOUT", &mut env_config.read_timeout),
        ("DP_DNS_TIMEOUT", &mut env_config.dns_timeout),
    ];
    for (key, slot) in timeouts {
        if let Some(val) = lookup(key) {
            match parse_timeout_string(&val) {
                Some(timeout) => {
                    debug!("Using {}={}", key, val);
                    *slot = Some(timeout);
                }
                None => warn!(
                    "Invalid {}='{}', use format like '5s', '30s', '2m'",
                    key, val
                ),
            }
        }
    }

    if let Some(path) = lookup("DP_CONFIG") {
        if !path.trim().is_empty() {
            env_config.config = Some(path);
        }
    }

    env_config
}

/// Parse a timeout string like "5s", "30s", "2m" (bare numbers are seconds).
///
/// Zero is rejected.
pub fn parse_timeout_string(timeout_str: &str) -> Option<Duration> {
    let timeout_str = timeout_str.trim().to_lowercase();

    let seconds = if let Some(s) = timeout_str.strip_suffix('s') {
        s.parse::<u64>().ok()
    } else if let Some(m) = timeout_str.strip_suffix('m') {
        m.parse::<u64>().ok().and_then(|m| m.checked_mul(60))
    } else {
        timeout_str.parse::<u64>().ok()
    }?;

    (seconds > 0).then(|| Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_parse_timeout_string() {
        assert_eq!(parse_timeout_string("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_timeout_string("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timeout_string("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_timeout_string(" 7 "), Some(Duration::from_secs(7)));
        assert_eq!(parse_timeout_string("0s"), None);
        assert_eq!(parse_timeout_string("invalid"), None);
    }

    #[test]
    fn test_load_valid_config() {
        let temp_file = write_config(
            r#"
[defaults]
concurrency = 8
read_timeout = "15s"

[whois_servers]
dev = "whois.nic.google"

[not_found_patterns]
dev = ["Domain not found"]
"#,
        );

        let manager = ConfigManager::new(false);
        let config = manager.load_file(temp_file.path()).unwrap();

        let defaults = config.defaults.clone().unwrap();
        assert_eq!(defaults.concurrency, Some(8));
        assert_eq!(defaults.read_timeout.as_deref(), Some("15s"));

        let check = config.apply_to(CheckConfig::default());
        assert_eq!(check.concurrency, 8);
        assert_eq!(check.read_timeout, Duration::from_secs(15));
        assert_eq!(check.connect_timeout, Duration::from_secs(10));

        let directory = config.build_directory();
        assert_eq!(directory.whois_server("dev"), "whois.nic.google");
        assert_eq!(directory.not_found_patterns("dev"), ["Domain not found"]);
        // built-in entries survive the overlay
        assert_eq!(directory.whois_server("com"), "whois.verisign-grs.com");
    }

    #[test]
    fn test_invalid_concurrency() {
        let temp_file = write_config("[defaults]\nconcurrency = 0\n");
        let result = ConfigManager::new(false).load_file(temp_file.path());
        assert!(matches!(result, Err(DomainProbeError::ConfigError { .. })));
    }

    #[test]
    fn test_invalid_timeout_and_empty_entries() {
        let manager = ConfigManager::new(false);

        let bad_timeout = write_config("[defaults]\ndns_timeout = \"soon\"\n");
        assert!(manager.load_file(bad_timeout.path()).is_err());

        let empty_server = write_config("[whois_servers]\ndev = \"  \"\n");
        assert!(manager.load_file(empty_server.path()).is_err());

        let empty_patterns = write_config("[not_found_patterns]\ndev = []\n");
        assert!(manager.load_file(empty_patterns.path()).is_err());
    }

    #[test]
    fn test_malformed_toml_and_missing_file() {
        let manager = ConfigManager::new(false);

        let broken = write_config("[defaults\nconcurrency = ");
        let err = manager.load_file(broken.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML configuration"));

        let err = manager.load_file("/nonexistent/domain-probe.toml").unwrap_err();
        assert!(matches!(err, DomainProbeError::FileError { .. }));
    }

    #[test]
    fn test_merge_configs() {
        let manager = ConfigManager::new(false);

        let lower = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(10),
                connect_timeout: Some("3s".to_string()),
                ..Default::default()
            }),
            whois_servers: Some(HashMap::from([
                ("dev".to_string(), "old.example".to_string()),
                ("app".to_string(), "whois.nic.google".to_string()),
            ])),
            ..Default::default()
        };

        let higher = FileConfig {
            defaults: Some(DefaultsConfig {
                concurrency: Some(25),
                ..Default::default()
            }),
            whois_servers: Some(HashMap::from([(
                "dev".to_string(),
                "new.example".to_string(),
            )])),
            ..Default::default()
        };

        let merged = manager.merge_configs(lower, higher);
        let defaults = merged.defaults.unwrap();
        assert_eq!(defaults.concurrency, Some(25));
        assert_eq!(defaults.connect_timeout.as_deref(), Some("3s"));

        let servers = merged.whois_servers.unwrap();
        assert_eq!(servers["dev"], "new.example");
        assert_eq!(servers["app"], "whois.nic.google");
        assert!(merged.not_found_patterns.is_none());
    }

    #[test]
    fn test_env_config_parsing() {
        let vars = HashMap::from([
            ("DP_CONCURRENCY", "12"),
            ("DP_CONNECT_TIMEOUT", "2s"),
            ("DP_READ_TIMEOUT", "1m"),
            ("DP_DNS_TIMEOUT", "never"),
            ("DP_CONFIG", "/tmp/dp.toml"),
        ]);
        let env_config = env_config_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(env_config.concurrency, Some(12));
        assert_eq!(env_config.connect_timeout, Some(Duration::from_secs(2)));
        assert_eq!(env_config.read_timeout, Some(Duration::from_secs(60)));
        assert_eq!(env_config.dns_timeout, None);
        assert_eq!(env_config.config.as_deref(), Some("/tmp/dp.toml"));

        let config = env_config.apply_to(CheckConfig::default());
        assert_eq!(config.concurrency, 12);
        assert_eq!(config.dns_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_env_config_rejects_out_of_range_concurrency() {
        let env_config = env_config_from(|key| (key == "DP_CONCURRENCY").then(|| "51".to_string()));
        assert_eq!(env_config, EnvConfig::default());
    }
}
