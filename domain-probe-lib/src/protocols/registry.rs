//! Registry directory: TLD to WHOIS server and "not found" pattern mappings.
//!
//! The directory is an immutable value built once at startup and shared by
//! reference. Tests build their own directories that point at local mock
//! servers, so nothing in here is global state.

use std::collections::HashMap;

/// Server used when a TLD has no explicit WHOIS server.
pub const DEFAULT_WHOIS_SERVER: &str = "whois.iana.org";

/// Key of the pattern set used when a TLD has no explicit one.
pub const DEFAULT_PATTERN_KEY: &str = "default";

/// Built-in TLD → WHOIS server table.
const BUILTIN_WHOIS_SERVERS: &[(&str, &str)] = &[
    // Generic TLDs
    ("com", "whois.verisign-grs.com"),
    ("net", "whois.verisign-grs.com"),
    ("org", "whois.pir.org"),
    ("info", "whois.nic.info"),
    ("biz", "whois.nic.biz"),
    ("mobi", "whois.nic.mobi"),
    ("edu", "whois.educause.edu"),
    ("gov", "whois.dotgov.gov"),
    ("mil", "whois.nic.mil"),
    ("int", "whois.iana.org"),
    // Country and region TLDs
    ("cn", "whois.cnnic.cn"),
    ("hk", "whois.hkirc.hk"),
    ("tw", "whois.twnic.net.tw"),
    // Popular new TLDs
    ("io", "whois.nic.io"),
    ("ai", "whois.nic.ai"),
    ("me", "whois.nic.me"),
    ("cc", "whois.nic.cc"),
    ("tv", "whois.nic.tv"),
    ("co", "whois.nic.co"),
    ("xyz", "whois.nic.xyz"),
    ("top", "whois.nic.top"),
    ("vip", "whois.nic.vip"),
    ("club", "whois.nic.club"),
    ("shop", "whois.nic.shop"),
    ("site", "whois.nic.site"),
    ("wang", "whois.nic.wang"),
    ("xin", "whois.nic.xin"),
    ("app", "whois.nic.google"),
    ("dev", "whois.nic.google"),
    ("cloud", "whois.nic.cloud"),
    ("online", "whois.nic.online"),
    ("store", "whois.nic.store"),
    // Chinese second-level registrations
    ("com.cn", "whois.cnnic.cn"),
    ("net.cn", "whois.cnnic.cn"),
    ("org.cn", "whois.cnnic.cn"),
    ("gov.cn", "whois.cnnic.cn"),
    // Chinese IDN TLDs
    ("中国", "whois.cnnic.cn"),
    ("公司", "whois.cnnic.cn"),
    ("网络", "whois.cnnic.cn"),
    ("商城", "whois.cnnic.cn"),
    ("网店", "whois.cnnic.cn"),
    ("中文网", "whois.cnnic.cn"),
];

/// Built-in "domain not found" signatures, checked in order.
const BUILTIN_NOT_FOUND_PATTERNS: &[(&str, &[&str])] = &[
    (
        DEFAULT_PATTERN_KEY,
        &[
            "Domain not found",
            "No match for",
            "NOT FOUND",
            "No Data Found",
            "No entries found",
        ],
    ),
    ("cn", &["no matching record", "No matching record"]),
    ("com", &["No match for", "NOT FOUND", "No Data Found"]),
    ("net", &["No match for", "NOT FOUND", "No Data Found"]),
];

/// TLD-keyed WHOIS configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryDirectory {
    whois_servers: HashMap<String, String>,
    not_found_patterns: HashMap<String, Vec<String>>,
}

impl RegistryDirectory {
    /// The built-in directory.
    pub fn builtin() -> Self {
        let whois_servers = BUILTIN_WHOIS_SERVERS
            .iter()
            .map(|(tld, server)| (tld.to_string(), server.to_string()))
            .collect();
        let not_found_patterns = BUILTIN_NOT_FOUND_PATTERNS
            .iter()
            .map(|(tld, patterns)| {
                (
                    tld.to_string(),
                    patterns.iter().map(|p| p.to_string()).collect(),
                )
            })
            .collect();

        Self {
            whois_servers,
            not_found_patterns,
        }
    }

    /// A directory with no entries at all.
    pub fn empty() -> Self {
        Self {
            whois_servers: HashMap::new(),
            not_found_patterns: HashMap::new(),
        }
    }

    /// Add or replace the WHOIS server for a TLD.
    pub fn with_server(mut self, tld: impl Into<String>, server: impl Into<String>) -> Self {
        self.whois_servers.insert(tld.into(), server.into());
        self
    }

    /// Add or replace the not-found patterns for a TLD (or `"default"`).
    pub fn with_patterns<I, S>(mut self, tld: impl Into<String>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.not_found_patterns
            .insert(tld.into(), patterns.into_iter().map(Into::into).collect());
        self
    }

    /// Overlay user supplied tables. Entries replace built-in ones per key.
    pub fn with_overrides(
        mut self,
        servers: &HashMap<String, String>,
        patterns: &HashMap<String, Vec<String>>,
    ) -> Self {
        for (tld, server) in servers {
            self.whois_servers
                .insert(tld.to_lowercase(), server.trim().to_string());
        }
        for (tld, list) in patterns {
            self.not_found_patterns
                .insert(tld.to_lowercase(), list.clone());
        }
        self
    }

    /// Whether `tld` has an explicit WHOIS server entry.
    pub fn contains_tld(&self, tld: &str) -> bool {
        self.whois_servers.contains_key(tld)
    }

    /// WHOIS server for `tld`, falling back to [`DEFAULT_WHOIS_SERVER`].
    pub fn whois_server(&self, tld: &str) -> &str {
        self.whois_servers
            .get(tld)
            .map(String::as_str)
            .filter(|server| !server.is_empty())
            .unwrap_or(DEFAULT_WHOIS_SERVER)
    }

    /// Not-found patterns for `tld`, or the default set if it has none.
    pub fn not_found_patterns(&self, tld: &str) -> &[String] {
        match self.not_found_patterns.get(tld) {
            Some(patterns) if !patterns.is_empty() => patterns,
            _ => self
                .not_found_patterns
                .get(DEFAULT_PATTERN_KEY)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
        }
    }

    /// First configured pattern for `tld` that occurs in `response`.
    ///
    /// Matching is case-sensitive and follows the configured order.
    pub fn match_not_found<'a>(&'a self, tld: &str, response: &str) -> Option<&'a str> {
        self.not_found_patterns(tld)
            .iter()
            .find(|pattern| response.contains(pattern.as_str()))
            .map(String::as_str)
    }

    /// All TLDs with a WHOIS server entry, sorted.
    pub fn known_tlds(&self) -> Vec<String> {
        let mut tlds: Vec<String> = self.whois_servers.keys().cloned().collect();
        tlds.sort();
        tlds
    }
}

impl Default for RegistryDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_contains_common_tlds() {
        let dir = RegistryDirectory::builtin();
        for tld in ["com", "net", "org", "io", "ai", "dev", "com.cn", "中国"] {
            assert!(dir.contains_tld(tld), "missing TLD: {}", tld);
        }
        assert!(!dir.contains_tld("nonexistenttld"));
    }

    #[test]
    fn test_whois_server_lookup_and_default() {
        let dir = RegistryDirectory::builtin();
        assert_eq!(dir.whois_server("com"), "whois.verisign-grs.com");
        assert_eq!(dir.whois_server("app"), "whois.nic.google");
        assert_eq!(dir.whois_server("unknown"), DEFAULT_WHOIS_SERVER);

        let dir = RegistryDirectory::empty().with_server("zz", "");
        assert_eq!(dir.whois_server("zz"), DEFAULT_WHOIS_SERVER);
    }

    #[test]
    fn test_pattern_set_falls_back_to_default() {
        let dir = RegistryDirectory::builtin();
        assert_eq!(dir.not_found_patterns("com").len(), 3);
        assert_eq!(
            dir.not_found_patterns("io").first().map(String::as_str),
            Some("Domain not found")
        );

        let dir = dir.with_patterns("io", Vec::<String>::new());
        assert_eq!(dir.not_found_patterns("io").len(), 5);
    }

    #[test]
    fn test_match_is_case_sensitive_and_ordered() {
        let dir = RegistryDirectory::builtin();

        assert_eq!(
            dir.match_not_found("cn", "no matching record."),
            Some("no matching record")
        );
        assert_eq!(dir.match_not_found("com", "no match for \"X.COM\""), None);
        assert_eq!(
            dir.match_not_found("com", "NOT FOUND\nNo match for \"X.COM\""),
            Some("No match for")
        );
    }

    #[test]
    fn test_overrides_replace_per_key() {
        let mut servers = HashMap::new();
        servers.insert("IO".to_string(), " 127.0.0.1 ".to_string());
        let mut patterns = HashMap::new();
        patterns.insert("io".to_string(), vec!["is available".to_string()]);

        let dir = RegistryDirectory::builtin().with_overrides(&servers, &patterns);
        assert_eq!(dir.whois_server("io"), "127.0.0.1");
        assert_eq!(dir.not_found_patterns("io"), ["is available".to_string()]);
        assert_eq!(dir.whois_server("com"), "whois.verisign-grs.com");
    }

    #[test]
    fn test_known_tlds_sorted() {
        let tlds = RegistryDirectory::builtin().known_tlds();
        let mut sorted = tlds.clone();
        sorted.sort();
        assert_eq!(tlds, sorted);
        assert_eq!(tlds.len(), BUILTIN_WHOIS_SERVERS.len());
    }
}
