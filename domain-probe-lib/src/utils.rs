//! Request validation and domain list helpers.

use crate::error::DomainProbeError;

/// Most domains accepted in one batch request.
pub const MAX_BATCH_SIZE: usize = 50;

/// Longest accepted domain string, in bytes.
pub const MAX_DOMAIN_LENGTH: usize = 255;

/// Validate a batch request before any network activity.
///
/// Rejects an empty list, more than 50 domains, and any empty or
/// over-long domain string. Domains are otherwise passed through untouched.
pub fn validate_batch(domains: &[String]) -> Result<(), DomainProbeError> {
    if domains.is_empty() {
        return Err(DomainProbeError::invalid_request(
            "domains list cannot be empty",
        ));
    }

    if domains.len() > MAX_BATCH_SIZE {
        return Err(DomainProbeError::invalid_request(format!(
            "maximum {} domains allowed per request",
            MAX_BATCH_SIZE
        )));
    }

    for domain in domains {
        validate_domain(domain)?;
    }

    Ok(())
}

/// Validate a single domain string.
pub fn validate_domain(domain: &str) -> Result<(), DomainProbeError> {
    if domain.is_empty() {
        return Err(DomainProbeError::invalid_request(
            "domain name cannot be empty",
        ));
    }

    if domain.len() > MAX_DOMAIN_LENGTH {
        return Err(DomainProbeError::invalid_request(format!(
            "domain name cannot exceed {} characters: {}",
            MAX_DOMAIN_LENGTH, domain
        )));
    }

    Ok(())
}

/// Parse a domain list file: one domain per line, `#` starts a comment.
pub fn parse_domain_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("d{}.com", i)).collect()
    }

    #[test]
    fn test_validate_batch_limits() {
        assert!(validate_batch(&domains(1)).is_ok());
        assert!(validate_batch(&domains(50)).is_ok());

        let err = validate_batch(&[]).unwrap_err();
        assert_eq!(err.to_string(), "domains list cannot be empty");

        let err = validate_batch(&domains(51)).unwrap_err();
        assert_eq!(err.to_string(), "maximum 50 domains allowed per request");
    }

    #[test]
    fn test_validate_batch_domain_lengths() {
        let err = validate_batch(&["ok.com".to_string(), String::new()]).unwrap_err();
        assert_eq!(err.to_string(), "domain name cannot be empty");

        let long = format!("{}.com", "a".repeat(252));
        assert_eq!(long.len(), 256);
        let err = validate_batch(&[long]).unwrap_err();
        assert!(err.to_string().starts_with("domain name cannot exceed 255 characters"));

        let max = format!("{}.com", "a".repeat(251));
        assert!(validate_batch(&[max]).is_ok());
    }

    #[test]
    fn test_validation_does_not_normalize() {
        // Unknown TLDs and odd casing are left for the evaluator
        assert!(validate_batch(&["Example.NONEXISTENTTLD".to_string()]).is_ok());
    }

    #[test]
    fn test_parse_domain_list() {
        let content = "# my list\nexample.com\n\n  test.io  \nfoo.org # trailing comment\n";
        assert_eq!(
            parse_domain_list(content),
            vec!["example.com", "test.io", "foo.org"]
        );
    }
}
