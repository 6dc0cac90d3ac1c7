//! TLD resolution against a [`RegistryDirectory`].
//!
//! Precedence: a Han-script label decides alone, then the last two labels as
//! a compound suffix, then the last label. An empty string means unsupported.

use crate::protocols::registry::RegistryDirectory;

/// Code point ranges of the Han script.
const HAN_RANGES: &[(u32, u32)] = &[
    (0x2E80, 0x2E99),
    (0x2E9B, 0x2EF3),
    (0x2F00, 0x2FD5),
    (0x3005, 0x3005),
    (0x3007, 0x3007),
    (0x3021, 0x3029),
    (0x3038, 0x303B),
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xF900, 0xFA6D),
    (0xFA70, 0xFAD9),
    (0x16FE2, 0x16FE3),
    (0x16FF0, 0x16FF1),
    (0x20000, 0x2A6DF),
    (0x2A700, 0x2B739),
    (0x2B740, 0x2B81D),
    (0x2B820, 0x2CEA1),
    (0x2CEB0, 0x2EBE0),
    (0x2EBF0, 0x2EE5D),
    (0x2F800, 0x2FA1D),
    (0x30000, 0x3134A),
    (0x31350, 0x323AF),
];

/// Whether `c` belongs to the Han script.
pub fn is_han(c: char) -> bool {
    let cp = c as u32;
    HAN_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&cp))
}

/// Whether any character of `label` belongs to the Han script.
pub fn contains_han(label: &str) -> bool {
    label.chars().any(is_han)
}

/// Resolve the directory key for `domain`, or an empty string if unsupported.
pub fn resolve_tld(directory: &RegistryDirectory, domain: &str) -> String {
    let lowered = domain.to_lowercase();
    let labels: Vec<&str> = lowered.split('.').collect();

    // An IDN label takes absolute precedence once detected
    if let Some(idn) = labels.iter().find(|label| contains_han(label)) {
        return if directory.contains_tld(idn) {
            idn.to_string()
        } else {
            String::new()
        };
    }

    if labels.len() >= 3 {
        let compound = format!("{}.{}", labels[labels.len() - 2], labels[labels.len() - 1]);
        if directory.contains_tld(&compound) {
            return compound;
        }
    }

    match labels.last() {
        Some(last) if directory.contains_tld(last) => last.to_string(),
        _ => String::new(),
    }
}

/// Last dot-separated segment of `domain` as given, used in diagnostics.
pub fn last_label(domain: &str) -> &str {
    domain.rsplit('.').next().unwrap_or(domain)
}
