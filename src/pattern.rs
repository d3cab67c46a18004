//! Hostname pattern matching for project records

use regex::Regex;

/// Check whether a hostname matches a project's URL pattern.
///
/// Algorithm:
/// 1. Escape every literal "." in the pattern
/// 2. Replace every "*" with a one-or-more-non-dot token
/// 3. Anchor at both ends and compare case-insensitively
///
/// So "*" stays within a single hostname label:
/// - "*.example.com" matches "sub.example.com" but not "example.com"
/// - "example.com" matches exactly "example.com"
///
/// A pattern that does not compile to a valid expression matches nothing.
pub fn matches_pattern(hostname: &str, pattern: &str) -> bool {
    let expression = pattern.replace('.', "\\.").replace('*', "[^.]+");

    match Regex::new(&format!("(?i)^{expression}$")) {
        Ok(regex) => regex.is_match(hostname),
        Err(_) => false,
    }
}
