//! Pattern matching utilities for value assertions.
//!
//! This module provides utilities for matching expected patterns against
//! string values and dictionary keys, supporting glob patterns, regex, and
//! exact matches.

use glob::Pattern;
use regex::Regex;

use crate::graph::Scalar;

/// Match a pattern against an actual string.
///
/// Supports three matching modes (tried in order):
/// 1. **Glob patterns**: e.g., `user_*`, `**/config.json`
/// 2. **Regex**: e.g., `^order-\d+$`
/// 3. **Exact match**: literal string comparison
///
/// # Example
///
/// ```rust
/// use likeness::pattern_matches;
///
/// assert!(pattern_matches("user_*", "user_42"));
/// assert!(pattern_matches(r"^v\d+$", "v3"));
/// assert!(!pattern_matches("user_*", "admin"));
/// ```
pub fn pattern_matches(pattern: &str, actual: &str) -> bool {
    // Try glob pattern first
    if let Ok(glob) = Pattern::new(pattern) {
        if glob.matches(actual) {
            return true;
        }
    }

    // Try regex
    if let Ok(re) = Regex::new(pattern) {
        if re.is_match(actual) {
            return true;
        }
    }

    // Exact match fallback
    pattern == actual
}

/// Match a pattern against a scalar value.
///
/// Strings match on their content; other scalars match on their rendered
/// form (so `"42"` matches the integer 42).
pub fn scalar_matches(pattern: &str, scalar: &Scalar) -> bool {
    match scalar {
        Scalar::Str(s) => pattern_matches(pattern, s),
        other => pattern_matches(pattern, &other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_matching() {
        assert!(pattern_matches("*.env", ".env"));
        assert!(pattern_matches("*.env", "test.env"));
        assert!(!pattern_matches("*.env", "test.txt"));
    }

    #[test]
    fn test_glob_path_matching() {
        assert!(pattern_matches("**/config.json", "src/config.json"));
        assert!(pattern_matches("**/config.json", "config.json"));
    }

    #[test]
    fn test_regex_matching() {
        assert!(pattern_matches(r"^npm (install|i)$", "npm install"));
        assert!(pattern_matches(r"^npm (install|i)$", "npm i"));
        assert!(!pattern_matches(r"^npm (install|i)$", "npm run"));
    }

    #[test]
    fn test_exact_matching() {
        assert!(pattern_matches("/tmp/test.txt", "/tmp/test.txt"));
        assert!(!pattern_matches("/tmp/test.txt", "/tmp/other.txt"));
    }

    #[test]
    fn test_scalar_matching() {
        assert!(scalar_matches("amy", &Scalar::Str("amy".to_string())));
        assert!(scalar_matches("42", &Scalar::Int(42)));
        assert!(scalar_matches("true", &Scalar::Bool(true)));
        assert!(!scalar_matches("43", &Scalar::Int(42)));
    }
}
