//! Fluent assertion builder for string scalars.
//!
//! This module provides the builder type for making assertions about string
//! values:
//! - `StringAssertion` - Builder for assertions on a string scalar's content

use regex::Regex;

use crate::graph::{NodeRef, Scalar};

use super::builder::AssertionResult;

/// Builder for assertions on a string scalar.
///
/// `to_hold()` evaluates immediately and panics on failure. Use
/// `evaluate()` for non-panicking evaluation.
#[derive(Debug, Clone)]
pub struct StringAssertion {
    value: Option<String>,
    found: String,
    contains: Vec<String>,
    not_contains: Vec<String>,
    matches: Vec<String>,
    not_matches: Vec<String>,
}

impl StringAssertion {
    /// Create a new string assertion over a graph value.
    ///
    /// Subjects that are not string scalars fail every evaluation with a
    /// diagnostic naming the actual kind.
    pub fn new(subject: &NodeRef) -> Self {
        let borrowed = subject.borrow();
        let value = match borrowed.as_scalar() {
            Some(Scalar::Str(s)) => Some(s.clone()),
            _ => None,
        };
        Self {
            value,
            found: borrowed.kind().to_string(),
            contains: Vec::new(),
            not_contains: Vec::new(),
            matches: Vec::new(),
            not_matches: Vec::new(),
        }
    }

    // =========================================================================
    // Builder methods (chainable)
    // =========================================================================

    /// Assert the string contains the given substring.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .string()
    ///     .contains("success")
    ///     .to_hold();
    /// ```
    pub fn contains(mut self, s: &str) -> Self {
        self.contains.push(s.to_string());
        self
    }

    /// Assert the string does NOT contain the given substring.
    pub fn not_contains(mut self, s: &str) -> Self {
        self.not_contains.push(s.to_string());
        self
    }

    /// Assert the string matches the given regex pattern.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .string()
    ///     .matches(r"order-\d+")
    ///     .to_hold();
    /// ```
    pub fn matches(mut self, pattern: &str) -> Self {
        self.matches.push(pattern.to_string());
        self
    }

    /// Assert the string does NOT match the given regex pattern.
    pub fn not_matches(mut self, pattern: &str) -> Self {
        self.not_matches.push(pattern.to_string());
        self
    }

    // =========================================================================
    // Assertion methods (panic on failure)
    // =========================================================================

    /// Assert the subject is a string matching all constraints.
    ///
    /// # Panics
    ///
    /// Panics if the subject is not a string or any constraint fails.
    pub fn to_hold(&self) {
        let result = self.evaluate();
        if !result.passed {
            self.panic_with_context(&result);
        }
    }

    // =========================================================================
    // Non-panicking evaluation
    // =========================================================================

    /// Evaluate all constraints without panicking.
    ///
    /// Returns an `AssertionResult` that can be inspected.
    pub fn evaluate(&self) -> AssertionResult {
        let mut failures: Vec<String> = Vec::new();

        match &self.value {
            None => {
                failures.push(format!("subject is not a string (found {})", self.found));
            }
            Some(value) => {
                for pattern in &self.contains {
                    if !value.contains(pattern) {
                        failures.push(format!("string does not contain '{}'", pattern));
                    }
                }

                for pattern in &self.not_contains {
                    if value.contains(pattern) {
                        failures.push(format!("string contains '{}' but should not", pattern));
                    }
                }

                for pattern in &self.matches {
                    match Regex::new(pattern) {
                        Ok(re) => {
                            if !re.is_match(value) {
                                failures
                                    .push(format!("string does not match pattern '{}'", pattern));
                            }
                        }
                        Err(e) => {
                            failures.push(format!("invalid regex '{}': {}", pattern, e));
                        }
                    }
                }

                for pattern in &self.not_matches {
                    match Regex::new(pattern) {
                        Ok(re) => {
                            if re.is_match(value) {
                                failures.push(format!(
                                    "string matches pattern '{}' but should not",
                                    pattern
                                ));
                            }
                        }
                        Err(e) => {
                            failures.push(format!("invalid regex '{}': {}", pattern, e));
                        }
                    }
                }
            }
        }

        let description = self.build_description();
        if failures.is_empty() {
            AssertionResult::pass(description)
        } else {
            AssertionResult::fail(description, failures.join("; "))
        }
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn build_description(&self) -> String {
        let mut parts = vec!["string".to_string()];

        for s in &self.contains {
            parts.push(format!("contains '{}'", s));
        }
        for s in &self.not_contains {
            parts.push(format!("not contains '{}'", s));
        }
        for s in &self.matches {
            parts.push(format!("matches '{}'", s));
        }
        for s in &self.not_matches {
            parts.push(format!("not matches '{}'", s));
        }

        parts.join(", ")
    }

    fn format_preview(&self) -> String {
        match &self.value {
            Some(s) if s.chars().count() > 100 => {
                let truncated: String = s.chars().take(97).collect();
                format!("\"{}...\"", truncated)
            }
            Some(s) => format!("\"{}\"", s),
            None => format!("({})", self.found),
        }
    }

    fn panic_with_context(&self, result: &AssertionResult) -> ! {
        let reason = result.reason.as_deref().unwrap_or("unknown reason");
        panic!(
            "assertion failed: expected {}\n\n  reason: {}\n  subject: {}\n",
            result.description,
            reason,
            self.format_preview()
        );
    }
}
