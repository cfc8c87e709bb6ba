//! Fluent assertion builders for collections and dictionaries.
//!
//! These matchers are thin delegation over the equivalency engine and basic
//! enumeration: membership checks probe elements through a default
//! validator session.

use crate::engine::{EquivalencyContext, EquivalencyOptions, EquivalencyValidator};
use crate::graph::{render, NodeRef};

use super::builder::AssertionResult;
use super::matchers::pattern_matches;

/// Whether two values are structurally equivalent under default options.
fn is_equivalent(subject: &NodeRef, expectation: &NodeRef) -> bool {
    let context = EquivalencyContext::root(subject.clone(), expectation.clone());
    EquivalencyValidator::new(EquivalencyOptions::new())
        .assert_equality(&context)
        .map(|report| report.passed())
        .unwrap_or(false)
}

/// Builder for assertions on a collection's elements.
///
/// `to_hold()` evaluates immediately and panics on failure. Use
/// `evaluate()` for non-panicking evaluation.
pub struct CollectionAssertion {
    subject: NodeRef,
    expected_count: Option<usize>,
    min_count: Option<usize>,
    max_count: Option<usize>,
    contains: Vec<NodeRef>,
    not_contains: Vec<NodeRef>,
    only: Vec<(String, Box<dyn Fn(&NodeRef) -> bool>)>,
}

impl CollectionAssertion {
    /// Create a new collection assertion.
    pub fn new(subject: NodeRef) -> Self {
        Self {
            subject,
            expected_count: None,
            min_count: None,
            max_count: None,
            contains: Vec::new(),
            not_contains: Vec::new(),
            only: Vec::new(),
        }
    }

    // =========================================================================
    // Builder methods (chainable)
    // =========================================================================

    /// Assert the collection has exactly N elements.
    pub fn have_count(mut self, n: usize) -> Self {
        self.expected_count = Some(n);
        self
    }

    /// Assert the collection has at least N elements.
    pub fn at_least(mut self, n: usize) -> Self {
        self.min_count = Some(n);
        self
    }

    /// Assert the collection has at most N elements.
    pub fn at_most(mut self, n: usize) -> Self {
        self.max_count = Some(n);
        self
    }

    /// Assert some element is equivalent to the given value.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .collection()
    ///     .contain(&Node::int(2))
    ///     .to_hold();
    /// ```
    pub fn contain(mut self, item: &NodeRef) -> Self {
        self.contains.push(item.clone());
        self
    }

    /// Assert no element is equivalent to the given value.
    pub fn not_contain(mut self, item: &NodeRef) -> Self {
        self.not_contains.push(item.clone());
        self
    }

    /// Assert every element satisfies the labeled predicate.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .collection()
    ///     .only_contain("positive", |n| {
    ///         n.borrow().as_scalar().is_some_and(|s| matches!(s, Scalar::Int(i) if *i > 0))
    ///     })
    ///     .to_hold();
    /// ```
    pub fn only_contain(
        mut self,
        label: impl Into<String>,
        predicate: impl Fn(&NodeRef) -> bool + 'static,
    ) -> Self {
        self.only.push((label.into(), Box::new(predicate)));
        self
    }

    // =========================================================================
    // Assertion methods (panic on failure)
    // =========================================================================

    /// Assert all constraints hold.
    ///
    /// # Panics
    ///
    /// Panics with a detailed error message if any constraint fails.
    pub fn to_hold(&self) {
        let result = self.evaluate();
        if !result.passed {
            let reason = result.reason.as_deref().unwrap_or("unknown reason");
            panic!(
                "assertion failed: expected {}\n\n  reason: {}\n  subject: {}\n",
                result.description,
                reason,
                render(&self.subject)
            );
        }
    }

    // =========================================================================
    // Non-panicking evaluation
    // =========================================================================

    /// Evaluate all constraints without panicking.
    pub fn evaluate(&self) -> AssertionResult {
        let mut failures: Vec<String> = Vec::new();

        let items = self.subject.borrow().items().map(|items| items.to_vec());
        match items {
            None => {
                failures.push(format!(
                    "subject is not a collection (found {})",
                    self.subject.borrow().kind()
                ));
            }
            Some(items) => {
                let count = items.len();

                if let Some(expected) = self.expected_count {
                    if count != expected {
                        failures.push(format!("expected {} item(s), found {}", expected, count));
                    }
                }
                if let Some(min) = self.min_count {
                    if count < min {
                        failures.push(format!("expected at least {} item(s), found {}", min, count));
                    }
                }
                if let Some(max) = self.max_count {
                    if count > max {
                        failures.push(format!("expected at most {} item(s), found {}", max, count));
                    }
                }

                for expected in &self.contains {
                    if !items.iter().any(|item| is_equivalent(item, expected)) {
                        failures.push(format!(
                            "expected collection to contain {}",
                            render(expected)
                        ));
                    }
                }
                for rejected in &self.not_contains {
                    if items.iter().any(|item| is_equivalent(item, rejected)) {
                        failures.push(format!(
                            "expected collection not to contain {}",
                            render(rejected)
                        ));
                    }
                }

                for (label, predicate) in &self.only {
                    for (index, item) in items.iter().enumerate() {
                        if !predicate(item) {
                            failures.push(format!(
                                "expected only '{}' items, but item {} is {}",
                                label,
                                index,
                                render(item)
                            ));
                            break;
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
        let mut parts = vec!["collection".to_string()];

        if let Some(n) = self.expected_count {
            parts.push(format!("has {} item(s)", n));
        }
        if let Some(n) = self.min_count {
            parts.push(format!("has at least {} item(s)", n));
        }
        if let Some(n) = self.max_count {
            parts.push(format!("has at most {} item(s)", n));
        }
        for item in &self.contains {
            parts.push(format!("contains {}", render(item)));
        }
        for item in &self.not_contains {
            parts.push(format!("does not contain {}", render(item)));
        }
        for (label, _) in &self.only {
            parts.push(format!("only contains '{}' items", label));
        }

        parts.join(", ")
    }
}

/// Builder for assertions on a dictionary's keys and entries.
///
/// `to_hold()` evaluates immediately and panics on failure. Use
/// `evaluate()` for non-panicking evaluation.
pub struct DictionaryAssertion {
    subject: NodeRef,
    expected_count: Option<usize>,
    contain_keys: Vec<String>,
    not_contain_keys: Vec<String>,
    key_patterns: Vec<String>,
    entries: Vec<(String, NodeRef)>,
}

impl DictionaryAssertion {
    /// Create a new dictionary assertion.
    pub fn new(subject: NodeRef) -> Self {
        Self {
            subject,
            expected_count: None,
            contain_keys: Vec::new(),
            not_contain_keys: Vec::new(),
            key_patterns: Vec::new(),
            entries: Vec::new(),
        }
    }

    // =========================================================================
    // Builder methods (chainable)
    // =========================================================================

    /// Assert the dictionary has exactly N entries.
    pub fn have_count(mut self, n: usize) -> Self {
        self.expected_count = Some(n);
        self
    }

    /// Assert the dictionary contains the given key.
    pub fn contain_key(mut self, key: impl Into<String>) -> Self {
        self.contain_keys.push(key.into());
        self
    }

    /// Assert the dictionary does not contain the given key.
    pub fn not_contain_key(mut self, key: impl Into<String>) -> Self {
        self.not_contain_keys.push(key.into());
        self
    }

    /// Assert some key matches the pattern (glob, regex, or exact).
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .dictionary()
    ///     .contain_key_matching("user_*")
    ///     .to_hold();
    /// ```
    pub fn contain_key_matching(mut self, pattern: impl Into<String>) -> Self {
        self.key_patterns.push(pattern.into());
        self
    }

    /// Assert the dictionary contains the key with an equivalent value.
    pub fn contain_entry(mut self, key: impl Into<String>, value: &NodeRef) -> Self {
        self.entries.push((key.into(), value.clone()));
        self
    }

    // =========================================================================
    // Assertion methods (panic on failure)
    // =========================================================================

    /// Assert all constraints hold.
    ///
    /// # Panics
    ///
    /// Panics with a detailed error message if any constraint fails.
    pub fn to_hold(&self) {
        let result = self.evaluate();
        if !result.passed {
            let reason = result.reason.as_deref().unwrap_or("unknown reason");
            panic!(
                "assertion failed: expected {}\n\n  reason: {}\n  subject: {}\n",
                result.description,
                reason,
                render(&self.subject)
            );
        }
    }

    // =========================================================================
    // Non-panicking evaluation
    // =========================================================================

    /// Evaluate all constraints without panicking.
    pub fn evaluate(&self) -> AssertionResult {
        let mut failures: Vec<String> = Vec::new();

        let entries = self.subject.borrow().entries().map(|entries| entries.to_vec());
        match entries {
            None => {
                failures.push(format!(
                    "subject is not a dictionary (found {})",
                    self.subject.borrow().kind()
                ));
            }
            Some(entries) => {
                if let Some(expected) = self.expected_count {
                    if entries.len() != expected {
                        failures.push(format!(
                            "expected {} item(s), found {}",
                            expected,
                            entries.len()
                        ));
                    }
                }

                for key in &self.contain_keys {
                    if !entries.iter().any(|(k, _)| k == key) {
                        failures.push(format!("expected dictionary to contain key \"{}\"", key));
                    }
                }
                for key in &self.not_contain_keys {
                    if entries.iter().any(|(k, _)| k == key) {
                        failures.push(format!(
                            "expected dictionary not to contain key \"{}\"",
                            key
                        ));
                    }
                }
                for pattern in &self.key_patterns {
                    if !entries.iter().any(|(k, _)| pattern_matches(pattern, k)) {
                        failures.push(format!("no key matching '{}' was found", pattern));
                    }
                }

                for (key, expected_value) in &self.entries {
                    match entries.iter().find(|(k, _)| k == key) {
                        None => {
                            failures.push(format!(
                                "expected dictionary to contain key \"{}\"",
                                key
                            ));
                        }
                        Some((_, actual_value)) => {
                            if !is_equivalent(actual_value, expected_value) {
                                failures.push(format!(
                                    "expected entry \"{}\" to be {}, but found {}",
                                    key,
                                    render(expected_value),
                                    render(actual_value)
                                ));
                            }
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
        let mut parts = vec!["dictionary".to_string()];

        if let Some(n) = self.expected_count {
            parts.push(format!("has {} item(s)", n));
        }
        for key in &self.contain_keys {
            parts.push(format!("contains key \"{}\"", key));
        }
        for key in &self.not_contain_keys {
            parts.push(format!("does not contain key \"{}\"", key));
        }
        for pattern in &self.key_patterns {
            parts.push(format!("contains key matching '{}'", pattern));
        }
        for (key, value) in &self.entries {
            parts.push(format!("contains entry \"{}\" = {}", key, render(value)));
        }

        parts.join(", ")
    }
}
