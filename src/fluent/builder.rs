//! Fluent assertion builder for graph values.
//!
//! This module provides the core builder types for making assertions about
//! values:
//! - `expect()` - Entry point for creating assertions from a graph value
//! - `ValueExpectation` - Holds the subject and creates specific assertions
//! - `EquivalencyAssertion` - Builder for structural equivalency assertions

use crate::engine::{
    EquivalencyContext, EquivalencyError, EquivalencyOptions, EquivalencyReport,
    EquivalencyValidator, StepPipeline,
};
use crate::graph::NodeRef;

use super::collection::{CollectionAssertion, DictionaryAssertion};
use super::string::StringAssertion;

/// Result of evaluating an assertion.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    /// Whether the assertion passed.
    pub passed: bool,
    /// Description of what was asserted.
    pub description: String,
    /// Failure reason if the assertion failed.
    pub reason: Option<String>,
}

impl AssertionResult {
    /// Create a passing assertion result.
    pub(crate) fn pass(description: impl Into<String>) -> Self {
        Self {
            passed: true,
            description: description.into(),
            reason: None,
        }
    }

    /// Create a failing assertion result.
    pub(crate) fn fail(description: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            description: description.into(),
            reason: Some(reason.into()),
        }
    }
}

/// Create an expectation on a graph value.
///
/// This is the entry point for the fluent assertion API.
///
/// # Example
///
/// ```rust
/// use likeness::{expect, Node};
/// use serde_json::json;
///
/// let subject = Node::from_json(&json!({"a": 1}));
/// let expected = Node::from_json(&json!({"a": 1}));
/// expect(&subject).to_be_equivalent_to(&expected);
/// ```
pub fn expect(subject: &NodeRef) -> ValueExpectation {
    ValueExpectation::new(subject.clone())
}

/// Holds the subject value and creates specific assertions.
///
/// This is the starting point for building assertions. Call `.equivalency()`
/// for structural comparison, or `.collection()` / `.dictionary()` /
/// `.string()` for shape-specific matchers.
#[derive(Debug, Clone)]
pub struct ValueExpectation {
    subject: NodeRef,
}

impl ValueExpectation {
    /// Create a new expectation for a subject value.
    pub fn new(subject: NodeRef) -> Self {
        Self { subject }
    }

    /// Create a structural equivalency assertion against an expectation.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .equivalency(&expected)
    ///     .because("both caches were built from the same source")
    ///     .to_pass();
    /// ```
    pub fn equivalency(&self, expectation: &NodeRef) -> EquivalencyAssertion {
        EquivalencyAssertion::new(self.subject.clone(), expectation.clone())
    }

    /// Assert structural equivalency with default options, panicking on
    /// failure.
    ///
    /// # Panics
    ///
    /// Panics if the graphs are not equivalent.
    pub fn to_be_equivalent_to(&self, expectation: &NodeRef) {
        self.equivalency(expectation).to_pass();
    }

    /// Create an assertion over the subject's elements.
    pub fn collection(&self) -> CollectionAssertion {
        CollectionAssertion::new(self.subject.clone())
    }

    /// Create an assertion over the subject's keys and entries.
    pub fn dictionary(&self) -> DictionaryAssertion {
        DictionaryAssertion::new(self.subject.clone())
    }

    /// Create an assertion over the subject as a string scalar.
    pub fn string(&self) -> StringAssertion {
        StringAssertion::new(&self.subject)
    }
}

/// Builder for structural equivalency assertions.
///
/// `to_pass()` evaluates immediately and panics on failure. Use
/// `evaluate()` for non-panicking evaluation, or `report()` for the raw
/// engine report.
#[derive(Debug)]
pub struct EquivalencyAssertion {
    subject: NodeRef,
    expectation: NodeRef,
    options: EquivalencyOptions,
    pipeline: Option<StepPipeline>,
    because: Option<String>,
}

impl EquivalencyAssertion {
    /// Create a new equivalency assertion.
    pub fn new(subject: NodeRef, expectation: NodeRef) -> Self {
        Self {
            subject,
            expectation,
            options: EquivalencyOptions::new(),
            pipeline: None,
            because: None,
        }
    }

    // =========================================================================
    // Builder methods (chainable)
    // =========================================================================

    /// Run the comparison under custom options.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// expect(&subject)
    ///     .equivalency(&expected)
    ///     .with_options(EquivalencyOptions::new().non_recursive())
    ///     .to_pass();
    /// ```
    pub fn with_options(mut self, options: EquivalencyOptions) -> Self {
        self.options = options;
        self
    }

    /// Run the comparison through an explicit step pipeline instead of the
    /// process-wide default.
    pub fn with_pipeline(mut self, pipeline: StepPipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Attach diagnostic reason text, carried into failure messages.
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.because = Some(reason.into());
        self
    }

    // =========================================================================
    // Assertion methods (panic on failure)
    // =========================================================================

    /// Assert the two graphs are equivalent.
    ///
    /// Panics with a detailed error message if the assertion fails, and
    /// with the configuration error if the pipeline is misconfigured.
    ///
    /// # Panics
    ///
    /// Panics if the graphs are not equivalent.
    pub fn to_pass(&self) {
        match self.report() {
            Ok(report) => {
                if !report.passed() {
                    self.panic_with_context(&report);
                }
            }
            Err(error) => panic!("assertion failed: {}", error),
        }
    }

    // =========================================================================
    // Non-panicking evaluation
    // =========================================================================

    /// Evaluate the assertion without panicking.
    ///
    /// Returns an `AssertionResult` that can be inspected.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let result = expect(&subject).equivalency(&expected).evaluate();
    /// if !result.passed {
    ///     println!("Failed: {}", result.reason.unwrap());
    /// }
    /// ```
    pub fn evaluate(&self) -> AssertionResult {
        let description = self.build_description();
        match self.report() {
            Ok(report) => {
                if report.passed() {
                    AssertionResult::pass(description)
                } else {
                    let reason = report
                        .failures
                        .iter()
                        .map(|f| f.to_string())
                        .collect::<Vec<_>>()
                        .join("; ");
                    AssertionResult::fail(description, reason)
                }
            }
            Err(error) => AssertionResult::fail(description, error.to_string()),
        }
    }

    /// Run the comparison and return the raw engine report.
    pub fn report(&self) -> Result<EquivalencyReport, EquivalencyError> {
        let mut context =
            EquivalencyContext::root(self.subject.clone(), self.expectation.clone());
        if let Some(reason) = &self.because {
            context = context.with_reason(reason.clone());
        }
        let validator = match &self.pipeline {
            Some(pipeline) => {
                EquivalencyValidator::with_pipeline(self.options.clone(), pipeline.clone())
            }
            None => EquivalencyValidator::new(self.options.clone()),
        };
        validator.assert_equality(&context)
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    /// Build a human-readable description of what this assertion checks.
    fn build_description(&self) -> String {
        let mut parts = vec!["subject equivalent to expectation".to_string()];

        if !self.options.is_recursive {
            parts.push("shallow".to_string());
        }
        if self.options.allow_infinite_recursion {
            parts.push("unlimited depth".to_string());
        }
        if let Some(reason) = &self.because {
            parts.push(format!("because {}", reason));
        }

        parts.join(", ")
    }

    fn panic_with_context(&self, report: &EquivalencyReport) -> ! {
        let mut output = format!(
            "assertion failed: expected {}\n\n",
            self.build_description()
        );
        output.push_str(&format!("  mismatches ({}):\n", report.failures.len()));
        for failure in &report.failures {
            output.push_str(&format!("    {}\n", failure));
        }
        panic!("{}", output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;
    use serde_json::json;

    #[test]
    fn test_evaluate_passing() {
        let subject = Node::from_json(&json!({"a": 1}));
        let expected = Node::from_json(&json!({"a": 1}));
        let result = expect(&subject).equivalency(&expected).evaluate();
        assert!(result.passed);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_evaluate_failing_includes_path() {
        let subject = Node::from_json(&json!({"a": 1}));
        let expected = Node::from_json(&json!({"a": 2}));
        let result = expect(&subject).equivalency(&expected).evaluate();
        assert!(!result.passed);
        assert!(result.reason.unwrap().contains("[\"a\"]"));
    }

    #[test]
    fn test_description_mentions_because() {
        let subject = Node::int(1);
        let expected = Node::int(1);
        let result = expect(&subject)
            .equivalency(&expected)
            .because("they are the same")
            .evaluate();
        assert!(result.description.contains("because they are the same"));
    }

    #[test]
    fn test_report_carries_reason() {
        let subject = Node::int(1);
        let report = expect(&subject)
            .equivalency(&Node::int(1))
            .because("sanity")
            .report()
            .unwrap();
        assert_eq!(report.reason.as_deref(), Some("sanity"));
    }
}
