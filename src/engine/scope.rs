//! Reporting scope for one comparison session.
//!
//! The validator writes three pieces of ambient context per node: a human
//! label ("subject" at the root, the path otherwise), the subject value,
//! and the expectation value. Steps record mismatches against that
//! ambient state. Failures accumulate here and surface together when the
//! top-level call ends; nothing is thrown for an ordinary mismatch.

use serde::Serialize;

use super::context::EquivalencyContext;
use super::tracker::ObjectTracker;
use crate::graph::{render, NodeRef};

/// One recorded mismatch.
#[derive(Debug, Clone, Serialize)]
pub struct Failure {
    /// Label of the failing node ("subject" at the root, the path otherwise).
    pub path: String,
    /// What went wrong.
    pub message: String,
    /// Rendered subject value at the failing node, when ambient state was set.
    pub subject: Option<String>,
    /// Rendered expectation value at the failing node.
    pub expectation: Option<String>,
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Aggregated outcome of a comparison session.
#[derive(Debug, Clone, Serialize)]
pub struct EquivalencyReport {
    /// Description of the configuration the session ran under.
    pub description: String,
    /// Diagnostic reason text carried from the top-level call.
    pub reason: Option<String>,
    /// All mismatches found, in discovery order.
    pub failures: Vec<Failure>,
}

impl EquivalencyReport {
    /// Whether the comparison found no mismatches.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    /// One line per failure, for error messages.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
struct CurrentNode {
    label: String,
    subject: NodeRef,
    expectation: NodeRef,
}

/// Mutable per-session state: configuration description, the cycle tracker,
/// the ambient current node, and accumulated failures.
#[derive(Debug)]
pub struct ValidationScope {
    description: String,
    reason: Option<String>,
    tracker: ObjectTracker,
    current: Option<CurrentNode>,
    failures: Vec<Failure>,
}

impl ValidationScope {
    /// Open a scope carrying the configuration description.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            reason: None,
            tracker: ObjectTracker::new(),
            current: None,
            failures: Vec::new(),
        }
    }

    /// Carry the top-level reason text into the final report.
    pub fn set_reason(&mut self, reason: Option<String>) {
        self.reason = reason;
    }

    /// The session's cycle tracker.
    pub fn tracker_mut(&mut self) -> &mut ObjectTracker {
        &mut self.tracker
    }

    /// Record the node currently being handled, so that steps and
    /// formatting can reference it without threading it explicitly.
    pub fn set_current(&mut self, context: &EquivalencyContext) {
        self.current = Some(CurrentNode {
            label: context.label().to_string(),
            subject: context.subject.clone(),
            expectation: context.expectation.clone(),
        });
    }

    /// Record a mismatch against the current node.
    pub fn fail(&mut self, message: impl Into<String>) {
        let (path, subject, expectation) = match &self.current {
            Some(current) => (
                current.label.clone(),
                Some(render(&current.subject)),
                Some(render(&current.expectation)),
            ),
            None => ("subject".to_string(), None, None),
        };
        self.failures.push(Failure {
            path,
            message: message.into(),
            subject,
            expectation,
        });
    }

    /// Record a mismatch at an explicit path, e.g. for a child that was
    /// checked shallowly without entering its own context.
    pub fn fail_at(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.failures.push(Failure {
            path: path.into(),
            message: message.into(),
            subject: None,
            expectation: None,
        });
    }

    /// Whether any mismatch has been recorded.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of mismatches recorded so far.
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Close the session and produce the aggregated report.
    pub fn into_report(self) -> EquivalencyReport {
        EquivalencyReport {
            description: self.description,
            reason: self.reason,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    #[test]
    fn test_fail_uses_current_node() {
        let mut scope = ValidationScope::new("recursive");
        let context = EquivalencyContext::root(Node::int(1), Node::int(2));
        scope.set_current(&context);
        scope.fail("expected 2, but found 1");

        let report = scope.into_report();
        assert!(!report.passed());
        assert_eq!(report.failures[0].path, "subject");
        assert_eq!(report.failures[0].subject.as_deref(), Some("1"));
        assert_eq!(report.failures[0].expectation.as_deref(), Some("2"));
    }

    #[test]
    fn test_fail_at_explicit_path() {
        let mut scope = ValidationScope::new("recursive");
        scope.fail_at("orders[0].total", "expected 3, but found 4");
        assert!(scope.has_failures());
        assert_eq!(scope.failure_count(), 1);

        let report = scope.into_report();
        assert_eq!(report.failures[0].path, "orders[0].total");
        assert!(report.failures[0].subject.is_none());
    }

    #[test]
    fn test_failures_accumulate() {
        let mut scope = ValidationScope::new("recursive");
        scope.fail_at("a", "first");
        scope.fail_at("b", "second");
        let report = scope.into_report();
        assert_eq!(report.failures.len(), 2);
        assert!(report.summary().contains("a: first"));
        assert!(report.summary().contains("b: second"));
    }

    #[test]
    fn test_empty_report_passes() {
        let scope = ValidationScope::new("recursive");
        let report = scope.into_report();
        assert!(report.passed());
        assert_eq!(report.summary(), "");
    }

    #[test]
    fn test_report_serializes() {
        let mut scope = ValidationScope::new("recursive, max depth 10");
        scope.fail_at("a", "mismatch");
        let report = scope.into_report();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"failures\""));
        assert!(json.contains("mismatch"));
    }
}
