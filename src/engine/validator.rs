//! The equivalency validator: drives one comparison session to completion.
//!
//! The validator owns the session's options and pipeline, enforces the
//! depth and cycle guards, and dispatches each node to the first applicable
//! step. Mismatches accumulate in the reporting scope; only configuration
//! errors (no step claims a node) surface as `Err`.

use super::context::EquivalencyContext;
use super::options::{CyclicReferencePolicy, EquivalencyOptions};
use super::pipeline::{default_pipeline, StepPipeline};
use super::scope::{EquivalencyReport, ValidationScope};
use super::tracker::ObjectReference;

/// Hard ceiling on recursion depth, measured in path separators.
///
/// A safety net for structures cycle detection cannot catch: non-cyclic but
/// very deep graphs fail deterministically instead of overflowing the stack.
pub const MAX_RECURSION_DEPTH: usize = 10;

/// Error type for broken comparison setups. Never raised for an ordinary
/// mismatch; those accumulate in the report.
#[derive(Debug, thiserror::Error)]
pub enum EquivalencyError {
    #[error("no equivalency step was found for '{path}'; the step pipeline is misconfigured")]
    NoApplicableStep { path: String },
}

/// Orchestrates one comparison session.
#[derive(Debug)]
pub struct EquivalencyValidator {
    pipeline: StepPipeline,
    options: EquivalencyOptions,
}

impl EquivalencyValidator {
    /// Create a validator running the process-wide default pipeline.
    pub fn new(options: EquivalencyOptions) -> Self {
        Self {
            pipeline: default_pipeline().clone(),
            options,
        }
    }

    /// Create a validator running an explicit pipeline.
    pub fn with_pipeline(options: EquivalencyOptions, pipeline: StepPipeline) -> Self {
        Self { pipeline, options }
    }

    /// The options this session runs under.
    pub fn options(&self) -> &EquivalencyOptions {
        &self.options
    }

    /// Entry point for a top-level comparison: opens a fresh reporting
    /// scope (with its own cycle tracker), runs the recursion, and returns
    /// the aggregated report.
    pub fn assert_equality(
        &self,
        context: &EquivalencyContext,
    ) -> Result<EquivalencyReport, EquivalencyError> {
        let mut scope = ValidationScope::new(self.options.describe());
        scope.set_reason(context.reason.clone());
        self.assert_equality_using(context, &mut scope)?;
        Ok(scope.into_report())
    }

    /// The recursive core. Steps call back into this for nested values.
    pub fn assert_equality_using(
        &self,
        context: &EquivalencyContext,
        scope: &mut ValidationScope,
    ) -> Result<(), EquivalencyError> {
        if !self.options.allow_infinite_recursion && context.depth() >= MAX_RECURSION_DEPTH {
            scope.fail_at(
                context.label(),
                format!(
                    "maximum recursion depth of {} reached at '{}'",
                    MAX_RECURSION_DEPTH,
                    context.label()
                ),
            );
            return Ok(());
        }

        if context.subject.borrow().kind().can_recurse() {
            let reference = ObjectReference::new(&context.subject, &context.path);
            if scope.tracker_mut().is_cyclic_reference(reference) {
                if self.options.cyclic_references == CyclicReferencePolicy::Report {
                    scope.fail_at(
                        context.label(),
                        format!("cyclic reference detected at '{}'", context.label()),
                    );
                }
                return Ok(());
            }
        }

        scope.set_current(context);

        for step in self.pipeline.steps() {
            if step.can_handle(context, &self.options)
                && step.handle(context, self, scope, &self.options)?
            {
                return Ok(());
            }
        }

        Err(EquivalencyError::NoApplicableStep {
            path: context.label().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composite;
    use crate::engine::pipeline::StepPipeline;
    use crate::engine::steps::{DictionaryStep, EquivalencyStep, StructuralStep};
    use crate::graph::Node;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn compare(
        subject: &serde_json::Value,
        expectation: &serde_json::Value,
    ) -> EquivalencyReport {
        let context =
            EquivalencyContext::root(Node::from_json(subject), Node::from_json(expectation));
        EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap()
    }

    /// Builds an 11-level chain of nested composites ending in a scalar.
    fn deep_chain() -> crate::graph::NodeRef {
        let mut node = Node::int(1);
        for level in (0..11).rev() {
            node = composite! {format!("m{}", level) => node};
        }
        node
    }

    #[test]
    fn test_equal_graphs_pass() {
        let value = json!({"name": "amy", "orders": [{"id": 1}, {"id": 2}]});
        assert!(compare(&value, &value).passed());
    }

    #[test]
    fn test_mismatch_accumulates_all_failures() {
        let report = compare(
            &json!({"a": 1, "b": 2, "c": 3}),
            &json!({"a": 9, "b": 8, "c": 3}),
        );
        assert!(!report.passed());
        assert_eq!(report.failures.len(), 2);
    }

    #[test]
    fn test_depth_guard_names_path() {
        let context = EquivalencyContext::root(deep_chain(), deep_chain());
        let report = EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap();
        assert!(!report.passed());
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0]
            .message
            .contains("maximum recursion depth of 10"));
        assert!(report.failures[0].message.contains("m0.m1.m2"));
    }

    #[test]
    fn test_depth_guard_lifted_by_option() {
        let context = EquivalencyContext::root(deep_chain(), deep_chain());
        let report =
            EquivalencyValidator::new(EquivalencyOptions::new().allow_infinite_recursion())
                .assert_equality(&context)
                .unwrap();
        assert!(report.passed());
    }

    #[test]
    fn test_cyclic_graph_terminates_and_passes() {
        // a -> b -> a on both sides, same shape and values.
        let make = || {
            let a = composite! {"name" => Node::string("a")};
            let b = composite! {"name" => Node::string("b"), "parent" => a.clone()};
            a.borrow_mut().add_member("child", b);
            a
        };
        let context = EquivalencyContext::root(make(), make());
        let report = EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap();
        assert!(report.passed(), "{}", report.summary());
    }

    #[test]
    fn test_cyclic_reference_report_policy() {
        let make = || {
            let a = composite! {"name" => Node::string("a")};
            let b = composite! {"parent" => a.clone()};
            a.borrow_mut().add_member("child", b);
            a
        };
        let options =
            EquivalencyOptions::new().on_cyclic_reference(CyclicReferencePolicy::Report);
        let context = EquivalencyContext::root(make(), make());
        let report = EquivalencyValidator::new(options)
            .assert_equality(&context)
            .unwrap();
        assert!(!report.passed());
        assert!(report.failures[0].message.contains("cyclic reference"));
    }

    #[test]
    fn test_shared_subtree_verified_once() {
        // The same instance reached via two paths: the second visit is
        // skipped, so a mismatch hidden behind it goes unreported.
        let shared = composite! {"v" => Node::int(1)};
        let subject = composite! {"left" => shared.clone(), "right" => shared};
        let expectation = composite! {
            "left" => composite! {"v" => Node::int(1)},
            "right" => composite! {"v" => Node::int(2)},
        };
        let context = EquivalencyContext::root(subject, expectation);
        let report = EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap();
        assert!(report.passed());
    }

    /// Step stub that counts invocations and claims every node.
    struct CountingStep {
        calls: Arc<AtomicUsize>,
    }

    impl EquivalencyStep for CountingStep {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn can_handle(&self, _: &EquivalencyContext, _: &EquivalencyOptions) -> bool {
            true
        }

        fn handle(
            &self,
            _: &EquivalencyContext,
            _: &EquivalencyValidator,
            _: &mut ValidationScope,
            _: &EquivalencyOptions,
        ) -> Result<bool, EquivalencyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    #[test]
    fn test_first_applicable_step_wins() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let pipeline = StepPipeline::empty()
            .append(Arc::new(CountingStep {
                calls: first.clone(),
            }))
            .append(Arc::new(CountingStep {
                calls: second.clone(),
            }));

        let context = EquivalencyContext::root(Node::int(1), Node::int(1));
        let validator =
            EquivalencyValidator::with_pipeline(EquivalencyOptions::new(), pipeline);
        validator.assert_equality(&context).unwrap();

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_applicable_step_is_fatal() {
        // Only the dictionary step remains; a scalar node has no handler.
        let pipeline = StepPipeline::empty().append(Arc::new(DictionaryStep));
        let validator =
            EquivalencyValidator::with_pipeline(EquivalencyOptions::new(), pipeline);
        let context = EquivalencyContext::root(Node::int(1), Node::int(1));

        let error = validator.assert_equality(&context).unwrap_err();
        assert!(matches!(error, EquivalencyError::NoApplicableStep { .. }));
        assert!(error.to_string().contains("no equivalency step"));
    }

    /// Step stub that claims applicability but declines in `handle`.
    struct DecliningStep;

    impl EquivalencyStep for DecliningStep {
        fn name(&self) -> &'static str {
            "declining"
        }

        fn can_handle(&self, _: &EquivalencyContext, _: &EquivalencyOptions) -> bool {
            true
        }

        fn handle(
            &self,
            _: &EquivalencyContext,
            _: &EquivalencyValidator,
            _: &mut ValidationScope,
            _: &EquivalencyOptions,
        ) -> Result<bool, EquivalencyError> {
            Ok(false)
        }
    }

    #[test]
    fn test_declining_step_falls_through() {
        // A step may return false from handle; later steps then get the node.
        let pipeline = StepPipeline::empty()
            .append(Arc::new(DecliningStep))
            .append(Arc::new(StructuralStep));
        let validator =
            EquivalencyValidator::with_pipeline(EquivalencyOptions::new(), pipeline);
        let context = EquivalencyContext::root(
            Node::from_json(&json!({"a": 1})),
            Node::from_json(&json!({"a": 2})),
        );
        let report = validator.assert_equality(&context).unwrap();
        assert!(!report.passed());
    }

    #[test]
    fn test_report_carries_description_and_reason() {
        let context = EquivalencyContext::root(Node::int(1), Node::int(1))
            .with_reason("caches must agree");
        let report = EquivalencyValidator::new(EquivalencyOptions::new())
            .assert_equality(&context)
            .unwrap();
        assert!(report.description.contains("recursive"));
        assert_eq!(report.reason.as_deref(), Some("caches must agree"));
    }
}
