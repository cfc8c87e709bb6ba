//! Comparison strategies for the equivalency pipeline.
//!
//! Each step decides whether it applies to a context (`can_handle`) and, if
//! so, performs the comparison (`handle`), recursing through the validator
//! for nested values. A step returning `Ok(true)` fully owns the node;
//! remaining steps are not consulted. Registration order matters: specific
//! steps come before the generic fallback.

use std::rc::Rc;

use super::context::EquivalencyContext;
use super::options::EquivalencyOptions;
use super::scope::ValidationScope;
use super::validator::{EquivalencyError, EquivalencyValidator};
use crate::graph::{render, NodeKind, NodeRef};

/// A pluggable comparison strategy.
///
/// Steps are stateless (or hold only configuration) and shared across
/// sessions, so they must be `Send + Sync`.
pub trait EquivalencyStep: Send + Sync {
    /// Short name for diagnostics and pipeline debugging.
    fn name(&self) -> &'static str;

    /// Whether this step applies to the given context.
    fn can_handle(&self, context: &EquivalencyContext, options: &EquivalencyOptions) -> bool;

    /// Perform the comparison. Returns `Ok(true)` when the node was fully
    /// handled; `Ok(false)` lets the validator consult later steps.
    fn handle(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
    ) -> Result<bool, EquivalencyError>;
}

/// Shallow equality: scalars by value, anything else by reference identity.
fn shallow_eq(a: &NodeRef, b: &NodeRef) -> bool {
    if Rc::ptr_eq(a, b) {
        return true;
    }
    let a = a.borrow();
    let b = b.borrow();
    match (a.as_scalar(), b.as_scalar()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Compare one child pair: recurse through the validator when recursion is
/// enabled, otherwise perform a single shallow check at the child's path.
fn compare_child(
    child: EquivalencyContext,
    validator: &EquivalencyValidator,
    scope: &mut ValidationScope,
    options: &EquivalencyOptions,
) -> Result<(), EquivalencyError> {
    if options.is_recursive {
        validator.assert_equality_using(&child, scope)
    } else {
        if !shallow_eq(&child.subject, &child.expectation) {
            scope.fail_at(
                child.path.clone(),
                format!(
                    "expected {}, but found {}",
                    render(&child.expectation),
                    render(&child.subject)
                ),
            );
        }
        Ok(())
    }
}

// =============================================================================
// Dictionary step
// =============================================================================

/// Handles nodes whose subject is dictionary-like: keyed lookup with an
/// enumerable key set. Never defers once the subject shape matched.
#[derive(Debug, Default)]
pub struct DictionaryStep;

impl EquivalencyStep for DictionaryStep {
    fn name(&self) -> &'static str {
        "dictionary"
    }

    fn can_handle(&self, context: &EquivalencyContext, _options: &EquivalencyOptions) -> bool {
        context.subject.borrow().kind() == NodeKind::Dictionary
    }

    fn handle(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
    ) -> Result<bool, EquivalencyError> {
        let subject_entries = match context.subject.borrow().entries() {
            Some(entries) => entries.to_vec(),
            None => return Ok(false),
        };

        let expectation_entries = match context.expectation.borrow().entries() {
            Some(entries) => Some(entries.to_vec()),
            None => None,
        };
        let expectation_entries = match expectation_entries {
            Some(entries) => entries,
            None => {
                scope.fail(format!(
                    "expected {} to be a dictionary, but found {}",
                    context.label(),
                    context.expectation.borrow().kind()
                ));
                return Ok(true);
            }
        };

        if subject_entries.len() != expectation_entries.len() {
            scope.fail(format!(
                "expected {} item(s) in {}, but found {}",
                expectation_entries.len(),
                context.label(),
                subject_entries.len()
            ));
            return Ok(true);
        }

        for (key, subject_value) in &subject_entries {
            let expected_value = expectation_entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone());
            match expected_value {
                Some(expected_value) => {
                    let child =
                        context.child_key(key, subject_value.clone(), expected_value);
                    compare_child(child, validator, scope, options)?;
                }
                None => {
                    scope.fail_at(
                        context.label(),
                        format!("found unexpected key \"{}\" in {}", key, context.label()),
                    );
                }
            }
        }

        Ok(true)
    }
}

// =============================================================================
// Ordered collection step
// =============================================================================

/// Handles ordered collections, where the contract between the two graphs
/// requires positional match.
#[derive(Debug, Default)]
pub struct OrderedCollectionStep;

impl EquivalencyStep for OrderedCollectionStep {
    fn name(&self) -> &'static str {
        "ordered-collection"
    }

    fn can_handle(&self, context: &EquivalencyContext, options: &EquivalencyOptions) -> bool {
        context.subject.borrow().kind() == NodeKind::OrderedCollection
            && !options.ignore_collection_order
    }

    fn handle(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
    ) -> Result<bool, EquivalencyError> {
        let subject_items = match context.subject.borrow().items() {
            Some(items) => items.to_vec(),
            None => return Ok(false),
        };

        if context.expectation.borrow().kind() != NodeKind::OrderedCollection {
            scope.fail(format!(
                "expected {} to be an ordered collection, but found {}",
                context.label(),
                context.expectation.borrow().kind()
            ));
            return Ok(true);
        }
        let expectation_items = match context.expectation.borrow().items() {
            Some(items) => items.to_vec(),
            None => return Ok(false),
        };

        if subject_items.len() != expectation_items.len() {
            scope.fail(format!(
                "expected {} item(s) in {}, but found {}",
                expectation_items.len(),
                context.label(),
                subject_items.len()
            ));
            return Ok(true);
        }

        for (index, (subject_item, expected_item)) in subject_items
            .iter()
            .zip(expectation_items.iter())
            .enumerate()
        {
            let child =
                context.child_index(index, subject_item.clone(), expected_item.clone());
            compare_child(child, validator, scope, options)?;
        }

        Ok(true)
    }
}

// =============================================================================
// Unordered collection step
// =============================================================================

/// Handles unordered collections with best-effort pairing: every subject
/// element must find a distinct, not-yet-matched expectation element it is
/// equivalent to.
#[derive(Debug, Default)]
pub struct UnorderedCollectionStep;

impl EquivalencyStep for UnorderedCollectionStep {
    fn name(&self) -> &'static str {
        "unordered-collection"
    }

    fn can_handle(&self, context: &EquivalencyContext, options: &EquivalencyOptions) -> bool {
        match context.subject.borrow().kind() {
            NodeKind::UnorderedCollection => true,
            NodeKind::OrderedCollection => options.ignore_collection_order,
            _ => false,
        }
    }

    fn handle(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
    ) -> Result<bool, EquivalencyError> {
        let subject_items = match context.subject.borrow().items() {
            Some(items) => items.to_vec(),
            None => return Ok(false),
        };

        let expectation_items = match context.expectation.borrow().items() {
            Some(items) => Some(items.to_vec()),
            None => None,
        };
        let mut remaining = match expectation_items {
            Some(items) => items,
            None => {
                scope.fail(format!(
                    "expected {} to be a collection, but found {}",
                    context.label(),
                    context.expectation.borrow().kind()
                ));
                return Ok(true);
            }
        };

        if subject_items.len() != remaining.len() {
            scope.fail(format!(
                "expected {} item(s) in {}, but found {}",
                remaining.len(),
                context.label(),
                subject_items.len()
            ));
            return Ok(true);
        }

        for (index, subject_item) in subject_items.iter().enumerate() {
            let mut matched = None;
            for (slot, candidate) in remaining.iter().enumerate() {
                let equivalent = if options.is_recursive {
                    // Pairing probes run in a throwaway scope so trial
                    // mismatches never reach the session report.
                    let child =
                        context.child_index(index, subject_item.clone(), candidate.clone());
                    let mut probe = ValidationScope::new(String::new());
                    validator.assert_equality_using(&child, &mut probe)?;
                    !probe.has_failures()
                } else {
                    shallow_eq(subject_item, candidate)
                };
                if equivalent {
                    matched = Some(slot);
                    break;
                }
            }
            match matched {
                Some(slot) => {
                    remaining.remove(slot);
                }
                None => {
                    scope.fail_at(
                        format!("{}[{}]", context.path, index),
                        format!("no matching element found for {}", render(subject_item)),
                    );
                }
            }
        }

        Ok(true)
    }
}

// =============================================================================
// Structural fallback step
// =============================================================================

/// The default step: applies to everything. Scalars compare by value,
/// composites member-by-member in both directions; a kind mismatch is a
/// failure. Registered last.
#[derive(Debug, Default)]
pub struct StructuralStep;

impl EquivalencyStep for StructuralStep {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn can_handle(&self, _context: &EquivalencyContext, _options: &EquivalencyOptions) -> bool {
        true
    }

    fn handle(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
    ) -> Result<bool, EquivalencyError> {
        let subject_kind = context.subject.borrow().kind();
        let expectation_kind = context.expectation.borrow().kind();

        if subject_kind != expectation_kind {
            scope.fail(format!(
                "expected {} to be {}, but found {}",
                context.label(),
                expectation_kind,
                subject_kind
            ));
            return Ok(true);
        }

        match subject_kind {
            NodeKind::Scalar => {
                let equal = {
                    let subject = context.subject.borrow();
                    let expectation = context.expectation.borrow();
                    subject.as_scalar() == expectation.as_scalar()
                };
                if !equal {
                    scope.fail(format!(
                        "expected {}, but found {}",
                        render(&context.expectation),
                        render(&context.subject)
                    ));
                }
            }
            NodeKind::Composite => {
                self.compare_named(context, validator, scope, options, ChildAccess::Member)?;
            }
            NodeKind::Dictionary => {
                self.compare_named(context, validator, scope, options, ChildAccess::Key)?;
            }
            NodeKind::OrderedCollection | NodeKind::UnorderedCollection => {
                self.compare_positional(context, validator, scope, options)?;
            }
        }

        Ok(true)
    }
}

#[derive(Clone, Copy)]
enum ChildAccess {
    Member,
    Key,
}

impl StructuralStep {
    /// Member-by-member comparison in both directions: expectation members
    /// missing from the subject and subject members absent from the
    /// expectation are each failures.
    fn compare_named(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
        access: ChildAccess,
    ) -> Result<(), EquivalencyError> {
        let subject_children = {
            let subject = context.subject.borrow();
            subject
                .members()
                .or_else(|| subject.entries())
                .map(|children| children.to_vec())
                .unwrap_or_default()
        };
        let expectation_children = {
            let expectation = context.expectation.borrow();
            expectation
                .members()
                .or_else(|| expectation.entries())
                .map(|children| children.to_vec())
                .unwrap_or_default()
        };

        for (name, expected_value) in &expectation_children {
            let subject_value = subject_children
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone());
            match subject_value {
                Some(subject_value) => {
                    let child = match access {
                        ChildAccess::Member => context.child_member(
                            name,
                            subject_value,
                            expected_value.clone(),
                        ),
                        ChildAccess::Key => {
                            context.child_key(name, subject_value, expected_value.clone())
                        }
                    };
                    compare_child(child, validator, scope, options)?;
                }
                None => {
                    scope.fail_at(
                        context.label(),
                        format!(
                            "expected {} to have member \"{}\"",
                            context.label(),
                            name
                        ),
                    );
                }
            }
        }

        for (name, _) in &subject_children {
            if !expectation_children.iter().any(|(n, _)| n == name) {
                scope.fail_at(
                    context.label(),
                    format!("found unexpected member \"{}\" in {}", name, context.label()),
                );
            }
        }

        Ok(())
    }

    fn compare_positional(
        &self,
        context: &EquivalencyContext,
        validator: &EquivalencyValidator,
        scope: &mut ValidationScope,
        options: &EquivalencyOptions,
    ) -> Result<(), EquivalencyError> {
        let subject_items = context
            .subject
            .borrow()
            .items()
            .map(|items| items.to_vec())
            .unwrap_or_default();
        let expectation_items = context
            .expectation
            .borrow()
            .items()
            .map(|items| items.to_vec())
            .unwrap_or_default();

        if subject_items.len() != expectation_items.len() {
            scope.fail(format!(
                "expected {} item(s) in {}, but found {}",
                expectation_items.len(),
                context.label(),
                subject_items.len()
            ));
            return Ok(());
        }

        for (index, (subject_item, expected_item)) in subject_items
            .iter()
            .zip(expectation_items.iter())
            .enumerate()
        {
            let child =
                context.child_index(index, subject_item.clone(), expected_item.clone());
            compare_child(child, validator, scope, options)?;
        }

        Ok(())
    }
}
