//! # likeness
//!
//! A fluent assertion library for structural equivalency of object graphs.
//!
//! The core is a recursive validation engine that decides whether two
//! arbitrary graphs (subject vs. expectation) are equivalent under
//! configurable rules, with cycle detection, bounded recursion, and a
//! pluggable per-type comparison pipeline. The fluent surface on top gives
//! Jest-like matchers for collections, dictionaries, and strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use likeness::{expect, Node};
//! use serde_json::json;
//!
//! let subject = Node::from_json(&json!({"name": "amy", "orders": [1, 2]}));
//! let expected = Node::from_json(&json!({"name": "amy", "orders": [1, 2]}));
//!
//! expect(&subject).to_be_equivalent_to(&expected);
//!
//! expect(&subject)
//!     .dictionary()
//!     .contain_key("name")
//!     .to_hold();
//! ```
//!
//! ## Non-panicking evaluation
//!
//! ```rust
//! use likeness::{expect, Node};
//! use serde_json::json;
//!
//! let subject = Node::from_json(&json!({"a": 1}));
//! let expected = Node::from_json(&json!({"a": 2}));
//!
//! let result = expect(&subject).equivalency(&expected).evaluate();
//! assert!(!result.passed);
//! ```
//!
//! ## Driving the engine directly
//!
//! ```rust
//! use likeness::{EquivalencyContext, EquivalencyOptions, EquivalencyValidator, Node};
//! use serde_json::json;
//!
//! let context = EquivalencyContext::root(
//!     Node::from_json(&json!([1, 2, 3])),
//!     Node::from_json(&json!([1, 2, 3])),
//! );
//! let report = EquivalencyValidator::new(EquivalencyOptions::new())
//!     .assert_equality(&context)
//!     .unwrap();
//! assert!(report.passed());
//! ```

pub mod engine;
pub mod fluent;
pub mod graph;
pub mod output;

// Core engine types
pub use engine::{
    default_pipeline, install_default_pipeline, CyclicReferencePolicy, DictionaryStep,
    EquivalencyContext, EquivalencyError, EquivalencyOptions, EquivalencyReport,
    EquivalencyStep, EquivalencyValidator, Failure, ObjectReference, ObjectTracker,
    OrderedCollectionStep, PipelineError, StepPipeline, StructuralStep,
    UnorderedCollectionStep, ValidationScope, MAX_RECURSION_DEPTH,
};

// Graph model
pub use graph::{render, Node, NodeKind, NodeRef, Scalar};

// Fluent surface
pub use fluent::{
    expect, pattern_matches, scalar_matches, AssertionResult, CollectionAssertion,
    DictionaryAssertion, EquivalencyAssertion, StringAssertion, ValueExpectation,
};

// Output formatting
pub use output::{OutputConfig, OutputMode, ReportFormatter};
