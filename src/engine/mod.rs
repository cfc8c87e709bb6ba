//! The structural equivalency validation engine.
//!
//! This module decides whether two object graphs are equivalent under
//! configurable rules. The [`EquivalencyValidator`] drives one comparison
//! session: it owns the cycle tracker, enforces the recursion depth guard,
//! and dispatches each node to the first applicable step in an ordered
//! [`StepPipeline`]. Mismatches accumulate in a [`ValidationScope`] and
//! surface together as an [`EquivalencyReport`].
//!
//! # Example
//!
//! ```rust
//! use likeness::{EquivalencyContext, EquivalencyOptions, EquivalencyValidator, Node};
//! use serde_json::json;
//!
//! let context = EquivalencyContext::root(
//!     Node::from_json(&json!({"a": 1})),
//!     Node::from_json(&json!({"a": 1})),
//! );
//! let validator = EquivalencyValidator::new(EquivalencyOptions::new());
//! let report = validator.assert_equality(&context).unwrap();
//! assert!(report.passed());
//! ```

mod context;
mod options;
mod pipeline;
mod scope;
mod steps;
mod tracker;
mod validator;

pub use context::EquivalencyContext;
pub use options::{CyclicReferencePolicy, EquivalencyOptions};
pub use pipeline::{default_pipeline, install_default_pipeline, PipelineError, StepPipeline};
pub use scope::{EquivalencyReport, Failure, ValidationScope};
pub use steps::{
    DictionaryStep, EquivalencyStep, OrderedCollectionStep, StructuralStep,
    UnorderedCollectionStep,
};
pub use tracker::{ObjectReference, ObjectTracker};
pub use validator::{EquivalencyError, EquivalencyValidator, MAX_RECURSION_DEPTH};
