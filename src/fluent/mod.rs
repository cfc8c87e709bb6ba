//! Fluent assertion API over the equivalency engine.
//!
//! This module provides a builder-style API for making assertions about
//! graph values. Assertions evaluate immediately (panic on failure) when
//! using methods like `to_pass()` or `to_hold()`, or can be evaluated
//! non-destructively using `evaluate()`.
//!
//! # Example
//!
//! ```rust,ignore
//! use likeness::{expect, Node};
//! use serde_json::json;
//!
//! let subject = Node::from_json(&json!({"a": 1, "b": [1, 2]}));
//! let expected = Node::from_json(&json!({"a": 1, "b": [1, 2]}));
//!
//! // Immediate evaluation (panics on failure)
//! expect(&subject).to_be_equivalent_to(&expected);
//!
//! // Non-panicking evaluation
//! let result = expect(&subject).equivalency(&expected).evaluate();
//! assert!(result.passed);
//! ```

mod builder;
mod collection;
mod matchers;
mod string;

pub use builder::{expect, AssertionResult, EquivalencyAssertion, ValueExpectation};
pub use collection::{CollectionAssertion, DictionaryAssertion};
pub use matchers::{pattern_matches, scalar_matches};
pub use string::StringAssertion;
