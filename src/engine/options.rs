//! Per-call configuration for a comparison session.
//!
//! Options are constructed once per top-level assertion and read-only for
//! the duration of that call. Every step and the validator itself consult
//! them.
//!
//! ```rust
//! use likeness::EquivalencyOptions;
//!
//! let options = EquivalencyOptions::new()
//!     .non_recursive()
//!     .allow_infinite_recursion();
//! assert!(!options.is_recursive);
//! ```

use super::validator::MAX_RECURSION_DEPTH;

/// What to do when the cycle guard trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CyclicReferencePolicy {
    /// Skip the node silently; the earlier visit already verified it.
    #[default]
    TreatAsVerified,
    /// Record a failure naming the path at which the cycle was found.
    Report,
}

/// Immutable configuration consulted by the validator and every step.
#[derive(Debug, Clone)]
pub struct EquivalencyOptions {
    /// Whether composite nodes are compared by descending into children.
    /// When false, nested values get a single shallow equality check.
    pub is_recursive: bool,
    /// Disables the fixed depth guard. Cycle detection still applies.
    pub allow_infinite_recursion: bool,
    /// How re-encountered references are treated.
    pub cyclic_references: CyclicReferencePolicy,
    /// Applicability hint: route ordered collections through best-effort
    /// pairing instead of positional match.
    pub ignore_collection_order: bool,
}

impl Default for EquivalencyOptions {
    fn default() -> Self {
        Self {
            is_recursive: true,
            allow_infinite_recursion: false,
            cyclic_references: CyclicReferencePolicy::TreatAsVerified,
            ignore_collection_order: false,
        }
    }
}

impl EquivalencyOptions {
    /// Create options with the defaults: recursive, depth-guarded, cycles
    /// treated as verified.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare nested values with a single shallow equality check instead
    /// of recursing.
    pub fn non_recursive(mut self) -> Self {
        self.is_recursive = false;
        self
    }

    /// Lift the fixed recursion depth limit.
    pub fn allow_infinite_recursion(mut self) -> Self {
        self.allow_infinite_recursion = true;
        self
    }

    /// Set the cyclic reference policy.
    pub fn on_cyclic_reference(mut self, policy: CyclicReferencePolicy) -> Self {
        self.cyclic_references = policy;
        self
    }

    /// Compare ordered collections without requiring positional match.
    pub fn ignore_collection_order(mut self) -> Self {
        self.ignore_collection_order = true;
        self
    }

    /// Configuration description written into the reporting scope.
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        parts.push(if self.is_recursive { "recursive" } else { "shallow" }.to_string());
        if self.allow_infinite_recursion {
            parts.push("unlimited depth".to_string());
        } else {
            parts.push(format!("max depth {}", MAX_RECURSION_DEPTH));
        }
        parts.push(
            match self.cyclic_references {
                CyclicReferencePolicy::TreatAsVerified => "cycles treated as verified",
                CyclicReferencePolicy::Report => "cycles reported",
            }
            .to_string(),
        );
        if self.ignore_collection_order {
            parts.push("order-insensitive".to_string());
        }
        parts.join(", ")
    }
}
