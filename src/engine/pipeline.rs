//! The ordered list of comparison steps.
//!
//! The standard order puts specific steps before the generic fallback:
//! dictionary, ordered collection, unordered collection, structural. Order
//! is part of the contract: the first applicable step owns a node.
//!
//! A process-wide default pipeline is initialized once (explicitly via
//! [`install_default_pipeline`], or lazily on first use) and read-only
//! thereafter. Per-call customization passes an explicit pipeline to
//! [`EquivalencyValidator::with_pipeline`](super::EquivalencyValidator::with_pipeline)
//! instead of mutating shared state.

use std::fmt;
use std::sync::{Arc, OnceLock};

use super::steps::{
    DictionaryStep, EquivalencyStep, OrderedCollectionStep, StructuralStep,
    UnorderedCollectionStep,
};

static DEFAULT_PIPELINE: OnceLock<StepPipeline> = OnceLock::new();

/// Error type for default-pipeline installation.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("the default step pipeline was already installed or used")]
    AlreadyInstalled,
}

/// An ordered, immutable-after-construction list of comparison steps.
#[derive(Clone)]
pub struct StepPipeline {
    steps: Vec<Arc<dyn EquivalencyStep>>,
}

impl StepPipeline {
    /// The standard pipeline: dictionary, ordered collection, unordered
    /// collection, then the structural fallback.
    pub fn standard() -> Self {
        Self {
            steps: vec![
                Arc::new(DictionaryStep),
                Arc::new(OrderedCollectionStep),
                Arc::new(UnorderedCollectionStep),
                Arc::new(StructuralStep),
            ],
        }
    }

    /// A pipeline with no steps. Useful as a base for fully custom setups;
    /// a validator running an empty pipeline fails every node fatally.
    pub fn empty() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step ahead of all existing steps.
    pub fn prepend(mut self, step: Arc<dyn EquivalencyStep>) -> Self {
        self.steps.insert(0, step);
        self
    }

    /// Add a step after all existing steps.
    pub fn append(mut self, step: Arc<dyn EquivalencyStep>) -> Self {
        self.steps.push(step);
        self
    }

    /// The steps in consultation order.
    pub fn steps(&self) -> &[Arc<dyn EquivalencyStep>] {
        &self.steps
    }

    /// Step names in consultation order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Number of registered steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the pipeline has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for StepPipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for StepPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepPipeline")
            .field("steps", &self.step_names())
            .finish()
    }
}

/// The process-wide default pipeline, initialized on first use.
pub fn default_pipeline() -> &'static StepPipeline {
    DEFAULT_PIPELINE.get_or_init(StepPipeline::standard)
}

/// Install a custom process-wide default pipeline.
///
/// Must run before any comparison uses the default; once the default has
/// been installed or used, further installs fail.
pub fn install_default_pipeline(pipeline: StepPipeline) -> Result<(), PipelineError> {
    DEFAULT_PIPELINE
        .set(pipeline)
        .map_err(|_| PipelineError::AlreadyInstalled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        let pipeline = StepPipeline::standard();
        assert_eq!(
            pipeline.step_names(),
            vec![
                "dictionary",
                "ordered-collection",
                "unordered-collection",
                "structural"
            ]
        );
    }

    #[test]
    fn test_prepend_and_append() {
        let pipeline = StepPipeline::empty()
            .append(Arc::new(StructuralStep))
            .prepend(Arc::new(DictionaryStep));
        assert_eq!(pipeline.step_names(), vec!["dictionary", "structural"]);
        assert_eq!(pipeline.len(), 2);
    }

    #[test]
    fn test_empty_pipeline() {
        assert!(StepPipeline::empty().is_empty());
        assert!(!StepPipeline::standard().is_empty());
    }

    #[test]
    fn test_second_install_fails() {
        // Installing the standard pipeline is idempotent in effect, so this
        // test is safe regardless of what ran before it: only the second
        // call in a row is asserted on.
        let _ = install_default_pipeline(StepPipeline::standard());
        assert!(install_default_pipeline(StepPipeline::standard()).is_err());
    }

    #[test]
    fn test_debug_lists_step_names() {
        let rendered = format!("{:?}", StepPipeline::standard());
        assert!(rendered.contains("dictionary"));
        assert!(rendered.contains("structural"));
    }
}
