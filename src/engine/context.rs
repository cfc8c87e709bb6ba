//! Per-node comparison context.
//!
//! A context describes one comparison unit: the subject value found in the
//! actual graph, the value expected there, and the member-access path from
//! the root. Contexts are never mutated after construction; descending into
//! a child produces a new derived value.

use crate::graph::NodeRef;

/// One node under comparison.
#[derive(Debug, Clone)]
pub struct EquivalencyContext {
    /// Value found in the actual object graph.
    pub subject: NodeRef,
    /// Value expected at the same position.
    pub expectation: NodeRef,
    /// Member-access path from the root, e.g. `orders[2].customer.name`.
    /// Empty at the root.
    pub path: String,
    /// Whether this is the top-level comparison unit.
    pub is_root: bool,
    /// Diagnostic text carried from the top-level call.
    pub reason: Option<String>,
}

impl EquivalencyContext {
    /// Create the root context for a comparison session.
    pub fn root(subject: NodeRef, expectation: NodeRef) -> Self {
        Self {
            subject,
            expectation,
            path: String::new(),
            is_root: true,
            reason: None,
        }
    }

    /// Attach diagnostic reason text to a root context.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Derive the context for a named member, extending the path with
    /// `.name` (or just `name` at the root).
    pub fn child_member(&self, name: &str, subject: NodeRef, expectation: NodeRef) -> Self {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        };
        self.child(path, subject, expectation)
    }

    /// Derive the context for a dictionary entry, extending the path with
    /// `["key"]`.
    pub fn child_key(&self, key: &str, subject: NodeRef, expectation: NodeRef) -> Self {
        self.child(format!("{}[\"{}\"]", self.path, key), subject, expectation)
    }

    /// Derive the context for a collection element, extending the path with
    /// `[index]`.
    pub fn child_index(&self, index: usize, subject: NodeRef, expectation: NodeRef) -> Self {
        self.child(format!("{}[{}]", self.path, index), subject, expectation)
    }

    fn child(&self, path: String, subject: NodeRef, expectation: NodeRef) -> Self {
        Self {
            subject,
            expectation,
            path,
            is_root: false,
            reason: self.reason.clone(),
        }
    }

    /// Recursion depth of this context: the number of path separators.
    ///
    /// Both `.` and `[` count, so member chains and key/index chains are
    /// depth-limited the same way.
    pub fn depth(&self) -> usize {
        self.path.chars().filter(|c| *c == '.' || *c == '[').count()
    }

    /// Human label for this node: `subject` at the root, the path otherwise.
    pub fn label(&self) -> &str {
        if self.is_root {
            "subject"
        } else {
            &self.path
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Node;

    fn root() -> EquivalencyContext {
        EquivalencyContext::root(Node::int(1), Node::int(1))
    }

    #[test]
    fn test_root_context() {
        let ctx = root();
        assert!(ctx.is_root);
        assert_eq!(ctx.path, "");
        assert_eq!(ctx.label(), "subject");
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_child_member_paths() {
        let ctx = root();
        let child = ctx.child_member("customer", Node::int(1), Node::int(1));
        assert_eq!(child.path, "customer");
        assert!(!child.is_root);

        let grandchild = child.child_member("name", Node::int(1), Node::int(1));
        assert_eq!(grandchild.path, "customer.name");
        assert_eq!(grandchild.label(), "customer.name");
    }

    #[test]
    fn test_child_key_and_index_paths() {
        let ctx = root();
        let by_key = ctx.child_key("total", Node::int(1), Node::int(1));
        assert_eq!(by_key.path, "[\"total\"]");

        let by_index = by_key.child_index(2, Node::int(1), Node::int(1));
        assert_eq!(by_index.path, "[\"total\"][2]");
    }

    #[test]
    fn test_depth_counts_both_separator_styles() {
        let ctx = root();
        let a = ctx.child_member("a", Node::int(1), Node::int(1));
        assert_eq!(a.depth(), 0);

        let b = a.child_member("b", Node::int(1), Node::int(1));
        assert_eq!(b.depth(), 1);

        let c = b.child_key("c", Node::int(1), Node::int(1));
        assert_eq!(c.depth(), 2);

        let d = c.child_index(0, Node::int(1), Node::int(1));
        assert_eq!(d.depth(), 3);
    }

    #[test]
    fn test_reason_propagates_to_children() {
        let ctx = root().with_reason("caches must agree");
        let child = ctx.child_member("a", Node::int(1), Node::int(1));
        assert_eq!(child.reason.as_deref(), Some("caches must agree"));
    }
}
