//! The value graph model that equivalency comparisons operate on.
//!
//! Subjects and expectations are trees of [`Node`] values behind [`NodeRef`]
//! handles; shared subtrees and cycles are allowed.
//! Classification into one of the five [`NodeKind`] variants happens once
//! per node; the comparison steps dispatch on that variant.
//!
//! # Example
//!
//! ```rust
//! use likeness::Node;
//! use serde_json::json;
//!
//! let subject = Node::from_json(&json!({"name": "amy", "tags": ["a", "b"]}));
//! assert_eq!(subject.borrow().len(), 2);
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a graph node.
///
/// `Rc` gives subtrees shared identity (the basis for cycle detection) and
/// `RefCell` lets tests and callers close cycles by mutating a node after
/// its parent has been constructed.
pub type NodeRef = Rc<RefCell<Node>>;

/// A leaf value.
///
/// `Int` and `Float` compare numerically, so `1` and `1.0` are equal.
#[derive(Debug, Clone)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            (Scalar::Int(a), Scalar::Float(b)) | (Scalar::Float(b), Scalar::Int(a)) => {
                *a as f64 == *b
            }
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// The classification of a node, computed once and dispatched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A leaf value (null, bool, number, string).
    Scalar,
    /// Keyed lookup with an enumerable key set.
    Dictionary,
    /// A sequence where position is part of the contract.
    OrderedCollection,
    /// A bag where pairing is best-effort.
    UnorderedCollection,
    /// A struct-like value with named members.
    Composite,
}

impl NodeKind {
    /// Whether comparison descends into children of this kind.
    pub fn can_recurse(&self) -> bool {
        !matches!(self, NodeKind::Scalar)
    }

    /// Human-readable article + noun for diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Scalar => "a scalar value",
            NodeKind::Dictionary => "a dictionary",
            NodeKind::OrderedCollection => "an ordered collection",
            NodeKind::UnorderedCollection => "an unordered collection",
            NodeKind::Composite => "a composite value",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of a subject or expectation graph.
///
/// Dictionaries and composites keep their children in declaration order so
/// comparison visits them in whatever order the graph enumerates, which the
/// engine guarantees and nothing more.
#[derive(Debug)]
pub enum Node {
    Scalar(Scalar),
    Dictionary(Vec<(String, NodeRef)>),
    Ordered(Vec<NodeRef>),
    Unordered(Vec<NodeRef>),
    Composite(Vec<(String, NodeRef)>),
}

impl Node {
    fn new_ref(node: Node) -> NodeRef {
        Rc::new(RefCell::new(node))
    }

    /// Create a null scalar node.
    pub fn null() -> NodeRef {
        Self::new_ref(Node::Scalar(Scalar::Null))
    }

    /// Create a boolean scalar node.
    pub fn bool(value: bool) -> NodeRef {
        Self::new_ref(Node::Scalar(Scalar::Bool(value)))
    }

    /// Create an integer scalar node.
    pub fn int(value: i64) -> NodeRef {
        Self::new_ref(Node::Scalar(Scalar::Int(value)))
    }

    /// Create a float scalar node.
    pub fn float(value: f64) -> NodeRef {
        Self::new_ref(Node::Scalar(Scalar::Float(value)))
    }

    /// Create a string scalar node.
    pub fn string(value: impl Into<String>) -> NodeRef {
        Self::new_ref(Node::Scalar(Scalar::Str(value.into())))
    }

    /// Create a dictionary node from key/value entries.
    pub fn dictionary(entries: Vec<(String, NodeRef)>) -> NodeRef {
        Self::new_ref(Node::Dictionary(entries))
    }

    /// Create an ordered collection node.
    pub fn ordered(items: Vec<NodeRef>) -> NodeRef {
        Self::new_ref(Node::Ordered(items))
    }

    /// Create an unordered collection node.
    pub fn unordered(items: Vec<NodeRef>) -> NodeRef {
        Self::new_ref(Node::Unordered(items))
    }

    /// Create a composite (struct-like) node from named members.
    pub fn composite(members: Vec<(String, NodeRef)>) -> NodeRef {
        Self::new_ref(Node::Composite(members))
    }

    /// Build a graph from a JSON value.
    ///
    /// Objects become dictionaries, arrays become ordered collections,
    /// everything else becomes a scalar. Every node gets a fresh identity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use likeness::{Node, NodeKind};
    /// use serde_json::json;
    ///
    /// let node = Node::from_json(&json!({"a": [1, 2]}));
    /// assert_eq!(node.borrow().kind(), NodeKind::Dictionary);
    /// ```
    pub fn from_json(value: &serde_json::Value) -> NodeRef {
        match value {
            serde_json::Value::Null => Node::null(),
            serde_json::Value::Bool(b) => Node::bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Node::int(i),
                None => Node::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Node::string(s),
            serde_json::Value::Array(items) => {
                Node::ordered(items.iter().map(Node::from_json).collect())
            }
            serde_json::Value::Object(map) => Node::dictionary(
                map.iter()
                    .map(|(k, v)| (k.clone(), Node::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Build a graph from a YAML value.
    ///
    /// Mappings become dictionaries (non-string keys are stringified),
    /// sequences become ordered collections, tags are transparent.
    #[cfg(feature = "yaml")]
    pub fn from_yaml(value: &serde_yaml::Value) -> NodeRef {
        match value {
            serde_yaml::Value::Null => Node::null(),
            serde_yaml::Value::Bool(b) => Node::bool(*b),
            serde_yaml::Value::Number(n) => match n.as_i64() {
                Some(i) => Node::int(i),
                None => Node::float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_yaml::Value::String(s) => Node::string(s),
            serde_yaml::Value::Sequence(items) => {
                Node::ordered(items.iter().map(Node::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(map) => Node::dictionary(
                map.iter()
                    .map(|(k, v)| (yaml_key(k), Node::from_yaml(v)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Node::from_yaml(&tagged.value),
        }
    }

    /// The reference identity of a node, used for cycle detection.
    ///
    /// Two handles have the same identity iff they point at the same
    /// allocation; structurally equal but distinct nodes differ.
    pub fn identity(node: &NodeRef) -> usize {
        Rc::as_ptr(node) as usize
    }

    /// Classify this node.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Scalar(_) => NodeKind::Scalar,
            Node::Dictionary(_) => NodeKind::Dictionary,
            Node::Ordered(_) => NodeKind::OrderedCollection,
            Node::Unordered(_) => NodeKind::UnorderedCollection,
            Node::Composite(_) => NodeKind::Composite,
        }
    }

    /// The scalar value, if this is a leaf.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Key/value entries, if this is a dictionary.
    pub fn entries(&self) -> Option<&[(String, NodeRef)]> {
        match self {
            Node::Dictionary(entries) => Some(entries),
            _ => None,
        }
    }

    /// Named members, if this is a composite value.
    pub fn members(&self) -> Option<&[(String, NodeRef)]> {
        match self {
            Node::Composite(members) => Some(members),
            _ => None,
        }
    }

    /// Elements, if this is a collection of either ordering.
    pub fn items(&self) -> Option<&[NodeRef]> {
        match self {
            Node::Ordered(items) | Node::Unordered(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a child by key (dictionaries) or member name (composites).
    pub fn get(&self, key: &str) -> Option<NodeRef> {
        match self {
            Node::Dictionary(entries) | Node::Composite(entries) => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    /// Number of direct children (0 for scalars).
    pub fn len(&self) -> usize {
        match self {
            Node::Scalar(_) => 0,
            Node::Dictionary(entries) | Node::Composite(entries) => entries.len(),
            Node::Ordered(items) | Node::Unordered(items) => items.len(),
        }
    }

    /// Whether this node has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a named child to a dictionary or composite node.
    ///
    /// Used to close cycles: build the parent, then attach a child that
    /// already points back at it.
    pub fn add_member(&mut self, name: impl Into<String>, value: NodeRef) {
        match self {
            Node::Dictionary(entries) | Node::Composite(entries) => {
                entries.push((name.into(), value));
            }
            _ => panic!("add_member called on {}", self.kind()),
        }
    }

    /// Append an element to a collection node.
    pub fn push_item(&mut self, value: NodeRef) {
        match self {
            Node::Ordered(items) | Node::Unordered(items) => items.push(value),
            _ => panic!("push_item called on {}", self.kind()),
        }
    }
}

#[cfg(feature = "yaml")]
fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "<key>".to_string()),
    }
}

/// Render a node for failure messages.
///
/// Depth-capped and cycle-safe: revisiting a node already on the rendering
/// stack prints `(cycle)` instead of recursing.
pub fn render(node: &NodeRef) -> String {
    let mut on_stack = HashSet::new();
    render_inner(node, 0, &mut on_stack)
}

const RENDER_DEPTH_LIMIT: usize = 3;

fn render_inner(node: &NodeRef, depth: usize, on_stack: &mut HashSet<usize>) -> String {
    let id = Node::identity(node);
    let borrowed = node.borrow();

    if let Node::Scalar(s) = &*borrowed {
        return s.to_string();
    }
    if depth >= RENDER_DEPTH_LIMIT {
        return "...".to_string();
    }
    if !on_stack.insert(id) {
        return "(cycle)".to_string();
    }

    let rendered = match &*borrowed {
        Node::Scalar(_) => unreachable!(),
        Node::Dictionary(entries) => {
            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", k, render_inner(v, depth + 1, on_stack)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Node::Composite(members) => {
            let parts: Vec<String> = members
                .iter()
                .map(|(k, v)| format!("{}: {}", k, render_inner(v, depth + 1, on_stack)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        Node::Ordered(items) | Node::Unordered(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|v| render_inner(v, depth + 1, on_stack))
                .collect();
            format!("[{}]", parts.join(", "))
        }
    };

    on_stack.remove(&id);
    rendered
}

/// Build a composite node from named members.
///
/// # Example
///
/// ```rust,ignore
/// use likeness::{composite, Node};
///
/// let order = composite! {
///     "id" => Node::int(7),
///     "customer" => Node::string("amy"),
/// };
/// ```
#[macro_export]
macro_rules! composite {
    ($($key:expr => $value:expr),* $(,)?) => {{
        $crate::Node::composite(vec![
            $( ($key.to_string(), $value) ),*
        ])
    }};
}

/// Build an unordered collection node from elements.
///
/// # Example
///
/// ```rust,ignore
/// use likeness::{unordered, Node};
///
/// let bag = unordered![Node::int(1), Node::int(2)];
/// ```
#[macro_export]
macro_rules! unordered {
    ($($item:expr),* $(,)?) => {{
        $crate::Node::unordered(vec![ $( $item ),* ])
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_kinds() {
        assert_eq!(Node::from_json(&json!(null)).borrow().kind(), NodeKind::Scalar);
        assert_eq!(Node::from_json(&json!(true)).borrow().kind(), NodeKind::Scalar);
        assert_eq!(Node::from_json(&json!(1.5)).borrow().kind(), NodeKind::Scalar);
        assert_eq!(
            Node::from_json(&json!([1, 2])).borrow().kind(),
            NodeKind::OrderedCollection
        );
        assert_eq!(
            Node::from_json(&json!({"a": 1})).borrow().kind(),
            NodeKind::Dictionary
        );
    }

    #[test]
    fn test_scalar_numeric_equality() {
        assert_eq!(Scalar::Int(1), Scalar::Float(1.0));
        assert_eq!(Scalar::Float(2.0), Scalar::Int(2));
        assert_ne!(Scalar::Int(1), Scalar::Float(1.5));
        assert_ne!(Scalar::Int(1), Scalar::Str("1".to_string()));
    }

    #[test]
    fn test_identity_distinguishes_equal_values() {
        let a = Node::int(1);
        let b = Node::int(1);
        assert_ne!(Node::identity(&a), Node::identity(&b));
        assert_eq!(Node::identity(&a), Node::identity(&a.clone()));
    }

    #[test]
    fn test_get_on_dictionary_and_composite() {
        let dict = Node::from_json(&json!({"a": 1, "b": 2}));
        assert!(dict.borrow().get("a").is_some());
        assert!(dict.borrow().get("z").is_none());

        let value = composite! {"name" => Node::string("amy")};
        assert!(value.borrow().get("name").is_some());
    }

    #[test]
    fn test_render_scalars_and_containers() {
        assert_eq!(render(&Node::int(3)), "3");
        assert_eq!(render(&Node::string("hi")), "\"hi\"");
        assert_eq!(render(&Node::from_json(&json!([1, 2]))), "[1, 2]");
        assert_eq!(render(&Node::from_json(&json!({"a": 1}))), "{\"a\": 1}");
    }

    #[test]
    fn test_render_cycle_terminates() {
        let parent = composite! {"name" => Node::string("a")};
        let child = composite! {"parent" => parent.clone()};
        parent.borrow_mut().add_member("child", child);

        let rendered = render(&parent);
        assert!(rendered.contains("(cycle)") || rendered.contains("..."));
    }

    #[test]
    fn test_render_depth_cap() {
        let deep = Node::from_json(&json!({"a": {"b": {"c": {"d": {"e": 1}}}}}));
        let rendered = render(&deep);
        assert!(rendered.contains("..."));
    }

    #[test]
    fn test_unordered_macro() {
        let bag = unordered![Node::int(1), Node::int(2)];
        assert_eq!(bag.borrow().kind(), NodeKind::UnorderedCollection);
        assert_eq!(bag.borrow().len(), 2);
    }

    #[test]
    fn test_push_item_closes_collection_cycle() {
        let list = Node::ordered(vec![Node::int(1)]);
        list.borrow_mut().push_item(list.clone());
        assert_eq!(list.borrow().len(), 2);
        // Rendering the self-referential list must not hang.
        let _ = render(&list);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_from_yaml_mapping() {
        let value: serde_yaml::Value = serde_yaml::from_str("a: 1\nb: [x, y]\n").unwrap();
        let node = Node::from_yaml(&value);
        assert_eq!(node.borrow().kind(), NodeKind::Dictionary);
        assert_eq!(node.borrow().len(), 2);
    }
}
