//! In-memory DOT graph.

use std::collections::HashMap;

/// An attribute value. HTML-like labels (`<...>`) are kept apart from
/// ordinary strings so they are written back with angle brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrValue {
    pub text: String,
    pub html: bool,
}

impl AttrValue {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: false,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: true,
        }
    }
}

/// Ordered string-keyed attributes of a graph, node or edge.
///
/// Setting an existing key replaces its value in place; new keys are
/// appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of an attribute, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_value(key).map(|v| v.text.as_str())
    }

    pub fn get_value(&self, key: &str) -> Option<&AttrValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Set a plain string attribute.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set_value(key, AttrValue::plain(value));
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: AttrValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Copy every entry of `other` over this map.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.entries {
            self.set_value(key.clone(), value.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `graph` or `digraph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    Undirected,
    Directed,
}

impl GraphKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Undirected => "graph",
            Self::Directed => "digraph",
        }
    }

    pub const fn edge_op(self) -> &'static str {
        match self {
            Self::Undirected => "--",
            Self::Directed => "->",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    pub attrs: Attributes,
}

/// An edge endpoint: node name plus optional `port[:compass]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub node: String,
    pub port: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub tail: Endpoint,
    pub head: Endpoint,
    pub attrs: Attributes,
}

/// A scope: the root graph body or a (possibly anonymous) subgraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subgraph {
    pub name: Option<String>,
    /// Graph attributes (`graph [..]` and `key = value`).
    pub attrs: Attributes,
    pub node_defaults: Attributes,
    pub edge_defaults: Attributes,
    /// Nodes declared directly in this scope, in first-mention order.
    pub nodes: Vec<String>,
    /// Indices into [`Graph::edges`] of edges declared in this scope.
    pub edges: Vec<usize>,
    pub subgraphs: Vec<Subgraph>,
}

impl Subgraph {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Add a member node unless it is already listed.
    pub fn add_node(&mut self, name: &str) {
        if !self.nodes.iter().any(|n| n == name) {
            self.nodes.push(name.to_string());
        }
    }

    /// Every node in this scope and its nested subgraphs, deduplicated.
    pub fn all_nodes(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_nodes(&mut out);
        out
    }

    fn collect_nodes(&self, out: &mut Vec<String>) {
        for name in &self.nodes {
            if !out.contains(name) {
                out.push(name.clone());
            }
        }
        for sub in &self.subgraphs {
            sub.collect_nodes(out);
        }
    }

    /// Path of child indices to the subgraph called `name`, searched depth first.
    pub(crate) fn find_path(&self, name: &str) -> Option<Vec<usize>> {
        for (i, sub) in self.subgraphs.iter().enumerate() {
            if sub.name.as_deref() == Some(name) {
                return Some(vec![i]);
            }
            if let Some(mut rest) = sub.find_path(name) {
                rest.insert(0, i);
                return Some(rest);
            }
        }
        None
    }

    pub(crate) fn descend_mut(&mut self, path: &[usize]) -> &mut Self {
        path.iter().fold(self, |scope, &i| &mut scope.subgraphs[i])
    }
}

/// A parsed DOT graph.
///
/// Nodes live at graph level in creation order and carry their resolved
/// attributes; subgraphs only record membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    pub strict: bool,
    pub kind: GraphKind,
    pub name: Option<String>,
    pub root: Subgraph,
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(kind: GraphKind, name: Option<String>) -> Self {
        Self {
            strict: false,
            kind,
            name,
            root: Subgraph::default(),
            nodes: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&i| &self.nodes[i])
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Create a node with `attrs` if it does not exist yet.
    ///
    /// Returns `true` when the node was created.
    pub fn insert_node(&mut self, name: &str, attrs: Attributes) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            attrs,
        });
        true
    }

    pub fn node_attrs_mut(&mut self, name: &str) -> Option<&mut Attributes> {
        let i = *self.index.get(name)?;
        Some(&mut self.nodes[i].attrs)
    }

    pub fn subgraph(&self, name: &str) -> Option<&Subgraph> {
        let path = self.root.find_path(name)?;
        Some(path.iter().fold(&self.root, |scope, &i| &scope.subgraphs[i]))
    }

    /// The subgraph called `name`, created under the root if absent.
    pub fn subgraph_or_insert(&mut self, name: &str) -> &mut Subgraph {
        let path = self.root.find_path(name).unwrap_or_else(|| {
            self.root.subgraphs.push(Subgraph::named(name));
            vec![self.root.subgraphs.len() - 1]
        });
        self.root.descend_mut(&path)
    }
}
