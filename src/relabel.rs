//! Layout cleanup for graphs produced by a pipeline tool's own `graph` command.
//!
//! Those graphs mark sources with `trapezium`, sinks with `invtrapezium` and
//! transforms with `diamond`. This pass pins sources and sinks to their own
//! ranks, turns the role shapes into colors, and makes every node a filled box.

use tracing::debug;

use crate::dot::Graph;

/// Name of the generated rank group for in-marker nodes.
///
/// Generated subgroups must be named: renderers driven through library
/// bindings drop the rank constraint of unnamed ones.
pub const IN_GROUP: &str = "sub_in";
/// Name of the generated rank group for out-marker nodes.
pub const OUT_GROUP: &str = "sub_out";

pub const IN_COLOR: &str = "green";
pub const OUT_COLOR: &str = "magenta";
pub const DIAMOND_COLOR: &str = "orange";

/// Role a node plays, read from its original `shape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    In,
    Out,
    Diamond,
    Unclassified,
}

impl Role {
    pub fn from_shape(shape: Option<&str>) -> Self {
        match shape {
            Some("trapezium") => Self::In,
            Some("invtrapezium") => Self::Out,
            Some("diamond") => Self::Diamond,
            _ => Self::Unclassified,
        }
    }

    pub const fn color(self) -> Option<&'static str> {
        match self {
            Self::In => Some(IN_COLOR),
            Self::Out => Some(OUT_COLOR),
            Self::Diamond => Some(DIAMOND_COLOR),
            Self::Unclassified => None,
        }
    }
}

/// Counts of classified nodes from one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelabelSummary {
    pub in_markers: usize,
    pub out_markers: usize,
    pub diamonds: usize,
    pub unclassified: usize,
}

/// Regroup and restyle `graph` in place.
///
/// # Example
///
/// ```
/// use pipeviz::{dot, relabel};
///
/// let mut graph = dot::parse("digraph { a [shape=trapezium]; b [shape=invtrapezium]; a -> b }").unwrap();
/// let summary = relabel::clarify(&mut graph);
/// assert_eq!(summary.in_markers, 1);
/// assert_eq!(graph.node("a").unwrap().attrs.get("color"), Some("green"));
/// assert_eq!(graph.subgraph("sub_out").unwrap().nodes, ["b"]);
/// ```
pub fn clarify(graph: &mut Graph) -> RelabelSummary {
    let roles: Vec<Role> = graph
        .nodes()
        .iter()
        .map(|node| Role::from_shape(node.attrs.get("shape")))
        .collect();

    let mut summary = RelabelSummary::default();
    let mut in_nodes = Vec::new();
    let mut out_nodes = Vec::new();
    for (node, role) in graph.nodes().iter().zip(&roles) {
        match role {
            Role::In => {
                summary.in_markers += 1;
                in_nodes.push(node.name.clone());
            }
            Role::Out => {
                summary.out_markers += 1;
                out_nodes.push(node.name.clone());
            }
            Role::Diamond => summary.diamonds += 1,
            Role::Unclassified => summary.unclassified += 1,
        }
    }

    add_rank_group(graph, IN_GROUP, &in_nodes);
    add_rank_group(graph, OUT_GROUP, &out_nodes);

    for (node, role) in graph.nodes_mut().iter_mut().zip(roles) {
        if let Some(color) = role.color() {
            node.attrs.set("color", color);
        }
        node.attrs.set("shape", "box");
        node.attrs.set("style", "filled");
    }

    debug!(
        in_markers = summary.in_markers,
        out_markers = summary.out_markers,
        diamonds = summary.diamonds,
        unclassified = summary.unclassified,
        "relabeled graph"
    );
    summary
}

/// Add `members` to the named same-rank subgraph, creating it if needed.
fn add_rank_group(graph: &mut Graph, name: &str, members: &[String]) {
    let group = graph.subgraph_or_insert(name);
    group.attrs.set("rank", "same");
    for member in members {
        group.add_node(member);
    }
}
