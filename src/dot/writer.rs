//! DOT serialization.
//!
//! Every node is written once at graph level with its full attribute list,
//! ahead of any subgraph. `node [..]` and `edge [..]` defaults close each
//! scope so that reading the output back does not apply them a second time.

use std::fmt::Write;

use super::model::{Attributes, Endpoint, Graph, Subgraph};
use super::{quote_id, quote_value};

const INDENT: &str = "  ";

/// Serialize a graph to DOT text.
pub fn write(graph: &Graph) -> String {
    let mut out = String::new();
    if graph.strict {
        out.push_str("strict ");
    }
    out.push_str(graph.kind.keyword());
    if let Some(name) = &graph.name {
        let _ = write!(out, " {}", quote_id(name));
    }
    out.push_str(" {\n");

    write_attr_stmt(&mut out, 1, "graph", &graph.root.attrs);
    for node in graph.nodes() {
        let _ = writeln!(
            out,
            "{INDENT}{}{};",
            quote_id(&node.name),
            attr_list(&node.attrs)
        );
    }
    write_scope_tail(&mut out, graph, &graph.root, 1);

    out.push_str("}\n");
    out
}

fn write_subgraph(out: &mut String, graph: &Graph, sub: &Subgraph, depth: usize) {
    let pad = INDENT.repeat(depth);
    out.push_str(&pad);
    out.push_str("subgraph ");
    if let Some(name) = &sub.name {
        let _ = write!(out, "{} ", quote_id(name));
    }
    out.push_str("{\n");

    write_attr_stmt(out, depth + 1, "graph", &sub.attrs);
    if !sub.nodes.is_empty() {
        let members: Vec<_> = sub.nodes.iter().map(|n| quote_id(n)).collect();
        let _ = writeln!(out, "{pad}{INDENT}{};", members.join("; "));
    }
    write_scope_tail(out, graph, sub, depth + 1);

    out.push_str(&pad);
    out.push_str("}\n");
}

/// Nested subgraphs, the scope's edges, then its defaults.
fn write_scope_tail(out: &mut String, graph: &Graph, scope: &Subgraph, depth: usize) {
    for sub in &scope.subgraphs {
        write_subgraph(out, graph, sub, depth);
    }
    let pad = INDENT.repeat(depth);
    let op = graph.kind.edge_op();
    for &index in &scope.edges {
        let edge = &graph.edges[index];
        let _ = writeln!(
            out,
            "{pad}{} {op} {}{};",
            endpoint(&edge.tail),
            endpoint(&edge.head),
            attr_list(&edge.attrs)
        );
    }
    write_attr_stmt(out, depth, "node", &scope.node_defaults);
    write_attr_stmt(out, depth, "edge", &scope.edge_defaults);
}

fn write_attr_stmt(out: &mut String, depth: usize, keyword: &str, attrs: &Attributes) {
    if !attrs.is_empty() {
        let _ = writeln!(out, "{}{keyword}{};", INDENT.repeat(depth), attr_list(attrs));
    }
}

fn endpoint(endpoint: &Endpoint) -> String {
    let mut text = quote_id(&endpoint.node).into_owned();
    if let Some(port) = &endpoint.port {
        for part in port.split(':') {
            text.push(':');
            text.push_str(&quote_id(part));
        }
    }
    text
}

/// ` [k=v, ...]`, or nothing for an empty map.
fn attr_list(attrs: &Attributes) -> String {
    if attrs.is_empty() {
        return String::new();
    }
    let items: Vec<String> = attrs
        .iter()
        .map(|(key, value)| format!("{}={}", quote_id(key), quote_value(value)))
        .collect();
    format!(" [{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::super::parse;
    use super::*;

    #[test]
    fn test_write_simple_digraph() {
        let graph = parse("digraph G { a -> b [label=\"x y\"] }").unwrap();
        assert_eq!(
            write(&graph),
            "digraph G {\n  a;\n  b;\n  a -> b [label=\"x y\"];\n}\n"
        );
    }

    #[test]
    fn test_write_subgraph_and_defaults() {
        let graph = parse(
            "digraph { rankdir=LR; node [shape=box]; subgraph s { rank=same; a } a -> b }",
        )
        .unwrap();
        let expected = "\
digraph {
  graph [rankdir=LR];
  a [shape=box];
  b [shape=box];
  subgraph s {
    graph [rank=same];
    a;
  }
  a -> b;
  node [shape=box];
}
";
        assert_eq!(write(&graph), expected);
    }

    #[test]
    fn test_write_is_a_fixed_point() {
        let src = r#"
            strict digraph "pipe line" {
                node [shape=trapezium, color=blue];
                in1 [label=<<b>in</b>>];
                node [shape=diamond];
                t1;
                subgraph cluster_x { edge [style=dashed]; t1 -> out1:p:n [label="say \"hi\""] }
                in1 -> t1;
                "my-node" -> in1;
            }
        "#;
        let once = write(&parse(src).unwrap());
        let twice = write(&parse(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_reparse_preserves_node_attributes() {
        let src = "digraph { a; node [color=red]; b; subgraph s { node [shape=box]; c } }";
        let original = parse(src).unwrap();
        let reparsed = parse(&write(&original)).unwrap();
        assert_eq!(original.nodes(), reparsed.nodes());
    }

    #[test]
    fn test_write_undirected_with_ports() {
        let graph = parse("graph { a:n -- \"b c\":s }").unwrap();
        assert!(write(&graph).contains("a:n -- \"b c\":s;"));
    }
}
