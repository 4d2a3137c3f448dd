//! Recursive-descent DOT parser.
//!
//! Statements are applied to a [`Graph`] as they are read, the way Graphviz
//! does it: a node picks up the `node [..]` defaults of its enclosing scopes
//! at the moment it is first mentioned, and later default changes do not
//! touch it.

use super::lexer::{Token, TokenKind, tokenize};
use super::model::{AttrValue, Attributes, Edge, Endpoint, Graph, GraphKind, Subgraph};
use crate::error::{Error, Result};

/// Parse DOT source into a [`Graph`].
///
/// # Example
///
/// ```
/// let graph = pipeviz::dot::parse("digraph { a -> b [label=x] }").unwrap();
/// assert_eq!(graph.nodes().len(), 2);
/// assert_eq!(graph.edges[0].attrs.get("label"), Some("x"));
/// ```
///
/// # Errors
///
/// Returns [`Error::DotSyntax`] with the position of the offending token.
pub fn parse(src: &str) -> Result<Graph> {
    let tokens = tokenize(src)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        graph: Graph::new(GraphKind::Directed, None),
        path: Vec::new(),
    };
    parser.parse_graph()?;
    Ok(parser.graph)
}

/// One side of an edge operator.
enum Operand {
    Node(Endpoint),
    Group(Vec<String>),
}

impl Operand {
    fn endpoints(&self) -> Vec<Endpoint> {
        match self {
            Self::Node(endpoint) => vec![endpoint.clone()],
            Self::Group(names) => names
                .iter()
                .map(|name| Endpoint {
                    node: name.clone(),
                    port: None,
                })
                .collect(),
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    graph: Graph,
    /// Child indices from the root to the scope being filled.
    path: Vec<usize>,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn bump(&mut self) -> Option<TokenKind> {
        let token = self.tokens.get(self.pos)?.kind.clone();
        self.pos += 1;
        Some(token)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        let (line, column) = self
            .tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or((1, 1), |t| (t.line, t.column));
        let message = if self.pos >= self.tokens.len() {
            format!("{} (found end of input)", message.into())
        } else {
            message.into()
        };
        Error::DotSyntax {
            line,
            column,
            message,
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<()> {
        if self.peek() == Some(kind) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {what}")))
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(TokenKind::Ident(word)) if word.eq_ignore_ascii_case(keyword))
    }

    fn at_edge_op(&self) -> bool {
        matches!(self.peek(), Some(TokenKind::Arrow | TokenKind::Line))
    }

    fn at_subgraph(&self) -> bool {
        self.at_keyword("subgraph") || self.peek() == Some(&TokenKind::LBrace)
    }

    fn scope_mut(&mut self) -> &mut Subgraph {
        self.graph.root.descend_mut(&self.path)
    }

    /// Defaults visible from the current scope, outermost first.
    fn effective_defaults(&self, edges: bool) -> Attributes {
        let mut scope = &self.graph.root;
        let pick = |s: &Subgraph| if edges { s.edge_defaults.clone() } else { s.node_defaults.clone() };
        let mut resolved = pick(scope);
        for &i in &self.path {
            scope = &scope.subgraphs[i];
            resolved.merge(&pick(scope));
        }
        resolved
    }

    fn parse_graph(&mut self) -> Result<()> {
        if self.at_keyword("strict") {
            self.pos += 1;
            self.graph.strict = true;
        }
        self.graph.kind = if self.at_keyword("digraph") {
            GraphKind::Directed
        } else if self.at_keyword("graph") {
            GraphKind::Undirected
        } else {
            return Err(self.error("expected `graph` or `digraph`"));
        };
        self.pos += 1;

        if self.peek() != Some(&TokenKind::LBrace) {
            self.graph.name = Some(self.parse_id()?.text);
        }
        self.expect(&TokenKind::LBrace, "`{`")?;
        self.parse_stmt_list()?;
        self.expect(&TokenKind::RBrace, "`}`")?;

        if self.pos < self.tokens.len() {
            return Err(self.error("unexpected content after the graph"));
        }
        Ok(())
    }

    fn parse_stmt_list(&mut self) -> Result<()> {
        while !matches!(self.peek(), Some(TokenKind::RBrace) | None) {
            self.parse_stmt()?;
            if self.peek() == Some(&TokenKind::Semicolon) {
                self.pos += 1;
            }
        }
        Ok(())
    }

    fn parse_stmt(&mut self) -> Result<()> {
        for keyword in ["graph", "node", "edge"] {
            if self.at_keyword(keyword) && self.peek_at(1) == Some(&TokenKind::LBracket) {
                self.pos += 1;
                let attrs = self.parse_attr_lists()?;
                let scope = self.scope_mut();
                match keyword {
                    "graph" => scope.attrs.merge(&attrs),
                    "node" => scope.node_defaults.merge(&attrs),
                    _ => scope.edge_defaults.merge(&attrs),
                }
                return Ok(());
            }
        }

        if self.at_subgraph() {
            let members = self.parse_subgraph()?;
            if self.at_edge_op() {
                self.parse_edge_stmt(Operand::Group(members))?;
            }
            return Ok(());
        }

        if self.peek_at(1) == Some(&TokenKind::Equals) {
            let key = self.parse_id()?.text;
            self.pos += 1;
            let value = self.parse_id()?;
            self.scope_mut().attrs.set_value(key, value);
            return Ok(());
        }

        let endpoint = self.parse_endpoint()?;
        if self.at_edge_op() {
            self.declare_node(&endpoint.node, &Attributes::new());
            return self.parse_edge_stmt(Operand::Node(endpoint));
        }
        let attrs = self.parse_attr_lists()?;
        self.declare_node(&endpoint.node, &attrs);
        Ok(())
    }

    fn parse_id(&mut self) -> Result<AttrValue> {
        match self.peek() {
            Some(TokenKind::Ident(text)) => {
                let reserved = ["node", "edge", "graph", "digraph", "subgraph", "strict"]
                    .iter()
                    .any(|k| text.eq_ignore_ascii_case(k));
                if reserved {
                    return Err(self.error(format!("keyword `{text}` cannot be used as an ID")));
                }
                let value = AttrValue::plain(text.clone());
                self.pos += 1;
                Ok(value)
            }
            Some(TokenKind::Quoted(text)) => {
                let value = AttrValue::plain(text.clone());
                self.pos += 1;
                Ok(value)
            }
            Some(TokenKind::Html(text)) => {
                let value = AttrValue::html(text.clone());
                self.pos += 1;
                Ok(value)
            }
            _ => Err(self.error("expected an ID")),
        }
    }

    fn parse_endpoint(&mut self) -> Result<Endpoint> {
        let node = self.parse_id()?.text;
        let mut parts = Vec::new();
        while self.peek() == Some(&TokenKind::Colon) && parts.len() < 2 {
            self.pos += 1;
            parts.push(self.parse_id()?.text);
        }
        let port = if parts.is_empty() {
            None
        } else {
            Some(parts.join(":"))
        };
        Ok(Endpoint { node, port })
    }

    /// One or more `[k=v, ...]` lists, merged in order.
    fn parse_attr_lists(&mut self) -> Result<Attributes> {
        let mut attrs = Attributes::new();
        while self.peek() == Some(&TokenKind::LBracket) {
            self.pos += 1;
            while self.peek() != Some(&TokenKind::RBracket) {
                let key = self.parse_id()?.text;
                self.expect(&TokenKind::Equals, "`=` in attribute list")?;
                let value = self.parse_id()?;
                attrs.set_value(key, value);
                if matches!(self.peek(), Some(TokenKind::Comma | TokenKind::Semicolon)) {
                    self.pos += 1;
                }
            }
            self.pos += 1;
        }
        Ok(attrs)
    }

    /// Parse a subgraph body and return every node it contains.
    fn parse_subgraph(&mut self) -> Result<Vec<String>> {
        let mut name = None;
        if self.at_keyword("subgraph") {
            self.pos += 1;
            if self.peek() != Some(&TokenKind::LBrace) {
                name = Some(self.parse_id()?.text);
            }
        }
        self.expect(&TokenKind::LBrace, "`{` to open subgraph")?;

        // Subgraph names are global, so a repeated name reopens the original.
        let existing = name.as_deref().and_then(|n| self.graph.root.find_path(n));
        let saved = std::mem::take(&mut self.path);
        self.path = if let Some(path) = existing {
            path
        } else {
            let parent = self.graph.root.descend_mut(&saved);
            parent.subgraphs.push(Subgraph {
                name,
                ..Subgraph::default()
            });
            let mut path = saved.clone();
            path.push(parent.subgraphs.len() - 1);
            path
        };

        self.parse_stmt_list()?;
        self.expect(&TokenKind::RBrace, "`}` to close subgraph")?;

        let members = self.scope_mut().all_nodes();
        self.path = saved;
        Ok(members)
    }

    fn parse_edge_stmt(&mut self, first: Operand) -> Result<()> {
        let mut operands = vec![first];
        while self.at_edge_op() {
            let wanted = match self.graph.kind {
                GraphKind::Directed => TokenKind::Arrow,
                GraphKind::Undirected => TokenKind::Line,
            };
            if self.peek() != Some(&wanted) {
                return Err(self.error(format!(
                    "edge operator must be `{}` in a {}",
                    self.graph.kind.edge_op(),
                    self.graph.kind.keyword()
                )));
            }
            self.pos += 1;

            let operand = if self.at_subgraph() {
                Operand::Group(self.parse_subgraph()?)
            } else {
                let endpoint = self.parse_endpoint()?;
                self.declare_node(&endpoint.node, &Attributes::new());
                Operand::Node(endpoint)
            };
            operands.push(operand);
        }

        let explicit = self.parse_attr_lists()?;
        let mut attrs = self.effective_defaults(true);
        attrs.merge(&explicit);

        for pair in operands.windows(2) {
            for tail in pair[0].endpoints() {
                for head in pair[1].endpoints() {
                    self.add_edge(tail.clone(), head, &attrs);
                }
            }
        }
        Ok(())
    }

    fn add_edge(&mut self, tail: Endpoint, head: Endpoint, attrs: &Attributes) {
        if self.graph.strict {
            let undirected = self.graph.kind == GraphKind::Undirected;
            let duplicate = self.graph.edges.iter_mut().find(|e| {
                (e.tail.node == tail.node && e.head.node == head.node)
                    || (undirected && e.tail.node == head.node && e.head.node == tail.node)
            });
            if let Some(edge) = duplicate {
                edge.attrs.merge(attrs);
                return;
            }
        }
        let index = self.graph.edges.len();
        self.graph.edges.push(Edge {
            tail,
            head,
            attrs: attrs.clone(),
        });
        self.scope_mut().edges.push(index);
    }

    fn declare_node(&mut self, name: &str, explicit: &Attributes) {
        if self.graph.contains_node(name) {
            if let Some(attrs) = self.graph.node_attrs_mut(name) {
                attrs.merge(explicit);
            }
        } else {
            let mut attrs = self.effective_defaults(false);
            attrs.merge(explicit);
            self.graph.insert_node(name, attrs);
        }
        self.scope_mut().add_node(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_graph_header() {
        let graph = parse("strict digraph \"my graph\" {}").unwrap();
        assert!(graph.strict);
        assert_eq!(graph.kind, GraphKind::Directed);
        assert_eq!(graph.name.as_deref(), Some("my graph"));
        assert!(graph.nodes().is_empty());
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let graph = parse("DiGraph { NODE [shape=box]; a }").unwrap();
        assert_eq!(graph.node("a").unwrap().attrs.get("shape"), Some("box"));
    }

    #[test]
    fn test_node_defaults_apply_at_creation_only() {
        let graph = parse("digraph { a; node [color=red]; b; a [label=A] }").unwrap();
        assert_eq!(graph.node("a").unwrap().attrs.get("color"), None);
        assert_eq!(graph.node("a").unwrap().attrs.get("label"), Some("A"));
        assert_eq!(graph.node("b").unwrap().attrs.get("color"), Some("red"));
    }

    #[test]
    fn test_subgraph_defaults_are_scoped() {
        let graph = parse(
            "digraph { node [shape=box]; subgraph s { node [color=green]; x } y }",
        )
        .unwrap();
        let x = &graph.node("x").unwrap().attrs;
        let y = &graph.node("y").unwrap().attrs;
        assert_eq!(x.get("shape"), Some("box"));
        assert_eq!(x.get("color"), Some("green"));
        assert_eq!(y.get("color"), None);
        assert_eq!(graph.subgraph("s").unwrap().nodes, ["x"]);
    }

    #[test]
    fn test_edge_chain_and_attributes() {
        let graph = parse("digraph { edge [color=blue]; a -> b -> c [label=\"x\"] }").unwrap();
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0].tail.node, "a");
        assert_eq!(graph.edges[1].head.node, "c");
        for edge in &graph.edges {
            assert_eq!(edge.attrs.get("color"), Some("blue"));
            assert_eq!(edge.attrs.get("label"), Some("x"));
        }
        let names: Vec<_> = graph.nodes().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_subgraph_operand_expands_to_all_members() {
        let graph = parse("digraph { {a b} -> c }").unwrap();
        let pairs: Vec<_> = graph
            .edges
            .iter()
            .map(|e| (e.tail.node.as_str(), e.head.node.as_str()))
            .collect();
        assert_eq!(pairs, [("a", "c"), ("b", "c")]);
    }

    #[test]
    fn test_ports_are_kept_on_endpoints() {
        let graph = parse("digraph { a:out:s -> b:in }").unwrap();
        assert_eq!(graph.edges[0].tail.port.as_deref(), Some("out:s"));
        assert_eq!(graph.edges[0].head.port.as_deref(), Some("in"));
    }

    #[test]
    fn test_graph_attribute_statement() {
        let graph = parse("digraph { rankdir=LR; graph [bgcolor=white] }").unwrap();
        assert_eq!(graph.root.attrs.get("rankdir"), Some("LR"));
        assert_eq!(graph.root.attrs.get("bgcolor"), Some("white"));
    }

    #[test]
    fn test_html_label() {
        let graph = parse("digraph { a [label=<<i>x</i>>] }").unwrap();
        let label = graph.node("a").unwrap().attrs.get_value("label").unwrap();
        assert!(label.html);
        assert_eq!(label.text, "<i>x</i>");
    }

    #[test]
    fn test_repeated_subgraph_name_reopens_it() {
        let graph = parse("digraph { subgraph s { a } subgraph s { b } }").unwrap();
        assert_eq!(graph.root.subgraphs.len(), 1);
        assert_eq!(graph.subgraph("s").unwrap().nodes, ["a", "b"]);
    }

    #[test]
    fn test_strict_graph_merges_duplicate_edges() {
        let graph = parse("strict graph { a -- b; b -- a [color=red] }").unwrap();
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.edges[0].attrs.get("color"), Some("red"));
    }

    #[test]
    fn test_wrong_edge_operator_is_rejected() {
        let err = parse("graph { a -> b }").unwrap_err();
        assert!(err.to_string().contains("must be `--`"), "{err}");
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse("digraph {\n  a -> b\n").unwrap_err();
        match err {
            Error::DotSyntax { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("end of input"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_trailing_content_is_rejected() {
        assert!(parse("digraph {} digraph {}").is_err());
    }

    #[test]
    fn test_keyword_as_node_name_is_rejected() {
        assert!(parse("digraph { node }").is_err());
    }
}
