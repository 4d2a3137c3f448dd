//! Graph model accumulated from a pipeline configuration.

use std::fmt;
use std::fmt::Write;

use crate::dot::{escape_string, quote_id};

/// Graphviz `rankdir`.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankDir {
    #[default]
    #[value(name = "TB")]
    TopToBottom,
    #[value(name = "BT")]
    BottomToTop,
    #[value(name = "LR")]
    LeftToRight,
    #[value(name = "RL")]
    RightToLeft,
}

impl RankDir {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TB" => Some(Self::TopToBottom),
            "BT" => Some(Self::BottomToTop),
            "LR" => Some(Self::LeftToRight),
            "RL" => Some(Self::RightToLeft),
            _ => None,
        }
    }
}

impl fmt::Display for RankDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data flow from an upstream component into a downstream one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub upstream: String,
    pub downstream: String,
    /// Output port of the upstream component, if it has named outputs.
    pub label: Option<String>,
}

impl Edge {
    /// `upstream -> downstream`, plus `[label="..."]` when a port is set.
    pub fn to_dot(&self) -> String {
        let mut out = format!("{} -> {}", quote_id(&self.upstream), quote_id(&self.downstream));
        if let Some(label) = &self.label {
            let _ = write!(out, " [label=\"{}\"]", escape_string(label));
        }
        out
    }
}

/// Components grouped by role plus the edges between them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphModel {
    pub sources: Vec<String>,
    pub transforms: Vec<String>,
    pub sinks: Vec<String>,
    pub edges: Vec<Edge>,
    pub rankdir: RankDir,
}

impl GraphModel {
    pub fn new(rankdir: RankDir) -> Self {
        Self {
            rankdir,
            ..Self::default()
        }
    }

    /// Edges whose upstream is not a declared component.
    pub fn dangling_inputs(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|edge| {
            !self
                .sources
                .iter()
                .chain(&self.transforms)
                .chain(&self.sinks)
                .any(|id| *id == edge.upstream)
        })
    }

    /// Render as DOT.
    ///
    /// Sources and sinks each sit in a same-rank subgraph with their own
    /// color; transforms take the graph-wide default.
    pub fn to_dot(&self) -> String {
        let join = |ids: &[String]| {
            ids.iter()
                .map(|id| quote_id(id))
                .collect::<Vec<_>>()
                .join("; ")
        };
        let edges = self
            .edges
            .iter()
            .map(Edge::to_dot)
            .collect::<Vec<_>>()
            .join("; ");

        format!(
            "\
digraph pipeline_configuration {{
  graph [rankdir={rankdir}]
  node [shape=box, style=filled, color=orange]

  subgraph sources {{
    graph [rank=same]
    node [color=green]
    {sources}
  }}

  subgraph sinks {{
    graph [rank=same]
    node [color=magenta]
    {sinks}
  }}

  {transforms}

  {edges}
}}
",
            rankdir = self.rankdir,
            sources = join(&self.sources),
            sinks = join(&self.sinks),
            transforms = join(&self.transforms),
        )
    }
}
