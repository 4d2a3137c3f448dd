//! Typed pipeline configuration model.

use serde::Deserialize;

/// Role of a component within the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Source,
    Transform,
    Sink,
}

impl ComponentKind {
    /// Top-level configuration key holding components of this kind.
    pub const fn section(self) -> &'static str {
        match self {
            Self::Source => "sources",
            Self::Transform => "transforms",
            Self::Sink => "sinks",
        }
    }

    /// Whether components of this kind declare upstream inputs.
    pub const fn takes_inputs(self) -> bool {
        !matches!(self, Self::Source)
    }
}

/// A reference from a component to one of its upstream outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRef {
    /// `"id"` or `"id.port"`.
    Compact(String),
    /// `{"component": "id", "port": "port"}`, as written by config converters.
    Structured {
        component: String,
        port: Option<String>,
    },
}

impl InputRef {
    /// Upstream component ID and optional port.
    ///
    /// Compact references split on the first `.` only, so `"a.b.c"` is
    /// component `a` with port `b.c`.
    pub fn upstream(&self) -> (&str, Option<&str>) {
        match self {
            Self::Compact(text) => match text.split_once('.') {
                Some((component, port)) => (component, Some(port)),
                None => (text.as_str(), None),
            },
            Self::Structured { component, port } => (component.as_str(), port.as_deref()),
        }
    }
}

/// Wire shape of a structured reference.
#[derive(Debug, Deserialize)]
pub(super) struct StructuredRef {
    pub component: String,
    #[serde(default)]
    pub port: Option<String>,
}

impl From<StructuredRef> for InputRef {
    fn from(raw: StructuredRef) -> Self {
        Self::Structured {
            component: raw.component,
            port: raw.port,
        }
    }
}

/// A named pipeline component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: String,
    pub kind: ComponentKind,
    /// Declared inputs, in order. Always empty for sources.
    pub inputs: Vec<InputRef>,
}

/// A whole pipeline configuration, components kept in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineConfig {
    pub sources: Vec<Component>,
    pub transforms: Vec<Component>,
    pub sinks: Vec<Component>,
}

impl PipelineConfig {
    /// Components of one kind.
    pub fn components(&self, kind: ComponentKind) -> &[Component] {
        match kind {
            ComponentKind::Source => &self.sources,
            ComponentKind::Transform => &self.transforms,
            ComponentKind::Sink => &self.sinks,
        }
    }
}
