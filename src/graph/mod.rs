//! Pipeline configuration to DOT.
//!
//! [`build`] walks a [`PipelineConfig`] once, in a fixed order, and
//! [`GraphModel::to_dot`] renders the result. The order decides the output
//! text:
//! 1. source IDs
//! 2. transform IDs
//! 3. sink IDs
//! 4. edges of every transform, then of every sink, in declared input order

mod model;

pub use model::{Edge, GraphModel, RankDir};

use tracing::{debug, warn};

use crate::pipeline::{ComponentKind, InputRef, PipelineConfig};

/// Turn one input reference of `downstream` into an edge.
pub fn resolve(input: &InputRef, downstream: &str) -> Edge {
    let (upstream, port) = input.upstream();
    Edge {
        upstream: upstream.to_string(),
        downstream: downstream.to_string(),
        label: port.map(str::to_string),
    }
}

/// Build the graph model of a configuration.
///
/// Upstream IDs are not checked against declared components; edges from
/// unknown IDs are kept and reported with a warning.
///
/// # Example
///
/// ```
/// use pipeviz::graph::{build, RankDir};
/// use pipeviz::pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_json_str(
///     r#"{"sources": {"s1": {}}, "transforms": {"t1": {"inputs": ["s1"]}}, "sinks": {}}"#,
/// ).unwrap();
/// let model = build(&config, RankDir::TopToBottom);
/// assert_eq!(model.edges[0].to_dot(), "s1 -> t1");
/// ```
pub fn build(config: &PipelineConfig, rankdir: RankDir) -> GraphModel {
    let mut model = GraphModel::new(rankdir);
    let ids = |kind: ComponentKind| config.components(kind).iter().map(|c| c.id.clone());
    model.sources.extend(ids(ComponentKind::Source));
    model.transforms.extend(ids(ComponentKind::Transform));
    model.sinks.extend(ids(ComponentKind::Sink));

    for component in config.transforms.iter().chain(&config.sinks) {
        for input in &component.inputs {
            model.edges.push(resolve(input, &component.id));
        }
    }

    for edge in model.dangling_inputs() {
        warn!(
            upstream = %edge.upstream,
            downstream = %edge.downstream,
            "input refers to an undeclared component"
        );
    }
    debug!(
        sources = model.sources.len(),
        transforms = model.transforms.len(),
        sinks = model.sinks.len(),
        edges = model.edges.len(),
        "built pipeline graph"
    );
    model
}
