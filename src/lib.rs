// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. graph::GraphModel)
    clippy::module_name_repetitions
)]

//! # Pipeviz
//!
//! Readable Graphviz diagrams of data pipeline configurations.
//!
//! Two independent converters:
//! - **graph**: a configuration with `sources`, `transforms` and `sinks`
//!   becomes a DOT digraph, sources and sinks pinned to their own ranks and
//!   edges labeled with output ports
//! - **clarify**: a DOT graph drawn with role shapes (trapezium, diamond,
//!   inverted trapezium) is regrouped and recolored in place
//!
//! ## Modules
//!
//! - [`pipeline`]: Configuration parsing and input references
//! - [`graph`]: Graph model and DOT rendering for configurations
//! - [`dot`]: DOT parser and writer
//! - [`relabel`]: Role-based regrouping of rendered graphs
//! - [`config`]: Saved CLI defaults
//! - [`input`]: File and stdin input
//! - [`perf`]: Phase timing

pub mod config;
pub mod dot;
pub mod error;
pub mod graph;
pub mod input;
pub mod perf;
pub mod pipeline;
pub mod relabel;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dot::Graph;
    pub use crate::graph::{GraphModel, RankDir, build};
    pub use crate::pipeline::{InputFormat, InputRef, PipelineConfig};
    pub use crate::relabel::clarify;
}

/// Configuration text to DOT text in one step.
///
/// # Errors
///
/// Returns an error if the configuration cannot be parsed.
pub fn config_to_dot(
    text: &str,
    format: pipeline::InputFormat,
    rankdir: graph::RankDir,
) -> Result<String> {
    let config = pipeline::parse(text, format)?;
    Ok(graph::build(&config, rankdir).to_dot())
}

/// DOT text to clarified DOT text in one step.
///
/// # Errors
///
/// Returns an error if the DOT text cannot be parsed.
pub fn clarify_dot(text: &str) -> Result<String> {
    let mut graph = dot::parse(text)?;
    relabel::clarify(&mut graph);
    Ok(dot::write(&graph))
}
