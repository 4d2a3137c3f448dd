//! Pipeline configuration input.
//!
//! This module handles:
//! - Reading JSON or JSON5 configuration text
//! - Validating the `sources` / `transforms` / `sinks` layout
//! - Normalizing the two input reference encodings

mod parser;
mod types;

pub use types::{Component, ComponentKind, InputRef, PipelineConfig};

use crate::error::Result;

/// Text format of a pipeline configuration.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Json,
    Json5,
}

impl InputFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Json5 => "json5",
        }
    }
}

/// Parse configuration text in the given format.
///
/// # Errors
///
/// Returns an error if the text cannot be parsed or is not a pipeline.
pub fn parse(text: &str, format: InputFormat) -> Result<PipelineConfig> {
    match format {
        InputFormat::Json => PipelineConfig::from_json_str(text),
        InputFormat::Json5 => PipelineConfig::from_json5_str(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dispatches_on_format() {
        let text = r#"{"sources": {}, "transforms": {}, "sinks": {}}"#;
        assert!(parse(text, InputFormat::Json).is_ok());
        assert!(parse(text, InputFormat::Json5).is_ok());
        assert!(parse("{sources: {}, transforms: {}, sinks: {}}", InputFormat::Json).is_err());
    }
}
