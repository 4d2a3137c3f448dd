//! Conversion of raw JSON values into a [`PipelineConfig`].

use serde_json::{Map, Value};

use super::types::{Component, ComponentKind, InputRef, PipelineConfig, StructuredRef};
use crate::error::{Error, Result, json_type_name};

const KINDS: [ComponentKind; 3] = [
    ComponentKind::Source,
    ComponentKind::Transform,
    ComponentKind::Sink,
];

impl PipelineConfig {
    /// Parse a JSON configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use pipeviz::pipeline::PipelineConfig;
    ///
    /// let config = PipelineConfig::from_json_str(
    ///     r#"{"sources": {"in": {}}, "transforms": {}, "sinks": {"out": {"inputs": ["in"]}}}"#,
    /// ).unwrap();
    /// assert_eq!(config.sinks[0].inputs.len(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or does not describe a
    /// pipeline (see [`PipelineConfig::from_value`]).
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    /// Parse a JSON5 configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON5 or does not describe a
    /// pipeline.
    pub fn from_json5_str(text: &str) -> Result<Self> {
        let value: Value = json5::from_str(text)?;
        Self::from_value(&value)
    }

    /// Build a typed configuration from an already-parsed value.
    ///
    /// Top-level keys other than `sources`, `transforms` and `sinks` are
    /// ignored. Everything is validated here, before any graph exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the root or a section is not an object, if a
    /// section is missing, if a transform or sink is not an object, or if an input reference is neither a
    /// string nor a `{component, port}` object.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(Error::InvalidRoot {
                found: json_type_name(value),
            });
        };

        let mut config = Self::default();
        for kind in KINDS {
            let components = parse_section(root, kind)?;
            match kind {
                ComponentKind::Source => config.sources = components,
                ComponentKind::Transform => config.transforms = components,
                ComponentKind::Sink => config.sinks = components,
            }
        }
        Ok(config)
    }
}

fn parse_section(root: &Map<String, Value>, kind: ComponentKind) -> Result<Vec<Component>> {
    let section = kind.section();
    let value = root.get(section).ok_or(Error::MissingSection(section))?;
    let Value::Object(entries) = value else {
        return Err(Error::InvalidSection {
            section,
            found: json_type_name(value),
        });
    };
    entries
        .iter()
        .map(|(id, body)| parse_component(id, body, kind))
        .collect()
}

fn parse_component(id: &str, body: &Value, kind: ComponentKind) -> Result<Component> {
    // Source bodies are never read.
    let mut inputs = Vec::new();
    if kind.takes_inputs() {
        let Value::Object(fields) = body else {
            return Err(Error::InvalidComponent {
                id: id.to_string(),
                reason: format!("expected an object, found {}", json_type_name(body)),
            });
        };
        match fields.get("inputs") {
            None => {}
            Some(Value::Array(items)) => {
                for item in items {
                    inputs.push(parse_input(id, item)?);
                }
            }
            Some(other) => {
                return Err(Error::InvalidComponent {
                    id: id.to_string(),
                    reason: format!("`inputs` must be an array, found {}", json_type_name(other)),
                });
            }
        }
    }

    Ok(Component {
        id: id.to_string(),
        kind,
        inputs,
    })
}

fn parse_input(component: &str, value: &Value) -> Result<InputRef> {
    match value {
        Value::String(text) => Ok(InputRef::Compact(text.clone())),
        Value::Object(_) => serde_json::from_value::<StructuredRef>(value.clone())
            .map(InputRef::from)
            .map_err(|source| Error::InvalidInputReference {
                component: component.to_string(),
                source,
            }),
        other => Err(Error::UnexpectedInputEncoding {
            component: component.to_string(),
            found: json_type_name(other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_keeps_input_order() {
        let config = PipelineConfig::from_json_str(
            r#"{
                "sources": {"zeta": {}, "alpha": {}},
                "transforms": {"t2": {"inputs": ["zeta"]}, "t1": {"inputs": ["alpha"]}},
                "sinks": {}
            }"#,
        )
        .unwrap();
        let sources: Vec<_> = config.sources.iter().map(|c| c.id.as_str()).collect();
        let transforms: Vec<_> = config.transforms.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(sources, ["zeta", "alpha"]);
        assert_eq!(transforms, ["t2", "t1"]);
    }

    #[test]
    fn test_from_value_accepts_both_reference_encodings() {
        let config = PipelineConfig::from_value(&json!({
            "sources": {},
            "transforms": {},
            "sinks": {"k": {"inputs": ["a.p", {"component": "b"}, {"component": "c", "port": null}]}}
        }))
        .unwrap();
        assert_eq!(
            config.sinks[0].inputs,
            vec![
                InputRef::Compact("a.p".to_string()),
                InputRef::Structured {
                    component: "b".to_string(),
                    port: None
                },
                InputRef::Structured {
                    component: "c".to_string(),
                    port: None
                },
            ]
        );
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let err = PipelineConfig::from_value(&json!({"sources": {}, "sinks": {}})).unwrap_err();
        assert!(matches!(err, Error::MissingSection("transforms")));
    }

    #[test]
    fn test_section_must_be_an_object() {
        let err = PipelineConfig::from_value(&json!({"sources": [], "transforms": {}, "sinks": {}}))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSection {
                section: "sources",
                found: "array"
            }
        ));
    }

    #[test]
    fn test_numeric_input_is_unexpected_encoding() {
        let err = PipelineConfig::from_value(&json!({
            "sources": {},
            "transforms": {"t": {"inputs": [42]}},
            "sinks": {}
        }))
        .unwrap_err();
        match err {
            Error::UnexpectedInputEncoding { component, found } => {
                assert_eq!(component, "t");
                assert_eq!(found, "number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_structured_input_requires_component() {
        let err = PipelineConfig::from_value(&json!({
            "sources": {},
            "transforms": {},
            "sinks": {"k": {"inputs": [{"port": "x"}]}}
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInputReference { .. }));
    }

    #[test]
    fn test_inputs_must_be_an_array() {
        let err = PipelineConfig::from_value(&json!({
            "sources": {},
            "transforms": {"t": {"inputs": "a"}},
            "sinks": {}
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { .. }));
    }

    #[test]
    fn test_source_inputs_are_ignored() {
        let config = PipelineConfig::from_value(&json!({
            "sources": {"s": {"inputs": [1, 2, 3]}},
            "transforms": {},
            "sinks": {}
        }))
        .unwrap();
        assert!(config.sources[0].inputs.is_empty());
    }

    #[test]
    fn test_source_body_may_be_any_value() {
        let config = PipelineConfig::from_value(&json!({
            "sources": {"a": null, "b": "file", "c": 3},
            "transforms": {},
            "sinks": {"k": {"inputs": ["a", "b", "c"]}}
        }))
        .unwrap();
        let sources: Vec<_> = config.sources.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(sources, ["a", "b", "c"]);
    }

    #[test]
    fn test_sink_body_must_be_an_object() {
        let err = PipelineConfig::from_value(&json!({
            "sources": {},
            "transforms": {},
            "sinks": {"k": ["a"]}
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidComponent { .. }));
    }

    #[test]
    fn test_json5_configuration() {
        let config = PipelineConfig::from_json5_str(
            "{sources: {s: {}}, transforms: {}, sinks: {k: {inputs: ['s'],},}, // trailing\n}",
        )
        .unwrap();
        assert_eq!(config.sinks[0].inputs, vec![InputRef::Compact("s".to_string())]);
    }

    #[test]
    fn test_non_object_root_is_rejected() {
        let err = PipelineConfig::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::InvalidRoot { found: "array" }));
    }
}
