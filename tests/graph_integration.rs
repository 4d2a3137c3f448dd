use pipeviz::graph::{build, RankDir};
use pipeviz::pipeline::{InputFormat, PipelineConfig};
use pipeviz::{config_to_dot, dot, Error};

const PIPELINE: &str = include_str!("fixtures/pipeline.json");
const EXPECTED: &str = include_str!("fixtures/pipeline.dot");

#[test]
fn test_fixture_renders_byte_for_byte() {
    let dot_text = config_to_dot(PIPELINE, InputFormat::Json, RankDir::TopToBottom).unwrap();
    assert_eq!(dot_text, EXPECTED);
}

#[test]
fn test_rankdir_is_applied() {
    let dot_text = config_to_dot(PIPELINE, InputFormat::Json, RankDir::RightToLeft).unwrap();
    assert!(dot_text.contains("  graph [rankdir=RL]\n"));
}

#[test]
fn test_spec_example_edges() {
    let config = PipelineConfig::from_json_str(
        r#"{"sources": {"s1": {}}, "transforms": {"t1": {"inputs": ["s1"]}}, "sinks": {"k1": {"inputs": [{"component": "t1", "port": "x"}]}}}"#,
    )
    .unwrap();
    let dot_text = build(&config, RankDir::TopToBottom).to_dot();
    assert!(dot_text.ends_with("  s1 -> t1; t1 -> k1 [label=\"x\"]\n}\n"), "{dot_text}");
}

#[test]
fn test_output_is_valid_dot_with_role_colors() {
    let dot_text = config_to_dot(PIPELINE, InputFormat::Json, RankDir::TopToBottom).unwrap();
    let graph = dot::parse(&dot_text).unwrap();

    let color = |name: &str| graph.node(name).unwrap().attrs.get("color").map(str::to_string);
    assert_eq!(color("in_logs").as_deref(), Some("green"));
    assert_eq!(color("archive").as_deref(), Some("magenta"));
    assert_eq!(color("route").as_deref(), Some("orange"));
    assert_eq!(graph.edges.len(), 7);
    assert_eq!(graph.edges[2].attrs.get("label"), Some("errors"));
    assert_eq!(graph.subgraph("sources").unwrap().nodes, ["in_logs", "in_metrics"]);
}

#[test]
fn test_quoted_label_round_trips() {
    let text = r#"{"sources": {"a": {}}, "transforms": {}, "sinks": {"k": {"inputs": ["a.say \"hi\""]}}}"#;
    let dot_text = config_to_dot(text, InputFormat::Json, RankDir::TopToBottom).unwrap();
    let graph = dot::parse(&dot_text).unwrap();
    assert_eq!(graph.edges[0].attrs.get("label"), Some("say \"hi\""));
}

#[test]
fn test_ids_that_need_quoting_stay_parseable() {
    let text = r#"{"sources": {"my-source": {}}, "transforms": {}, "sinks": {"out sink": {"inputs": ["my-source"]}}}"#;
    let dot_text = config_to_dot(text, InputFormat::Json, RankDir::TopToBottom).unwrap();
    let graph = dot::parse(&dot_text).unwrap();
    assert!(graph.node("my-source").is_some());
    assert_eq!(graph.edges[0].head.node, "out sink");
}

#[test]
fn test_trailing_backslashes_stay_parseable() {
    let text = r#"{"sources": {"dir\\": {}}, "transforms": {}, "sinks": {"k": {"inputs": ["dir\\", "a.say \"hi\"\\"]}}}"#;
    let dot_text = config_to_dot(text, InputFormat::Json, RankDir::TopToBottom).unwrap();
    let graph = dot::parse(&dot_text).unwrap();
    assert!(graph.contains_node(r"dir\"));
    assert_eq!(graph.edges[0].tail.node, r"dir\");
    assert_eq!(graph.edges[1].attrs.get("label"), Some(r#"say "hi"\"#));
}

#[test]
fn test_malformed_configuration_produces_no_graph() {
    let text = r#"{"sources": {}, "transforms": {"t": {"inputs": [true]}}, "sinks": {}}"#;
    let err = config_to_dot(text, InputFormat::Json, RankDir::TopToBottom).unwrap_err();
    assert!(matches!(err, Error::UnexpectedInputEncoding { .. }));

    let err = config_to_dot(r#"{"sources": {}}"#, InputFormat::Json, RankDir::TopToBottom)
        .unwrap_err();
    assert!(matches!(err, Error::MissingSection(_)));
}

#[test]
fn test_json5_matches_json() {
    let json5 = "{sources: {in_logs: {}}, transforms: {}, sinks: {out: {inputs: ['in_logs'],},},}";
    let json = r#"{"sources": {"in_logs": {}}, "transforms": {}, "sinks": {"out": {"inputs": ["in_logs"]}}}"#;
    assert_eq!(
        config_to_dot(json5, InputFormat::Json5, RankDir::TopToBottom).unwrap(),
        config_to_dot(json, InputFormat::Json, RankDir::TopToBottom).unwrap()
    );
}
