//! Graphviz DOT reading and writing.
//!
//! This module handles:
//! - Tokenizing and parsing DOT source into a [`Graph`]
//! - Writing a [`Graph`] back to DOT
//! - Quoting IDs and attribute values

mod lexer;
mod model;
mod parser;
mod writer;

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

pub use model::{AttrValue, Attributes, Edge, Endpoint, Graph, GraphKind, Node, Subgraph};
pub use parser::parse;
pub use writer::write;

static BARE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_\x{80}-\x{10FFFF}][A-Za-z0-9_\x{80}-\x{10FFFF}]*$")
        .expect("identifier pattern is valid")
});

static NUMERAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(\.[0-9]+|[0-9]+(\.[0-9]*)?)$").expect("numeral pattern is valid")
});

const KEYWORDS: &[&str] = &["node", "edge", "graph", "digraph", "subgraph", "strict"];

/// Escape text for the inside of a DOT quoted string.
///
/// `"` becomes `\"`. A backslash is doubled only where the reader would
/// otherwise join it with what follows: before `"`, another backslash, a line
/// break, or the closing quote. Label escapes such as `\n` and `\l` pass
/// through untouched.
///
/// ```
/// use pipeviz::dot::escape_string;
///
/// assert_eq!(escape_string(r#"say "hi""#), r#"say \"hi\""#);
/// assert_eq!(escape_string(r"dir\"), r"dir\\");
/// assert_eq!(escape_string(r"a\nb"), r"a\nb");
/// ```
pub fn escape_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => {
                out.push('\\');
                if matches!(chars.peek(), None | Some('"' | '\\' | '\n' | '\r')) {
                    out.push('\\');
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Write `id` bare when DOT allows it, quoted otherwise.
///
/// ```
/// use pipeviz::dot::quote_id;
///
/// assert_eq!(quote_id("in_1"), "in_1");
/// assert_eq!(quote_id("-2.5"), "-2.5");
/// assert_eq!(quote_id("my-source"), "\"my-source\"");
/// assert_eq!(quote_id("node"), "\"node\"");
/// ```
pub fn quote_id(id: &str) -> Cow<'_, str> {
    let keyword = KEYWORDS.iter().any(|k| id.eq_ignore_ascii_case(k));
    if !keyword && (BARE_ID.is_match(id) || NUMERAL.is_match(id)) {
        Cow::Borrowed(id)
    } else {
        Cow::Owned(format!("\"{}\"", escape_string(id)))
    }
}

/// Write an attribute value: HTML values in angle brackets, others via [`quote_id`].
pub fn quote_value(value: &AttrValue) -> Cow<'_, str> {
    if value.html {
        Cow::Owned(format!("<{}>", value.text))
    } else {
        quote_id(&value.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_id_leaves_identifiers_bare() {
        assert_eq!(quote_id("source_1"), "source_1");
        assert_eq!(quote_id("é"), "é");
        assert_eq!(quote_id("42"), "42");
        assert_eq!(quote_id(".5"), ".5");
    }

    #[test]
    fn test_quote_id_quotes_everything_else() {
        assert_eq!(quote_id(""), "\"\"");
        assert_eq!(quote_id("1abc"), "\"1abc\"");
        assert_eq!(quote_id("a b"), "\"a b\"");
        assert_eq!(quote_id("Graph"), "\"Graph\"");
        assert_eq!(quote_id("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_quote_id_trailing_backslash_keeps_closing_quote() {
        assert_eq!(quote_id(r"dir\"), r#""dir\\""#);
        let graph = parse(&format!("digraph {{ {} }}", quote_id(r"dir\"))).unwrap();
        assert!(graph.contains_node(r"dir\"));
    }

    #[test]
    fn test_escape_string_doubles_only_joining_backslashes() {
        assert_eq!(escape_string(r"a\b"), r"a\b");
        assert_eq!(escape_string(r"a\\b"), r"a\\\\b");
        assert_eq!(escape_string("a\\\nb"), "a\\\\\nb");
        assert_eq!(escape_string(r#"\""#), r#"\\\""#);
    }

    #[test]
    fn test_quote_value_html() {
        assert_eq!(quote_value(&AttrValue::html("<b>x</b>")), "<<b>x</b>>");
        assert_eq!(quote_value(&AttrValue::plain("box")), "box");
    }
}
