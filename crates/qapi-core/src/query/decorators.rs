use indexmap::IndexMap;
use log::{debug, warn};
use serde_yaml_ng::{Mapping, Value};

use super::{QueryMetadata, QueryType};

const DECORATOR_PREFIX: &str = "#+";

/// Split query text into the decorator YAML and the remaining query text.
pub fn split_decorators(text: &str) -> (String, String) {
    let mut yaml_lines = Vec::new();
    let mut query_lines = Vec::new();
    for line in text.lines() {
        match line.strip_prefix(DECORATOR_PREFIX) {
            Some(rest) => yaml_lines.push(rest),
            None => query_lines.push(line),
        }
    }
    (dedent(&yaml_lines), query_lines.join("\n"))
}

/// Remove the indentation shared by every non-blank line.
fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| l.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the decorator mapping. Malformed YAML yields an empty mapping.
pub fn decorator_mapping(yaml: &str) -> Mapping {
    if yaml.trim().is_empty() {
        return Mapping::new();
    }
    match serde_yaml_ng::from_str::<Value>(yaml) {
        Ok(Value::Mapping(m)) => m,
        Ok(Value::Null) => Mapping::new(),
        Ok(_) => {
            warn!("Query decorators are not a mapping; ignoring them");
            Mapping::new()
        }
        Err(e) => {
            warn!("Query decorators could not be parsed, check your YAML syntax: {e}");
            Mapping::new()
        }
    }
}

/// Read decorators from query text. Never fails.
///
/// The returned record has `query_type` [`QueryType::Other`] and no output
/// variables; the SPARQL parser fills those in from the query body.
pub fn parse_decorators(text: &str) -> QueryMetadata {
    let (yaml, query) = split_decorators(text);
    let mapping = decorator_mapping(&yaml);

    let tags = mapping.get("tags").map(string_list).unwrap_or_default();
    debug!("Read query tags: {}", tags.join(", "));

    let summary = mapping.get("summary").and_then(scalar_string).unwrap_or_default();
    debug!("Read query summary: {summary}");

    let description = mapping
        .get("description")
        .and_then(scalar_string)
        .unwrap_or_default();
    debug!("Read query description: {description}");

    let method = mapping.get("method").and_then(scalar_string);

    let pagination = mapping
        .get("pagination")
        .and_then(scalar_string)
        .filter(|p| !p.is_empty() && p != "0" && p != "false");
    debug!("Read query pagination: {pagination:?}");

    let endpoint = mapping
        .get("endpoint")
        .and_then(scalar_string)
        .filter(|e| !e.is_empty());

    let endpoint_in_url = mapping.get("endpoint_in_url").map(flag).unwrap_or(true);
    debug!("Read endpoint in url: {endpoint_in_url}");

    let mime = mapping.get("mime").and_then(scalar_string);
    debug!("Read endpoint dump MIME type: {mime:?}");

    let enumerate = mapping.get("enumerate").map(enumerations).unwrap_or_default();

    QueryMetadata {
        tags,
        summary,
        description,
        method,
        pagination,
        endpoint,
        endpoint_in_url,
        mime,
        query_type: QueryType::Other,
        variables: Vec::new(),
        query,
        enumerate,
        decorators: json_decorators(&mapping),
    }
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(seq) => seq.iter().filter_map(scalar_string).collect(),
        other => scalar_string(other).into_iter().collect(),
    }
}

/// Read a boolean decorator. `false`, `0` and empty values are false.
fn flag(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Null => false,
        _ => true,
    }
}

/// `enumerate` is either a mapping of parameter name to values, or a
/// sequence of such single-entry mappings.
fn enumerations(value: &Value) -> IndexMap<String, Vec<String>> {
    let mut out = IndexMap::new();
    let mut collect = |m: &Mapping| {
        for (k, v) in m {
            if let Some(name) = scalar_string(k) {
                out.insert(name, string_list(v));
            }
        }
    };
    match value {
        Value::Mapping(m) => collect(m),
        Value::Sequence(seq) => {
            for entry in seq {
                if let Value::Mapping(m) = entry {
                    collect(m);
                }
            }
        }
        _ => warn!("Ignoring `enumerate` decorator: expected a mapping"),
    }
    out
}

fn json_decorators(mapping: &Mapping) -> IndexMap<String, serde_json::Value> {
    let mut out = IndexMap::new();
    for (k, v) in mapping {
        let Some(key) = scalar_string(k) else {
            continue;
        };
        match serde_json::to_value(v) {
            Ok(json) => {
                out.insert(key, json);
            }
            Err(e) => warn!("Decorator `{key}` cannot be represented as JSON: {e}"),
        }
    }
    out
}
