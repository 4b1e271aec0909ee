//! Canonical hashing for graph documents.
//!
//! ```text
//! fingerprint = hex(BLAKE3(JCS(graph_json)))
//! ```
//!
//! JCS is the JSON Canonicalization Scheme (RFC 8785): sorted keys, no
//! whitespace, shortest number formatting. Two documents that differ only in
//! key order or formatting share a fingerprint.

use crate::error::SpecError;
use crate::graph::GraphSpec;

/// Computes the canonical BLAKE3 hash of a graph.
///
/// Returns a 64-character lowercase hexadecimal string.
///
/// # Example
/// ```
/// use noisegraph_spec::{GraphSpec, NodeOp};
/// use noisegraph_spec::hash::canonical_graph_hash;
///
/// let graph = GraphSpec::builder("flat", 1)
///     .node("c", NodeOp::Constant { value: 0.25 })
///     .build();
///
/// let hash = canonical_graph_hash(&graph).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_graph_hash(graph: &GraphSpec) -> Result<String, SpecError> {
    let value = graph.to_value()?;
    canonical_value_hash(&value)
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> Result<String, SpecError> {
    let canonical = canonicalize_json(value);
    Ok(blake3::hash(canonical.as_bytes()).to_hex().to_string())
}

/// Canonicalizes a JSON value according to RFC 8785 (JCS).
pub fn canonicalize_json(value: &serde_json::Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &serde_json::Value, out: &mut String) {
    match value {
        serde_json::Value::Null => out.push_str("null"),
        serde_json::Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        serde_json::Value::Number(n) => out.push_str(&format_jcs_number(n)),
        serde_json::Value::String(s) => write_jcs_string(s, out),
        serde_json::Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        serde_json::Value::Object(obj) => {
            let mut entries: Vec<(&String, &serde_json::Value)> = obj.iter().collect();
            // JCS orders keys by UTF-16 code units.
            entries.sort_by(|(a, _), (b, _)| a.encode_utf16().cmp(b.encode_utf16()));

            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_jcs_string(key, out);
                out.push(':');
                write_canonical(item, out);
            }
            out.push('}');
        }
    }
}

fn format_jcs_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) if f.is_finite() => {
            if f == 0.0 {
                "0".to_string()
            } else if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", f as i64)
            } else {
                // Rust's Display already yields the shortest round-trip form.
                format!("{}", f)
            }
        }
        _ => "null".to_string(),
    }
}

fn write_jcs_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c < '\x20' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_sorts_keys_and_strips_whitespace() {
        let value = json!({ "b": 1, "a": [true, null, "x"], "c": { "z": 0.5, "y": 2.0 } });
        assert_eq!(
            canonicalize_json(&value),
            r#"{"a":[true,null,"x"],"b":1,"c":{"y":2,"z":0.5}}"#
        );
    }

    #[test]
    fn test_string_escaping() {
        let value = json!("tab\there \"quoted\" \u{1}");
        assert_eq!(
            canonicalize_json(&value),
            r#""tab\there \"quoted\" \u0001""#
        );
    }

    #[test]
    fn test_key_order_does_not_change_hash() {
        let a = json!({ "x": 1, "y": 2 });
        let b = json!({ "y": 2, "x": 1 });
        assert_eq!(
            canonical_value_hash(&a).unwrap(),
            canonical_value_hash(&b).unwrap()
        );
    }
}
