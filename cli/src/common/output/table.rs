//! # Table Rendering (`common::output::table`)
//!
//! File: cli/src/common/output/table.rs
//!
//! Tab-separated rendering of decoded JSON, meant for `cut`/`awk` pipelines
//! rather than column alignment.
//!
//! - object: one `key<TAB>value` line per key, keys sorted
//! - array of objects: a header of the sorted key union, then one row per
//!   element with empty cells for missing keys
//! - any other array: one value per line
//! - scalar: one line
//!
use serde_json::Value;
use std::collections::BTreeSet;

pub fn render_table(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                out.push_str(key);
                out.push('\t');
                out.push_str(&value_string(item));
                out.push('\n');
            }
        }
        Value::Array(items) if items.is_empty() => {}
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let columns: BTreeSet<&str> = items
                .iter()
                .filter_map(Value::as_object)
                .flat_map(|map| map.keys().map(String::as_str))
                .collect();
            out.push_str(&columns.iter().copied().collect::<Vec<_>>().join("\t"));
            out.push('\n');
            for item in items {
                let row: Vec<String> = columns
                    .iter()
                    .map(|column| item.get(*column).map(value_string).unwrap_or_default())
                    .collect();
                out.push_str(&row.join("\t"));
                out.push('\n');
            }
        }
        Value::Array(items) => {
            for item in items {
                out.push_str(&value_string(item));
                out.push('\n');
            }
        }
        scalar => {
            out.push_str(&value_string(scalar));
            out.push('\n');
        }
    }
    out
}

/// Single-cell rendering of a JSON value.
pub fn value_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                (f as i64).to_string()
            }
            _ => n.to_string(),
        },
        nested => nested.to_string(),
    }
}
