//! # Response Rendering (`common::output`)
//!
//! File: cli/src/common/output/mod.rs
//!
//! ## Overview
//!
//! Writes a receiver response body to the user in the selected format.
//!
//! - Empty bodies produce no output.
//! - Bodies that are not JSON are passed through untouched (plus a trailing
//!   newline when missing). Receivers occasionally answer with HTML error
//!   pages, and those should still reach the terminal.
//! - JSON bodies are re-encoded as compact JSON, YAML, a tab-separated table
//!   (see `table`), or 2-space pretty JSON.
//!
//! Object keys come out sorted in every format because decoded maps are
//! key-ordered.
//!
//! ## Examples
//!
//! ```rust
//! let mut out = Vec::new();
//! output::render(br#"{"b":"x","a":1}"#, OutputFormat::Table, &mut out)?;
//! assert_eq!(out, b"a\t1\nb\tx\n");
//! ```
//!
pub mod table;

use crate::core::error::{MusiccastError, Result};
use anyhow::Context;
use serde_json::Value;
use std::io::Write;

use table::render_table;

/// Output format for decoded JSON responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    #[default]
    Pretty,
}

impl OutputFormat {
    /// Case-insensitive lookup. Unrecognized names select `Pretty`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "table" => OutputFormat::Table,
            _ => OutputFormat::Pretty,
        }
    }
}

/// Decodes a response body as JSON.
pub fn decode(body: &[u8]) -> std::result::Result<Value, MusiccastError> {
    serde_json::from_slice(body).map_err(|e| MusiccastError::Decode(e.to_string()))
}

/// # Render Response (`render`)
///
/// Writes `body` to `out` according to `format`.
///
/// ## Arguments
///
/// * `body` - Raw response bytes.
/// * `format` - Target format for JSON bodies; ignored for non-JSON bodies.
/// * `out` - Destination, normally stdout.
///
/// ## Returns
///
/// * `Result<()>` - Fails only when writing to `out` fails or the value
///   cannot be re-encoded.
pub fn render(body: &[u8], format: OutputFormat, out: &mut dyn Write) -> Result<()> {
    if body.is_empty() {
        return Ok(());
    }

    let value = match decode(body) {
        Ok(value) => value,
        Err(_) => {
            out.write_all(body).context("Failed to write response")?;
            if !body.ends_with(b"\n") {
                writeln!(out)?;
            }
            return Ok(());
        }
    };

    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, &value)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => {
            let text = serde_yaml::to_string(&value).context("Failed to encode response as YAML")?;
            out.write_all(text.as_bytes())?;
        }
        OutputFormat::Table => {
            out.write_all(render_table(&value).as_bytes())?;
        }
        OutputFormat::Pretty => {
            serde_json::to_writer_pretty(&mut *out, &value)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Application status carried in a response body.
///
/// Returns the `response_code` of a JSON object body when it is a number or a
/// numeric string; `None` for anything else.
pub fn response_code(body: &[u8]) -> Option<i64> {
    let value = decode(body).ok()?;
    match value.get("response_code")? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
