//! # Raw Requests (`commands::raw`)
//!
//! File: cli/src/commands/raw.rs
//!
//! ## Overview
//!
//! Escape hatch for endpoints without a dedicated command. The path can be:
//!
//! - an absolute URL, used as-is (`http://10.0.0.2/YamahaExtendedControl/v2/...`)
//! - a rooted path, joined onto the base URL (`/v1/system/getFeatures`)
//! - an API suffix, placed under the API prefix (`system/getFeatures`)
//!
//! `--data` is sent verbatim when it parses as JSON and as a JSON string
//! otherwise, so `--data hello` posts `"hello"`.
//!
//! ## Examples
//!
//! ```bash
//! musiccast --host amp.local raw get system/getDeviceInfo
//! musiccast --host amp.local raw post dist/setGroupName --data '{"name":"Den"}'
//! musiccast --host amp.local raw get main/setVolume --query volume=up --query step=2
//! ```
//!
use super::input::read_stdin;
use crate::common::http::request::JSON_CONTENT_TYPE;
use crate::common::http::{ApiClient, Endpoint, EndpointPath};
use crate::core::error::{MusiccastError, Result};
use clap::Args;
use reqwest::Method;
use std::io::Write;

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RawArgs {
    /// HTTP method (case-insensitive).
    pub method: String,

    /// Absolute URL, /rooted/path or api/suffix.
    pub path: String,

    /// Query parameter as key=value (repeatable).
    #[arg(long = "query")]
    pub query: Vec<String>,

    /// Request body: JSON, or text to send as a JSON string.
    #[arg(long, short = 'd', conflicts_with = "stdin")]
    pub data: Option<String>,

    /// Read the request body from standard input.
    #[arg(long)]
    pub stdin: bool,
}

impl RawArgs {
    pub fn endpoint(&self) -> Result<Endpoint> {
        let method = parse_method(&self.method)?;
        let mut endpoint = Endpoint::new(method, EndpointPath::parse(&self.path));
        for pair in &self.query {
            let (key, value) = parse_query_pair(pair)?;
            endpoint = endpoint.query(key, value);
        }

        let body = if self.stdin {
            Some(read_stdin()?)
        } else {
            match self.data.as_deref() {
                Some(data) if !data.trim().is_empty() => Some(encode_data(data)?),
                _ => None,
            }
        };
        Ok(match body {
            Some(body) => endpoint.body(body, JSON_CONTENT_TYPE),
            None => endpoint,
        })
    }
}

fn parse_method(raw: &str) -> std::result::Result<Method, MusiccastError> {
    Method::from_bytes(raw.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| MusiccastError::Config(format!("Invalid HTTP method '{}'", raw)))
}

/// Splits `key=value` at the first `=`. Both sides are trimmed; the key must
/// not be empty.
pub fn parse_query_pair(raw: &str) -> std::result::Result<(&str, &str), MusiccastError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(MusiccastError::Config(format!(
            "Invalid query parameter '{}'. Expected KEY=VALUE.",
            raw
        ))),
    }
}

/// Valid JSON is kept byte for byte; anything else becomes a JSON string.
pub fn encode_data(data: &str) -> Result<Vec<u8>> {
    if serde_json::from_str::<serde::de::IgnoredAny>(data).is_ok() {
        Ok(data.as_bytes().to_vec())
    } else {
        Ok(serde_json::to_vec(data)?)
    }
}

pub async fn handle_raw(args: RawArgs, client: &ApiClient<'_>, out: &mut dyn Write) -> Result<()> {
    let endpoint = args.endpoint()?;
    client.call(&endpoint, out).await
}
