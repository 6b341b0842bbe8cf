//! # Dry-Run Printer (`common::http::dry_run`)
//!
//! File: cli/src/common/http/dry_run.rs
//!
//! Writes a `PreparedRequest` in place of sending it:
//!
//! ```text
//! POST http://10.0.0.2/YamahaExtendedControl/v1/dist/setGroupName
//! Content-Type: application/json
//!
//! {"name":"Living"}
//! ```
//!
use super::request::PreparedRequest;
use std::io::{self, Write};

pub fn write_request(out: &mut dyn Write, request: &PreparedRequest) -> io::Result<()> {
    writeln!(out, "{} {}", request.method, request.url)?;
    for (key, value) in &request.headers {
        writeln!(out, "{}: {}", key, value)?;
    }
    if let Some(body) = &request.body {
        writeln!(out)?;
        out.write_all(body)?;
        writeln!(out)?;
    }
    Ok(())
}
