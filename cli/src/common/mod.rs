//! # musiccast Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared machinery used by the command handlers. Commands describe *what*
//! to call; everything here knows *how*.
//!
//! ## Architecture
//!
//! - **`http`**: Request building, retrying transport, dry-run printing and the call layer (`ApiClient`).
//! - **`output`**: Rendering of response bodies as JSON, YAML, tables or pretty JSON.
//! - **`process`**: Running external programs with a deadline and collecting their output.
//! - **`discovery`**: DNS-SD browsing and resolution of receivers on the local network.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::http::{ApiClient, Endpoint};
//!
//! let client = ApiClient::new(&config)?;
//! client.call(&Endpoint::get("main/getStatus"), &mut std::io::stdout()).await?;
//! ```
//!

/// DNS-SD discovery of receivers.
pub mod discovery;
/// Request builder, transport with retry, dry-run printer and call layer.
pub mod http;
/// Response body rendering.
pub mod output;
/// External process execution with deadlines.
pub mod process;
