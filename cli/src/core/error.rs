//! # musiccast Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error kinds used throughout the client. Each kind
//! corresponds to a distinct stage of a call, so callers (and tests) can tell
//! "the flags were wrong" apart from "the receiver said no".
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `MusiccastError`: A custom error enum using `thiserror` for specific error kinds
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The kinds cover:
//! - Configuration errors (missing host/base URL, malformed flag values)
//! - Transport errors (DNS, connect, I/O, timeouts after retries)
//! - HTTP status errors (status >= 400)
//! - Application errors (non-zero `response_code` inside a 2xx response)
//! - Discovery errors (every service-type browse failed)
//! - External command errors (`dns-sd` subprocesses)
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error kind
//! if host.is_empty() {
//!     return Err(MusiccastError::Config("host or base-url is required".into()).into());
//! }
//!
//! // Pattern matching on error kinds
//! match result {
//!     Err(e) if matches!(e.downcast_ref::<MusiccastError>(), Some(MusiccastError::HttpStatus { .. })) => {
//!         // the body has already been printed
//!     }
//!     other => other?,
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the musiccast client.
#[derive(Error, Debug)]
pub enum MusiccastError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("http {status}")]
    HttpStatus { status: u16 },

    #[error("response_code {code}")]
    Application { code: i64 },

    /// Response body was not JSON. Rendering falls back to passthrough, so
    /// this kind never reaches the user on the normal call path.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Discovery failed: {0}")]
    Discovery(String),

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
