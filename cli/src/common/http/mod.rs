//! # HTTP Call Pipeline (`common::http`)
//!
//! File: cli/src/common/http/mod.rs
//!
//! ## Overview
//!
//! Everything between "a command knows which endpoint it wants" and "the
//! user sees output and an exit status":
//!
//! - `request`: Resolves an `Endpoint` against the configuration into a `PreparedRequest`
//! - `transport`: Sends it with bounded retries
//! - `dry_run`: Prints it instead of sending it
//!
//! `ApiClient::call` ties these together with the renderer and turns the
//! final response into success or failure.
//!
//! ## Failure rules
//!
//! The body is always rendered first. Afterwards the call fails when the
//! status is >= 400 (`HttpStatus`) or the decoded body carries a non-zero
//! `response_code` (`Application`). Retries do not change that decision.
//!
pub mod dry_run;
pub mod request;
pub mod transport;

pub use request::{Endpoint, EndpointPath};

use crate::common::output;
use crate::core::config::ConnectionConfig;
use crate::core::error::{MusiccastError, Result};
use std::io::Write;
use tracing::debug;
use transport::Transport;

/// # API Client (`ApiClient`)
///
/// Borrowed view of the process configuration plus a ready transport.
pub struct ApiClient<'a> {
    config: &'a ConnectionConfig,
    transport: Transport,
}

impl<'a> ApiClient<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Result<Self> {
        Ok(Self {
            config,
            transport: Transport::new(config)?,
        })
    }

    pub fn config(&self) -> &ConnectionConfig {
        self.config
    }

    /// # Call Endpoint (`call`)
    ///
    /// Builds, sends (or prints, in dry-run mode) and renders one request.
    ///
    /// ## Errors
    ///
    /// - `Config` if the request cannot be built (nothing is sent)
    /// - `Transport` if every attempt failed below the HTTP layer
    /// - `HttpStatus` / `Application` after the body has been written to `out`
    pub async fn call(&self, endpoint: &Endpoint, out: &mut dyn Write) -> Result<()> {
        let request = request::build_request(self.config, endpoint)?;

        if self.config.dry_run {
            dry_run::write_request(out, &request)?;
            return Ok(());
        }

        let response = self.transport.send(&request).await?;
        if self.config.verbose > 0 && !self.config.quiet {
            eprintln!("{} {} -> {}", request.method, request.url, response.status);
        }
        debug!(
            "Response: {} bytes, content-type {:?}",
            response.body.len(),
            response.headers.get(reqwest::header::CONTENT_TYPE)
        );

        output::render(&response.body, self.config.format, out)?;

        if response.status >= 400 {
            return Err(MusiccastError::HttpStatus {
                status: response.status,
            }
            .into());
        }
        if let Some(code) = output::response_code(&response.body) {
            if code != 0 {
                return Err(MusiccastError::Application { code }.into());
            }
        }
        Ok(())
    }
}
