//! # Transport with Retry (`common::http::transport`)
//!
//! File: cli/src/common/http/transport.rs
//!
//! ## Overview
//!
//! Executes a `PreparedRequest` over HTTP and returns the raw status,
//! headers and body. Transient failures are retried:
//!
//! - transport-level errors (DNS, connect, I/O, per-attempt timeout)
//! - responses with status >= 500
//!
//! Each retry waits `200ms * (retry_index + 1)`. Every attempt is built
//! fresh from the prepared request and carries its own timeout. Anything
//! else (2xx, 3xx, 4xx) ends the sequence immediately.
//!
use super::request::PreparedRequest;
use crate::core::config::ConnectionConfig;
use crate::core::error::{MusiccastError, Result};
use anyhow::Context;
use std::time::Duration;
use tracing::{debug, warn};

/// Base unit of the linear backoff schedule.
const BACKOFF_STEP: Duration = Duration::from_millis(200);

/// A response as received, before any decoding.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: reqwest::header::HeaderMap,
    pub body: Vec<u8>,
}

/// Delay before retry number `retry_index` (0 for the first retry).
pub fn backoff_delay(retry_index: u32) -> Duration {
    BACKOFF_STEP * (retry_index + 1)
}

/// # HTTP Transport (`Transport`)
///
/// Holds the shared `reqwest::Client` plus the retry and timeout policy taken
/// from the connection configuration.
#[derive(Debug, Clone)]
pub struct Transport {
    client: reqwest::Client,
    timeout: Option<Duration>,
    retries: u32,
}

impl Transport {
    pub fn new(config: &ConnectionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to initialize HTTP client")?;
        Ok(Self {
            client,
            timeout: config.timeout,
            retries: config.retries,
        })
    }

    /// # Send with Retry (`send`)
    ///
    /// Sends `request` up to `retries + 1` times.
    ///
    /// ## Returns
    ///
    /// * `Ok(RawResponse)` for the first non-5xx response, or the last 5xx
    ///   response once attempts are exhausted.
    /// * `Err(MusiccastError::Transport)` carrying the last transport error
    ///   when every attempt failed below the HTTP layer.
    pub async fn send(&self, request: &PreparedRequest) -> std::result::Result<RawResponse, MusiccastError> {
        let attempts = self.retries + 1;
        let mut retry_index = 0;
        loop {
            debug!(
                "Attempt {}/{}: {} {}",
                retry_index + 1,
                attempts,
                request.method,
                request.url
            );
            let is_last = retry_index >= self.retries;
            match self.attempt(request).await {
                Ok(response) if response.status >= 500 && !is_last => {
                    warn!(
                        "{} {} returned {}; retrying",
                        request.method, request.url, response.status
                    );
                }
                Ok(response) => return Ok(response),
                Err(err) if !is_last => {
                    warn!("{} {} failed: {}; retrying", request.method, request.url, err);
                }
                Err(err) => return Err(MusiccastError::Transport { source: err }),
            }
            let delay = backoff_delay(retry_index);
            debug!("Waiting {:?} before next attempt", delay);
            tokio::time::sleep(delay).await;
            retry_index += 1;
        }
    }

    /// One attempt: a fresh request, its own timeout, the whole body read.
    async fn attempt(&self, request: &PreparedRequest) -> std::result::Result<RawResponse, reqwest::Error> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.as_str());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
