//! External provider clients
//!
//! Thin async HTTP clients for the air-quality (WAQI), geocoding/routing
//! (Mapbox), and LLM suggestion providers. Transient failures are retried
//! with exponential backoff; anything that survives the retries surfaces as
//! an upstream error, never as silently fabricated data.

pub mod llm;
pub mod mapbox;
pub mod waqi;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

/// Shared HTTP client with timeout and transient-error retries
pub(crate) fn http_client(timeout_seconds: u32, max_retries: u32) -> Result<ClientWithMiddleware> {
    let inner = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(concat!("airimpact/", env!("CARGO_PKG_VERSION")))
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

    Ok(ClientBuilder::new(inner)
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build())
}
