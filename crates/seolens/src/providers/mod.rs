//! HTTP clients for the three external vendors.
//!
//! Each client owns a configured `reqwest::Client` with the vendor's
//! authentication and timeout, and exposes one method per vendor operation.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use crate::error::ProviderRequestError;
use crate::prelude::*;

pub mod dataforseo;
pub mod moz;
pub mod openai;

pub use dataforseo::{DataForSeoClient, DataForSeoConfig};
pub use moz::{MozClient, MozConfig};
pub use openai::{OpenAiClient, OpenAiConfig};

/// The three vendor clients, built once and shared by every pipeline.
#[derive(Debug, Clone)]
pub struct Providers {
    pub moz: MozClient,
    pub dataforseo: DataForSeoClient,
    pub openai: OpenAiClient,
}

impl Providers {
    /// Load every vendor configuration from environment variables
    pub fn from_env() -> SeoResult<Self> {
        Ok(Self {
            moz: MozClient::new(MozConfig::from_env()?)?,
            dataforseo: DataForSeoClient::new(DataForSeoConfig::from_env()?)?,
            openai: OpenAiClient::new(OpenAiConfig::from_env()?)?,
        })
    }
}

/// Read a required environment variable
pub(crate) fn required_env(name: &str) -> SeoResult<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{name} environment variable not set")))
}

/// Read an optional environment variable, treating blank values as unset
pub(crate) fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Create an HTTP client with JSON content type, extra default headers and a timeout
pub(crate) fn create_client(
    mut headers: HeaderMap,
    timeout: Duration,
) -> SeoResult<reqwest::Client> {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))
}

/// Send a prepared request and decode its JSON body.
///
/// Transport failures, non-2xx statuses and undecodable bodies all become a
/// [`ProviderRequestError`] tagged with the vendor and operation.
pub(crate) async fn send_json<T: DeserializeOwned>(
    vendor: &str,
    operation: &str,
    request: reqwest::RequestBuilder,
) -> Result<T, ProviderRequestError> {
    log::debug!("{vendor} {operation}: sending request");

    let response = request
        .send()
        .await
        .map_err(|e| ProviderRequestError::new(vendor, operation, e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderRequestError::new(vendor, operation, format!("HTTP {status}: {body}")));
    }

    response.json::<T>().await.map_err(|e| {
        ProviderRequestError::new(vendor, operation, format!("invalid response body: {e}"))
    })
}
