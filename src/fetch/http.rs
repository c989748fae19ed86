//! reqwest-backed [`InfoSource`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use url::Url;

use crate::error::FetchError;

use super::{HttpExchange, InfoSource};

/// Media types accepted for `info.json`.
pub const ACCEPT_INFO_JSON: &str = "application/ld+json, application/json";

/// Fetches documents over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpInfoSource {
    client: Client,
}

impl HttpInfoSource {
    /// Create a source whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("iiif-inspector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        Ok(Self { client })
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout(err.to_string())
    } else if err.is_body() || err.is_decode() {
        FetchError::Body(err.to_string())
    } else {
        FetchError::Connection(err.to_string())
    }
}

#[async_trait]
impl InfoSource for HttpInfoSource {
    async fn get(&self, url: &str) -> Result<HttpExchange, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "{}: unsupported scheme '{}'",
                url,
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed)
            .header(ACCEPT, ACCEPT_INFO_JSON)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpExchange {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body,
            request_headers: vec![("accept".to_string(), ACCEPT_INFO_JSON.to_string())],
        })
    }
}
