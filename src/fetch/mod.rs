//! Fetching and inspecting IIIF image services.
//!
//! ```text
//! raw input ──► parse_input_url ──► service URL ──► InfoSource::get({url}/info.json)
//!                     │                                     │
//!                     ▼                                     ▼
//!              request params                         InfoResponse
//!                                                  (status, headers, JSON,
//!                                                   ErrorDetail list)
//!                                                           │
//!                                                           ▼
//!                                                  descriptor::parse
//! ```
//!
//! The [`InfoSource`] trait is the only network seam. Everything after it is
//! synchronous: the response is classified into human-facing
//! [`ErrorDetail`]s and the JSON body, if any, is handed to the parsers.

mod http;

use std::time::Instant;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::descriptor::{self, Descriptor};
use crate::error::{FetchError, InspectError};
use crate::request::{parse_input_url, ImageRequestParams};

pub use http::{HttpInfoSource, ACCEPT_INFO_JSON};

// =============================================================================
// InfoSource Trait
// =============================================================================

/// A completed HTTP exchange, whatever its status.
#[derive(Debug, Clone)]
pub struct HttpExchange {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,

    /// Headers sent with the request
    pub request_headers: Vec<(String, String)>,
}

/// Source of `info.json` documents.
///
/// Implementations return `Ok` for any response the server produced,
/// including error statuses, and `Err` only when no response was obtained.
#[async_trait]
pub trait InfoSource: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpExchange, FetchError>;
}

// =============================================================================
// InfoResponse
// =============================================================================

/// A human-facing problem report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
}

impl ErrorDetail {
    fn new(message: &str, detail: Option<String>, hints: &[&str]) -> Self {
        Self {
            message: message.to_string(),
            detail,
            hints: hints.iter().map(|h| h.to_string()).collect(),
        }
    }
}

pub const CONNECTION_FAILED: &str = "Connection Failed";
pub const AUTHENTICATION_REQUIRED: &str = "Authentication Required";
pub const UNEXPECTED_RESPONSE: &str = "Unexpected Response";
pub const INVALID_JSON: &str = "Invalid Response (JSON Parse Error)";
pub const NOT_DETECTED: &str = "IIIF Image Not Detected";

const HINT_CHECK_URL: &str =
    "Double check the URL to make sure it represents an image with a valid info.json resource.";

/// Everything observed while fetching an `info.json`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub request_url: String,
    pub request_headers: Vec<(String, String)>,

    /// Absent when no response was received
    pub http_status: Option<u16>,
    pub http_status_text: Option<String>,
    pub http_duration_ms: u64,

    /// Sorted by lowercased name
    pub http_headers: Vec<(String, String)>,
    pub http_body_json: Option<Value>,
    pub errors: Vec<ErrorDetail>,
}

impl InfoResponse {
    /// Whether a 2xx response was received.
    pub fn is_success(&self) -> bool {
        matches!(self.http_status, Some(200..=299))
    }
}

/// Fetch `{service_url}/info.json` and classify the outcome.
pub async fn fetch_info<S: InfoSource + ?Sized>(source: &S, service_url: &str) -> InfoResponse {
    let request_url = format!("{}/info.json", service_url);
    let started = Instant::now();
    let result = source.get(&request_url).await;
    let http_duration_ms = started.elapsed().as_millis() as u64;

    let mut response = InfoResponse {
        request_url,
        request_headers: Vec::new(),
        http_status: None,
        http_status_text: None,
        http_duration_ms,
        http_headers: Vec::new(),
        http_body_json: None,
        errors: Vec::new(),
    };

    let exchange = match result {
        Ok(exchange) => exchange,
        Err(e) => {
            warn!(url = %response.request_url, "Fetch failed: {}", e);
            response.errors.push(ErrorDetail::new(
                CONNECTION_FAILED,
                Some(e.to_string()),
                &[
                    "Check that the server is reachable and the URL is spelled correctly.",
                    "Servers that do not send CORS headers cannot be used from a browser.",
                ],
            ));
            return response;
        }
    };

    info!(
        url = %response.request_url,
        status = exchange.status,
        duration_ms = http_duration_ms,
        "Fetched info.json"
    );

    let HttpExchange {
        status,
        status_text,
        mut headers,
        body,
        request_headers,
    } = exchange;

    headers.sort_by_key(|(name, _)| name.to_ascii_lowercase());

    response.request_headers = request_headers;
    response.http_status = Some(status);
    response.http_headers = headers;

    let status_line = format!("HTTP {} {}", status, status_text).trim_end().to_string();
    response.http_status_text = Some(status_text);

    match status {
        200..=299 => {}
        401 | 403 => response.errors.push(ErrorDetail::new(
            AUTHENTICATION_REQUIRED,
            Some(status_line),
            &["This image is protected by an authentication service, which is not supported."],
        )),
        400 | 404 => response.errors.push(ErrorDetail::new(
            UNEXPECTED_RESPONSE,
            Some(status_line),
            &[HINT_CHECK_URL],
        )),
        _ => response.errors.push(ErrorDetail::new(
            UNEXPECTED_RESPONSE,
            Some(status_line),
            &[],
        )),
    }

    match serde_json::from_slice::<Value>(&body) {
        Ok(json) => response.http_body_json = Some(json),
        Err(e) if response.is_success() => {
            debug!(url = %response.request_url, "Body is not JSON: {}", e);
            response
                .errors
                .push(ErrorDetail::new(INVALID_JSON, Some(e.to_string()), &[HINT_CHECK_URL]));
        }
        Err(_) => {}
    }

    response
}

// =============================================================================
// Inspection
// =============================================================================

/// Result of inspecting one service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub service_url: String,

    /// Parameters carried by the input URL, if it was an image request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ImageRequestParams>,

    pub http: InfoResponse,
    pub descriptor: Option<Descriptor>,
}

impl Inspection {
    /// Messages of all reported errors.
    pub fn error_messages(&self) -> Vec<String> {
        self.http.errors.iter().map(|e| e.message.clone()).collect()
    }
}

/// Fetch and parse the descriptor of a service URL.
pub async fn inspect_service<S: InfoSource + ?Sized>(source: &S, service_url: &str) -> Inspection {
    let mut http = fetch_info(source, service_url).await;

    let descriptor = match &http.http_body_json {
        Some(body) => {
            let parsed = descriptor::parse(service_url, body);
            if parsed.is_none() && http.errors.is_empty() {
                http.errors
                    .push(ErrorDetail::new(NOT_DETECTED, None, &[HINT_CHECK_URL]));
            }
            parsed
        }
        None => None,
    };

    if let Some(d) = &descriptor {
        debug!(
            service = service_url,
            version = d.version().number(),
            level = d.compliance_level().as_str(),
            "Parsed descriptor"
        );
    }

    Inspection {
        service_url: service_url.to_string(),
        params: None,
        http,
        descriptor,
    }
}

/// Interpret raw input, then fetch and parse its service.
pub async fn inspect<S: InfoSource + ?Sized>(
    source: &S,
    raw_input: &str,
) -> Result<Inspection, InspectError> {
    let (service_url, params) = parse_input_url(raw_input);
    if service_url.is_empty() {
        return Err(InspectError::EmptyInput);
    }

    let mut inspection = inspect_service(source, &service_url).await;
    inspection.params = params;
    Ok(inspection)
}
