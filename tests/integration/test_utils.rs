//! Test utilities for integration tests.
//!
//! This module provides a mock `InfoSource` and sample `info.json` documents.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

use iiif_inspector::error::FetchError;
use iiif_inspector::fetch::{HttpExchange, InfoSource};
use iiif_inspector::{create_router, InspectionRegistry, RouterConfig};

// =============================================================================
// Mock Info Source
// =============================================================================

/// A canned response.
#[derive(Clone)]
struct MockResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

/// A mock source serving pre-configured documents.
///
/// URLs without a configured response fail with a connection error.
/// Request counts are shared between clones.
#[derive(Clone, Default)]
pub struct MockInfoSource {
    responses: HashMap<String, MockResponse>,
    request_counts: Arc<RwLock<HashMap<String, usize>>>,
}

impl MockInfoSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` as JSON with status 200 at `{service_url}/info.json`.
    pub fn with_info(self, service_url: &str, body: Value) -> Self {
        self.with_response(
            &format!("{}/info.json", service_url),
            200,
            body.to_string().into_bytes(),
        )
    }

    /// Serve a raw response at `url`.
    pub fn with_response(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.insert(
            url.to_string(),
            MockResponse {
                status,
                headers: vec![
                    ("Content-Type".to_string(), "application/ld+json".to_string()),
                    ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
                    ("age".to_string(), "0".to_string()),
                ],
                body: Bytes::from(body.into()),
            },
        );
        self
    }

    pub async fn request_count(&self, url: &str) -> usize {
        self.request_counts
            .read()
            .await
            .get(url)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl InfoSource for MockInfoSource {
    async fn get(&self, url: &str) -> Result<HttpExchange, FetchError> {
        {
            let mut counts = self.request_counts.write().await;
            *counts.entry(url.to_string()).or_insert(0) += 1;
        }

        let response = self
            .responses
            .get(url)
            .ok_or_else(|| FetchError::Connection(format!("connection refused: {}", url)))?;

        Ok(HttpExchange {
            status: response.status,
            status_text: String::new(),
            headers: response.headers.clone(),
            body: response.body.clone(),
            request_headers: vec![("accept".to_string(), "application/json".to_string())],
        })
    }
}

// =============================================================================
// Sample Documents
// =============================================================================

pub const V3_SERVICE: &str = "https://iiif.example.org/image/v3/page1";
pub const V2_SERVICE: &str = "https://iiif.example.org/image/v2/page1";
pub const PLAIN_JSON_SERVICE: &str = "https://iiif.example.org/not-iiif";
pub const HTML_SERVICE: &str = "https://iiif.example.org/html";
pub const PROTECTED_SERVICE: &str = "https://iiif.example.org/protected";
pub const MISSING_SERVICE: &str = "https://iiif.example.org/missing";
pub const UNREACHABLE_SERVICE: &str = "https://unreachable.example.org/image";

/// A level 1 v3 document with tiles, sizes, maxima and rights.
pub fn v3_info() -> Value {
    json!({
        "@context": "http://iiif.io/api/image/3/context.json",
        "id": V3_SERVICE,
        "type": "ImageService3",
        "protocol": "http://iiif.io/api/image",
        "profile": "level1",
        "width": 6000,
        "height": 4000,
        "maxWidth": 3000,
        "maxArea": 4000000,
        "sizes": [
            { "width": 150, "height": 100 },
            { "width": 768, "height": 512 },
            { "width": 3000, "height": 2000 }
        ],
        "tiles": [{ "width": 512, "scaleFactors": [1, 2, 4, 8] }],
        "extraFormats": ["png"],
        "extraQualities": ["gray"],
        "extraFeatures": ["mirroring", "rotationArbitrary"],
        "preferredFormats": ["webp"],
        "rights": "http://creativecommons.org/licenses/by/4.0/"
    })
}

/// A level 2 v2 document with a profile description and attribution.
pub fn v2_info() -> Value {
    json!({
        "@context": "http://iiif.io/api/image/2/context.json",
        "@id": V2_SERVICE,
        "@type": "iiif:Image",
        "protocol": "http://iiif.io/api/image",
        "width": 1000,
        "height": 800,
        "profile": [
            "http://iiif.io/api/image/2/level2.json",
            {
                "formats": ["webp"],
                "qualities": ["bitonal"],
                "supports": ["canonicalLinkHeader", "profileLinkHeader"],
                "maxArea": 250000
            }
        ],
        "tiles": [{ "width": 256, "height": 256, "scaleFactors": [1, 2] }],
        "attribution": "Provided by Example Organization",
        "license": "https://creativecommons.org/publicdomain/zero/1.0/"
    })
}

/// A source serving every sample service.
pub fn sample_source() -> MockInfoSource {
    MockInfoSource::new()
        .with_info(V3_SERVICE, v3_info())
        .with_info(V2_SERVICE, v2_info())
        .with_info(PLAIN_JSON_SERVICE, json!({ "hello": "world" }))
        .with_response(
            &format!("{}/info.json", HTML_SERVICE),
            200,
            "<!doctype html><p>Hello</p>",
        )
        .with_response(
            &format!("{}/info.json", PROTECTED_SERVICE),
            401,
            r#"{"error": "login required"}"#,
        )
        .with_response(&format!("{}/info.json", MISSING_SERVICE), 404, "Not Found")
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Create a router over `source` with tracing disabled.
pub fn test_router(source: MockInfoSource) -> Router {
    create_router(
        InspectionRegistry::new(source),
        RouterConfig::new().with_tracing(false),
    )
}

/// Percent-encode a value for use in a query string.
pub fn query_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Send a GET request and return status and JSON body.
pub async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

/// Send a POST request with a JSON body and return status and JSON body.
pub async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}
