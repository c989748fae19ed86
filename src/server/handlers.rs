//! HTTP request handlers for the inspection API.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check endpoint
//! - `GET /inspect?url=...` - Fetch, parse and describe an image service
//! - `POST /request` - Encode and validate image request parameters

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::descriptor::Descriptor;
use crate::error::InspectError;
use crate::fetch::{InfoSource, Inspection};
use crate::registry::InspectionRegistry;
use crate::request::{
    encode, parse_input_url, region_from_selection, request_url, validate, ImageRequestParams,
    Selection,
};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the inspection registry.
///
/// This is passed to all handlers via Axum's State extractor.
pub struct AppState<S: InfoSource> {
    pub registry: Arc<InspectionRegistry<S>>,
}

impl<S: InfoSource> AppState<S> {
    pub fn new(registry: InspectionRegistry<S>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

impl<S: InfoSource> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

// =============================================================================
// Request Parameters
// =============================================================================

/// Query parameters for the inspect endpoint.
#[derive(Debug, Deserialize)]
pub struct InspectQueryParams {
    /// Service URL, `info.json` URL, or image request URL
    #[serde(default)]
    pub url: String,

    /// Bypass the cache and fetch again
    #[serde(default)]
    pub refresh: bool,
}

/// Body of an image request build.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub service_url: String,

    #[serde(default)]
    pub params: ImageRequestParams,

    /// Preview selection replacing `params.region`
    #[serde(default)]
    pub selection: Option<Selection>,

    /// Express the selection as a percent region
    #[serde(default)]
    pub percent: bool,
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "invalid_request", "not_detected")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// An encoded image request.
#[derive(Debug, Serialize)]
pub struct RequestResponse {
    /// `{region}/{size}/{rotation}/{quality}.{format}`
    pub path: String,

    /// Full request URL
    pub url: String,

    /// Advisory messages; never block the request
    pub warnings: Vec<String>,

    /// The parameters that were encoded
    pub params: ImageRequestParams,
}

impl RequestResponse {
    fn build(descriptor: &Descriptor, params: ImageRequestParams) -> Self {
        Self {
            path: encode(&params, descriptor),
            url: request_url(descriptor, &params),
            warnings: validate(&params, descriptor)
                .iter()
                .map(ToString::to_string)
                .collect(),
            params,
        }
    }
}

/// Inspection plus the request carried by the input URL, if any.
#[derive(Debug, Serialize)]
pub struct InspectResponse {
    #[serde(flatten)]
    pub inspection: Inspection,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestResponse>,
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert InspectError to HTTP response.
///
/// Client errors are logged at DEBUG or WARN, server errors at ERROR.
impl IntoResponse for InspectError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            InspectError::EmptyInput | InspectError::InvalidRequest(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_request",
                self.to_string(),
            ),

            InspectError::InvalidParams(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_params",
                self.to_string(),
            ),

            InspectError::NotDetected { messages, .. } if messages.is_empty() => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "not_detected",
                self.to_string(),
            ),

            InspectError::NotDetected { messages, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "not_detected",
                format!("{}: {}", self, messages.join("; ")),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                "Server error: {}",
                message
            );
        } else if status == StatusCode::BAD_REQUEST {
            debug!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle health check requests.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response
///
/// `200 OK` with JSON body:
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0"
/// }
/// ```
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle inspect requests.
///
/// # Endpoint
///
/// `GET /inspect?url={url}&refresh={bool}`
///
/// The `url` may be a service URL, an `info.json` URL or a complete image
/// request URL. In the last case the decoded parameters are returned under
/// `params`, and their canonical encoding under `request`.
///
/// # Response
///
/// `200 OK` with the inspection, also when the service could not be
/// reached or is not an IIIF image; problems are listed in `http.errors`.
///
/// # Errors
///
/// - `400 Bad Request`: No URL given
pub async fn inspect_handler<S: InfoSource>(
    State(state): State<AppState<S>>,
    Query(query): Query<InspectQueryParams>,
) -> Result<Json<InspectResponse>, InspectError> {
    let (service_url, params) = parse_input_url(&query.url);
    if service_url.is_empty() {
        return Err(InspectError::EmptyInput);
    }

    let cached = state.registry.get(&service_url, query.refresh).await;

    let mut inspection = Inspection::clone(&cached);
    inspection.params = params;

    let request = match (&inspection.descriptor, &inspection.params) {
        (Some(descriptor), Some(params)) => {
            Some(RequestResponse::build(descriptor, params.clone()))
        }
        _ => None,
    };

    Ok(Json(InspectResponse {
        inspection,
        request,
    }))
}

/// Handle image request builds.
///
/// # Endpoint
///
/// `POST /request`
///
/// # Request Body
///
/// ```json
/// {
///   "serviceUrl": "https://example.org/iiif/abc",
///   "params": { "region": { "type": "full" }, "size": { "spec": { "type": "max" } },
///               "rotation": { "degrees": 0 }, "quality": "default", "format": "jpg" },
///   "selection": { "x": 0, "y": 0, "width": 256, "height": 256 },
///   "percent": false
/// }
/// ```
///
/// `params` defaults to `full/max/0/default.jpg`. When `selection` is given
/// it replaces the region.
///
/// # Errors
///
/// - `400 Bad Request`: No service URL given, malformed body, or parameters
///   that do not form a decodable request
/// - `422 Unprocessable Entity`: The service is not an IIIF image
pub async fn request_handler<S: InfoSource>(
    State(state): State<AppState<S>>,
    payload: Result<Json<RequestBody>, JsonRejection>,
) -> Result<Json<RequestResponse>, InspectError> {
    let Json(body) =
        payload.map_err(|rejection| InspectError::InvalidRequest(rejection.body_text()))?;

    let (service_url, _) = parse_input_url(&body.service_url);
    if service_url.is_empty() {
        return Err(InspectError::EmptyInput);
    }

    let inspection = state.registry.get(&service_url, false).await;
    let Some(descriptor) = inspection.descriptor.as_ref() else {
        return Err(InspectError::NotDetected {
            service_url,
            messages: inspection.error_messages(),
        });
    };

    let mut params = body.params;
    if let Some(selection) = body.selection {
        params.region = region_from_selection(descriptor, selection, body.percent);
    }
    params.check()?;

    Ok(Json(RequestResponse::build(descriptor, params)))
}

// =============================================================================
// Tests
// =============================================================================
