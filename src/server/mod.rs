//! HTTP server layer for the IIIF inspector.
//!
//! Exposes parsed descriptors and the image request codec as a JSON API for
//! an external viewer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │          GET /inspect?url=...        POST /request              │
//! │                                                                 │
//! │  ┌─────────────────────────────┐  ┌─────────────────────────┐   │
//! │  │          handlers           │  │         routes          │   │
//! │  │ (inspect, request, health)  │  │ (router, CORS, tracing) │   │
//! │  └─────────────────────────────┘  └─────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                 │
//!                                 ▼
//!                       InspectionRegistry
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    health_handler, inspect_handler, request_handler, AppState, ErrorResponse, HealthResponse,
    InspectQueryParams, InspectResponse, RequestBody, RequestResponse,
};
pub use routes::{create_router, RouterConfig};
