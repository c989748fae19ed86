//! # IIIF Inspector
//!
//! Inspection of IIIF Image API 2.1 and 3.0 services.
//!
//! Given a service URL, this library fetches its `info.json`, decides which
//! API version it speaks, and normalizes it into a [`Descriptor`]: compliance
//! level, dimensions, tiles, preferred sizes, and every quality, format and
//! feature resolved to supported or not. It also encodes and decodes image
//! request URLs (`{region}/{size}/{rotation}/{quality}.{format}`) in
//! canonical form.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`compliance`] - Compliance tables and the capability resolver
//! - [`descriptor`] - Descriptor model, v2/v3 parsers, thumbnail selection
//! - [`request`] - Image request parameters, codec and validation
//! - [`fetch`] - HTTP boundary and error classification
//! - [`registry`] - Cache of inspected services
//! - [`server`] - Axum-based JSON API
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use iiif_inspector::{inspect, request_url, HttpInfoSource};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = HttpInfoSource::new(Duration::from_secs(30))?;
//!     let inspection = inspect(&source, "https://example.org/iiif/abc/full/max/0/default.jpg").await?;
//!
//!     if let (Some(descriptor), Some(params)) = (&inspection.descriptor, &inspection.params) {
//!         println!("{}", request_url(descriptor, params));
//!     }
//!     Ok(())
//! }
//! ```

pub mod compliance;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod registry;
pub mod request;
pub mod server;

// Re-export commonly used types
pub use compliance::{ApiVersion, CapabilityKind, ComplianceLevel, ResolvedCapability};
pub use config::{Cli, Command, InspectConfig, ServeConfig};
pub use descriptor::{parse, Descriptor, PreferredSize, Term, TermGroup, TermValue, Thumbnail, TileSet};
pub use error::{FetchError, InspectError, RequestError, ValidationWarning};
pub use fetch::{
    fetch_info, inspect, inspect_service, ErrorDetail, HttpExchange, HttpInfoSource, InfoResponse,
    InfoSource, Inspection,
};
pub use registry::InspectionRegistry;
pub use request::{
    decode, encode, parse_input_url, region_from_selection, request_url, validate,
    ImageRequestParams, Rect, Region, Rotation, Selection, Size, SizeSpec,
};
pub use server::{create_router, AppState, RouterConfig};
