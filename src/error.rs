use thiserror::Error;

/// Transport errors that can occur while fetching an `info.json` document
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The service URL could not be turned into a request URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network or connection error (DNS, TLS, refused, CORS-like failures)
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request did not complete in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The response body could not be read
    #[error("Failed to read response body: {0}")]
    Body(String),
}

/// Syntax errors for the segments of an image request path
/// (`{region}/{size}/{rotation}/{quality}.{format}`)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Region is not `full`, `square`, or four numeric fields
    #[error("Invalid region: {0}")]
    InvalidRegion(String),

    /// Size does not match any supported size form
    #[error("Invalid size: {0}")]
    InvalidSize(String),

    /// Rotation is not a number of degrees between 0 and 360
    #[error("Invalid rotation: {0}")]
    InvalidRotation(String),

    /// Last segment is not of the form `{quality}.{format}`
    #[error("Invalid quality/format: {0}")]
    InvalidFile(String),

    /// Path does not end with four image request segments
    #[error("Not an image request: {0}")]
    NotAnImageRequest(String),
}

/// Advisory warnings produced when validating request parameters against
/// a descriptor's declared maxima. These never block encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationWarning {
    /// Requested `w,h` area is larger than `maxArea`
    #[error("Size has an area ({area}) which is greater than the maximum ({max_area})")]
    AreaExceeded { area: u64, max_area: u64 },

    /// Requested width is larger than `maxWidth`
    #[error("Size has a width ({width}) which is greater than the maximum ({max_width})")]
    WidthExceeded { width: u64, max_width: u64 },

    /// Requested height is larger than `maxHeight`
    #[error("Size has a height ({height}) which is greater than the maximum ({max_height})")]
    HeightExceeded { height: u64, max_height: u64 },
}

/// Errors surfaced by the inspection API
#[derive(Debug, Clone, Error)]
pub enum InspectError {
    /// No input URL was supplied
    #[error("No URL provided")]
    EmptyInput,

    /// The request body could not be read
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    /// Request parameters do not form a decodable image request
    #[error(transparent)]
    InvalidParams(#[from] RequestError),

    /// The service responded, but not with a recognizable IIIF image descriptor
    #[error("IIIF image not detected at {service_url}")]
    NotDetected {
        service_url: String,
        messages: Vec<String>,
    },
}
