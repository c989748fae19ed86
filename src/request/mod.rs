//! IIIF image request parameters and their URL codec.
//!
//! An image request is the service identifier followed by four segments:
//!
//! ```text
//! {rootId}/{region}/{size}/{rotation}/{quality}.{format}
//!          │        │      │          └── file: default.jpg, gray.png, ...
//!          │        │      └── rotation: 0, 90, !180, 22.5
//!          │        └── size: max, full, w,  ,h  w,h  !w,h  ^max  pct:n
//!          └── region: full, square, x,y,w,h, pct:x,y,w,h
//! ```
//!
//! # Components
//!
//! - [`ImageRequestParams`]: the editable parameter set
//! - [`encode`] / [`decode`]: canonical path encoding and lenient decoding
//! - [`validate`]: advisory checks against a descriptor's maxima
//! - [`parse_input_url`]: split pasted input into service URL and parameters
//! - [`region_from_selection`]: convert a preview selection into a region
//!
//! # Example
//!
//! ```
//! use iiif_inspector::request::{decode, Region, SizeSpec};
//!
//! let params = decode("pct:10,10,50,50/!800,600/!90/gray.png").unwrap();
//! assert!(matches!(params.region, Region::Percent(_)));
//! assert!(params.size.confine);
//! assert_eq!(params.size.spec, SizeSpec::WidthHeight { width: 800, height: 600 });
//! assert!(params.rotation.mirror);
//! assert_eq!(params.quality, "gray");
//! assert_eq!(params.format, "png");
//! ```

mod codec;
mod input;
mod selection;
mod validate;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RequestError;

pub use codec::{decode, encode, request_url, slugs, RequestSlugs};
pub use input::parse_input_url;
pub use selection::{region_from_selection, Selection};
pub use validate::validate;

// =============================================================================
// Region
// =============================================================================

/// A rectangle given as `x,y,w,h`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RectFields")]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    fn parse(s: &str) -> Option<Self> {
        let fields: Vec<f64> = s
            .split(',')
            .map(|f| f.parse::<f64>().ok())
            .collect::<Option<_>>()?;

        match fields[..] {
            [x, y, w, h] => Some(Self { x, y, w, h }).filter(Rect::is_valid),
            _ => None,
        }
    }

    /// Finite, non-negative fields with a non-empty extent.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.w, self.h]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
            && self.w > 0.0
            && self.h > 0.0
    }

    /// Whether this rectangle is exactly `0,0,width,height`.
    pub fn covers(&self, width: f64, height: f64) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.w == width && self.h == height
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            format_number(self.x),
            format_number(self.y),
            format_number(self.w),
            format_number(self.h)
        )
    }
}

#[derive(Deserialize)]
struct RectFields {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

impl TryFrom<RectFields> for Rect {
    type Error = RequestError;

    fn try_from(fields: RectFields) -> Result<Self, Self::Error> {
        let rect = Rect::new(fields.x, fields.y, fields.w, fields.h);
        if rect.is_valid() {
            Ok(rect)
        } else {
            Err(RequestError::InvalidRegion(rect.to_string()))
        }
    }
}

/// The region of the full image to return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Region {
    /// The complete image
    Full,

    /// The largest centered square
    Square,

    /// A rectangle in full-resolution pixels
    Pixels(Rect),

    /// A rectangle in percent of the full image
    Percent(Rect),
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Region::Full => f.write_str("full"),
            Region::Square => f.write_str("square"),
            Region::Pixels(rect) => write!(f, "{}", rect),
            Region::Percent(rect) => write!(f, "pct:{}", rect),
        }
    }
}

impl Region {
    /// Check that a rectangle region encodes to a decodable segment.
    pub fn check(&self) -> Result<(), RequestError> {
        match self {
            Region::Pixels(rect) | Region::Percent(rect) if !rect.is_valid() => {
                Err(RequestError::InvalidRegion(self.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl FromStr for Region {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RequestError::InvalidRegion(s.to_string());
        match s {
            "full" => Ok(Region::Full),
            "square" => Ok(Region::Square),
            _ => match s.strip_prefix("pct:") {
                Some(rest) => Rect::parse(rest).map(Region::Percent).ok_or_else(invalid),
                None => Rect::parse(s).map(Region::Pixels).ok_or_else(invalid),
            },
        }
    }
}

// =============================================================================
// Size
// =============================================================================

/// The size form of a size segment, without decorations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SizeSpec {
    /// `max`
    Max,

    /// `full` (v2 only)
    Full,

    /// `w,`
    Width { width: u64 },

    /// `,h`
    Height { height: u64 },

    /// `w,h`
    WidthHeight { width: u64, height: u64 },

    /// `pct:n`
    Percent { percent: f64 },
}

impl SizeSpec {
    /// Whether this size names concrete pixel dimensions.
    pub fn is_concrete(&self) -> bool {
        matches!(
            self,
            SizeSpec::Width { .. } | SizeSpec::Height { .. } | SizeSpec::WidthHeight { .. }
        )
    }

    /// Dimensions are positive, percentages finite and positive.
    pub fn is_valid(&self) -> bool {
        match *self {
            SizeSpec::Max | SizeSpec::Full => true,
            SizeSpec::Width { width } => width > 0,
            SizeSpec::Height { height } => height > 0,
            SizeSpec::WidthHeight { width, height } => width > 0 && height > 0,
            SizeSpec::Percent { percent } => percent.is_finite() && percent > 0.0,
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::Max => f.write_str("max"),
            SizeSpec::Full => f.write_str("full"),
            SizeSpec::Width { width } => write!(f, "{},", width),
            SizeSpec::Height { height } => write!(f, ",{}", height),
            SizeSpec::WidthHeight { width, height } => write!(f, "{},{}", width, height),
            SizeSpec::Percent { percent } => write!(f, "pct:{}", format_number(*percent)),
        }
    }
}

/// The size segment: a size form plus the upscale (`^`) and confine (`!`) flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SizeFields")]
pub struct Size {
    pub upscale: bool,
    pub confine: bool,

    pub spec: SizeSpec,
}

impl Size {
    pub const fn new(spec: SizeSpec) -> Self {
        Self {
            upscale: false,
            confine: false,
            spec,
        }
    }

    /// Set the `^` flag.
    pub const fn upscaled(mut self) -> Self {
        self.upscale = true;
        self
    }

    /// Set the `!` flag.
    pub const fn confined(mut self) -> Self {
        self.confine = true;
        self
    }

    pub fn check(&self) -> Result<(), RequestError> {
        if self.spec.is_valid() {
            Ok(())
        } else {
            Err(RequestError::InvalidSize(self.to_string()))
        }
    }
}

#[derive(Deserialize)]
struct SizeFields {
    #[serde(default)]
    upscale: bool,
    #[serde(default)]
    confine: bool,
    spec: SizeSpec,
}

impl TryFrom<SizeFields> for Size {
    type Error = RequestError;

    fn try_from(fields: SizeFields) -> Result<Self, Self::Error> {
        let size = Size {
            upscale: fields.upscale,
            confine: fields.confine,
            spec: fields.spec,
        };
        size.check()?;
        Ok(size)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(SizeSpec::Max)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.upscale {
            f.write_str("^")?;
        }
        if self.confine {
            f.write_str("!")?;
        }
        write!(f, "{}", self.spec)
    }
}

impl FromStr for Size {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RequestError::InvalidSize(s.to_string());

        let (upscale, rest) = match s.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (confine, rest) = match rest.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, rest),
        };

        let spec = if let Some(pct) = rest.strip_prefix("pct:") {
            let percent: f64 = pct.parse().map_err(|_| invalid())?;
            SizeSpec::Percent { percent }
        } else if rest == "max" {
            SizeSpec::Max
        } else if rest == "full" {
            SizeSpec::Full
        } else {
            let (w, h) = rest.split_once(',').ok_or_else(invalid)?;
            match (dimension(w), dimension(h)) {
                (Some(Some(width)), Some(None)) => SizeSpec::Width { width },
                (Some(None), Some(Some(height))) => SizeSpec::Height { height },
                (Some(Some(width)), Some(Some(height))) => SizeSpec::WidthHeight { width, height },
                _ => return Err(invalid()),
            }
        };

        if !spec.is_valid() {
            return Err(invalid());
        }

        Ok(Size {
            upscale,
            confine,
            spec,
        })
    }
}

/// Parse one side of `w,h`: `Some(None)` when empty, `None` when invalid.
fn dimension(s: &str) -> Option<Option<u64>> {
    if s.is_empty() {
        return Some(None);
    }
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse::<u64>().ok().filter(|v| *v > 0).map(Some)
}

// =============================================================================
// Rotation
// =============================================================================

/// Clockwise rotation in degrees, optionally mirrored first.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RotationFields")]
pub struct Rotation {
    pub degrees: f64,
    pub mirror: bool,
}

impl Rotation {
    pub const fn new(degrees: f64) -> Self {
        Self {
            degrees,
            mirror: false,
        }
    }

    pub const fn mirrored(degrees: f64) -> Self {
        Self {
            degrees,
            mirror: true,
        }
    }

    /// Degrees within `0..=360`.
    pub fn is_valid(&self) -> bool {
        self.degrees.is_finite() && (0.0..=360.0).contains(&self.degrees)
    }
}

#[derive(Deserialize)]
struct RotationFields {
    degrees: f64,
    #[serde(default)]
    mirror: bool,
}

impl TryFrom<RotationFields> for Rotation {
    type Error = RequestError;

    fn try_from(fields: RotationFields) -> Result<Self, Self::Error> {
        let rotation = Rotation {
            degrees: fields.degrees,
            mirror: fields.mirror,
        };
        if rotation.is_valid() {
            Ok(rotation)
        } else {
            Err(RequestError::InvalidRotation(rotation.to_string()))
        }
    }
}

impl fmt::Display for Rotation {
    /// Canonical form: a full turn is written as `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degrees = if self.degrees == 360.0 { 0.0 } else { self.degrees };
        if self.mirror {
            f.write_str("!")?;
        }
        f.write_str(&format_number(degrees))
    }
}

impl FromStr for Rotation {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RequestError::InvalidRotation(s.to_string());

        let (mirror, rest) = match s.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
            return Err(invalid());
        }

        let degrees: f64 = rest.parse().map_err(|_| invalid())?;
        let rotation = Rotation { degrees, mirror };
        if !rotation.is_valid() {
            return Err(invalid());
        }

        Ok(rotation)
    }
}

// =============================================================================
// ImageRequestParams
// =============================================================================

/// A complete set of image request parameters.
///
/// Deserialization applies the same checks as decoding, so parameters
/// received as JSON always encode to a path that decodes again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RequestFields")]
pub struct ImageRequestParams {
    pub region: Region,
    pub size: Size,
    pub rotation: Rotation,
    pub quality: String,
    pub format: String,
}

impl Default for ImageRequestParams {
    /// `full/max/0/default.jpg`
    fn default() -> Self {
        Self {
            region: Region::Full,
            size: Size::default(),
            rotation: Rotation::default(),
            quality: "default".to_string(),
            format: "jpg".to_string(),
        }
    }
}

impl ImageRequestParams {
    /// Check every segment, as decoding would.
    pub fn check(&self) -> Result<(), RequestError> {
        self.region.check()?;
        self.size.check()?;
        if !self.rotation.is_valid() {
            return Err(RequestError::InvalidRotation(self.rotation.to_string()));
        }
        if !is_file_part(&self.quality) || !is_file_part(&self.format) {
            return Err(RequestError::InvalidFile(format!(
                "{}.{}",
                self.quality, self.format
            )));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RequestFields {
    region: Region,
    size: Size,
    rotation: Rotation,
    quality: String,
    format: String,
}

impl TryFrom<RequestFields> for ImageRequestParams {
    type Error = RequestError;

    fn try_from(fields: RequestFields) -> Result<Self, Self::Error> {
        let params = ImageRequestParams {
            region: fields.region,
            size: fields.size,
            rotation: fields.rotation,
            quality: fields.quality,
            format: fields.format,
        };
        params.check()?;
        Ok(params)
    }
}

/// A quality or format name: non-empty, no path or extension separators.
fn is_file_part(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', '.', '?', '#'])
}

/// Parse `{quality}.{format}`.
pub(crate) fn parse_file(s: &str) -> Result<(String, String), RequestError> {
    match s.split_once('.') {
        Some((quality, format)) if is_file_part(quality) && is_file_part(format) => {
            Ok((quality.to_string(), format.to_string()))
        }
        _ => Err(RequestError::InvalidFile(s.to_string())),
    }
}

/// Format a number without a trailing `.0` for integral values.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
