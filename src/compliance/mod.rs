//! Compliance tables and capability resolution.
//!
//! Every IIIF image service declares a compliance level. A level implies a
//! baseline set of qualities, formats and features; a service may declare
//! more on top of that. This module holds the static per-version tables and
//! the resolver that merges the two into a single list.
//!
//! ```text
//! ┌─────────────────────┐   ┌──────────────────────┐
//! │  compliance level   │   │  declared extras     │
//! │  (level0/1/2)       │   │  (extraFormats, ...) │
//! └──────────┬──────────┘   └───────────┬──────────┘
//!            └─────────────┬────────────┘
//!                          ▼
//!               ┌─────────────────────┐
//!               │      resolve()      │◄── table(version, kind)
//!               └──────────┬──────────┘
//!                          ▼
//!              Vec<ResolvedCapability>
//! ```
//!
//! # Example
//!
//! ```
//! use iiif_inspector::compliance::{resolve, table, ApiVersion, CapabilityKind, ComplianceLevel};
//!
//! let extras = vec!["webp".to_string()];
//! let formats = resolve(
//!     table(ApiVersion::V3, CapabilityKind::Format),
//!     Some(ComplianceLevel::Level1),
//!     &extras,
//! );
//!
//! let supported: Vec<&str> = formats
//!     .iter()
//!     .filter(|f| f.supported)
//!     .map(|f| f.name.as_str())
//!     .collect();
//! assert_eq!(supported, vec!["jpg", "webp"]);
//! ```

mod resolve;
mod tables;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

pub use resolve::{resolve, ResolvedCapability};
pub use tables::{table, ComplianceEntry, V2_DEFERRED_FEATURES};

// =============================================================================
// ApiVersion
// =============================================================================

/// Major version of the IIIF Image API a descriptor conforms to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Image API 2.x (`@id`, profile array)
    V2,

    /// Image API 3.x (`id`, profile string)
    V3,
}

impl ApiVersion {
    /// Numeric major version.
    pub const fn number(&self) -> u8 {
        match self {
            ApiVersion::V2 => 2,
            ApiVersion::V3 => 3,
        }
    }

    /// JSON-LD context URI identifying documents of this version.
    pub const fn context_uri(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "http://iiif.io/api/image/2/context.json",
            ApiVersion::V3 => "http://iiif.io/api/image/3/context.json",
        }
    }

    /// Human-readable service name.
    pub const fn service_name(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "Image Service (v2)",
            ApiVersion::V3 => "Image Service (v3)",
        }
    }

    /// Link to the published API specification.
    pub const fn spec_url(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "https://iiif.io/api/image/2.1/",
            ApiVersion::V3 => "https://iiif.io/api/image/3.0/",
        }
    }

    /// Link to the compliance section of the published specification.
    pub const fn compliance_spec_url(&self) -> &'static str {
        match self {
            ApiVersion::V2 => "https://iiif.io/api/image/2.1/compliance/",
            ApiVersion::V3 => "https://iiif.io/api/image/3.0/compliance/",
        }
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

// =============================================================================
// ComplianceLevel
// =============================================================================

/// Named compliance tier of an image service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceLevel {
    Level0,
    Level1,
    Level2,
}

impl ComplianceLevel {
    /// Short identifier as used in v3 `profile` (`level0`, ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComplianceLevel::Level0 => "level0",
            ComplianceLevel::Level1 => "level1",
            ComplianceLevel::Level2 => "level2",
        }
    }

    /// Display name (`Level 0`, ...).
    pub const fn display_name(&self) -> &'static str {
        match self {
            ComplianceLevel::Level0 => "Level 0",
            ComplianceLevel::Level1 => "Level 1",
            ComplianceLevel::Level2 => "Level 2",
        }
    }

    /// Parse a v2 compliance URI, bare or with a `.json` suffix.
    ///
    /// ```
    /// use iiif_inspector::compliance::ComplianceLevel;
    ///
    /// assert_eq!(
    ///     ComplianceLevel::from_v2_uri("http://iiif.io/api/image/2/level1.json"),
    ///     Some(ComplianceLevel::Level1)
    /// );
    /// assert_eq!(ComplianceLevel::from_v2_uri("level1"), None);
    /// ```
    pub fn from_v2_uri(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("http://iiif.io/api/image/2/")?;
        let name = rest.strip_suffix(".json").unwrap_or(rest);
        match name {
            "level0" => Some(ComplianceLevel::Level0),
            "level1" => Some(ComplianceLevel::Level1),
            "level2" => Some(ComplianceLevel::Level2),
            _ => None,
        }
    }
}

impl FromStr for ComplianceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "level0" => Ok(ComplianceLevel::Level0),
            "level1" => Ok(ComplianceLevel::Level1),
            "level2" => Ok(ComplianceLevel::Level2),
            other => Err(format!("unknown compliance level: {}", other)),
        }
    }
}

impl fmt::Display for ComplianceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CapabilityKind
// =============================================================================

/// The three kinds of capability a service declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// Color rendering mode (`default`, `gray`, ...)
    Quality,

    /// Output file type (`jpg`, `png`, ...)
    Format,

    /// Request syntax support (`regionByPct`, `sizeByW`, ...)
    Feature,
}
