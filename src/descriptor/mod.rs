//! Normalized image descriptors parsed from `info.json`.
//!
//! A IIIF image service describes itself with an `info.json` document whose
//! shape depends on the API version. This module turns either shape into a
//! single [`Descriptor`].
//!
//! # Dispatch
//!
//! ```text
//!  (request URL, JSON body)
//!            │
//!            ▼
//!   ┌─────────────────┐  None   ┌─────────────────┐  None
//!   │   parse_v3()    │────────►│   parse_v2()    │────────► not an IIIF image
//!   └────────┬────────┘         └────────┬────────┘
//!            │ Some                      │ Some
//!            └───────────┬───────────────┘
//!                        ▼
//!            Descriptor (thumbnail selected)
//! ```
//!
//! Each parser only accepts documents whose header (`protocol`, `@context`
//! and identifier field) names its own version, so a broken v3 document is
//! never mistaken for a v2 one. Parsers never fail with an error; a `None`
//! means "not this version" or "malformed compliance declaration", which
//! cannot be told apart.
//!
//! # Example
//!
//! ```
//! use iiif_inspector::descriptor::parse;
//! use serde_json::json;
//!
//! let body = json!({
//!     "@context": "http://iiif.io/api/image/3/context.json",
//!     "id": "https://example.org/iiif/book1-page1",
//!     "type": "ImageService3",
//!     "protocol": "http://iiif.io/api/image",
//!     "profile": "level1",
//!     "width": 6000,
//!     "height": 4000
//! });
//!
//! let descriptor = parse("https://example.org/iiif/book1-page1", &body).unwrap();
//! assert_eq!(descriptor.image_width(), 6000);
//! assert_eq!(descriptor.supported_formats(), vec!["jpg"]);
//! ```

mod common;
mod thumbnail;
mod v2;
mod v3;

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::compliance::{ApiVersion, ComplianceLevel, ResolvedCapability, V2_DEFERRED_FEATURES};

pub use thumbnail::{select_thumbnail, Thumbnail, THUMBNAIL_TARGET_SIZE};
pub use v2::parse_v2;
pub use v3::parse_v3;

// =============================================================================
// Model
// =============================================================================

/// A server-declared preferred size.
///
/// Ordering is by width, then height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PreferredSize {
    pub width: u64,
    pub height: u64,
}

/// A tile set declared by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSet {
    /// Tile width in pixels
    pub width: u64,

    /// Tile height in pixels (defaults to the width)
    pub height: u64,

    /// Scale factors, ascending
    pub scale_factors: Vec<u64>,
}

/// The value of an informational term.
///
/// Values are plain text. Links carry their target separately so the
/// presentation layer decides how (and whether) to render them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermValue {
    pub text: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// A labelled piece of display metadata (attribution, rights, tiles, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    pub label: String,
    pub value: TermValue,
}

impl Term {
    /// A plain-text term.
    pub fn text(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: TermValue {
                text: text.into(),
                href: None,
            },
        }
    }

    /// A term linking to `href`, displayed as `text`.
    pub fn link(label: impl Into<String>, text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: TermValue {
                text: text.into(),
                href: Some(href.into()),
            },
        }
    }
}

/// Terms sharing a label, in order of first appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermGroup {
    pub label: String,
    pub values: Vec<TermValue>,
}

// =============================================================================
// Descriptor
// =============================================================================

/// Normalized, version-independent view of an image service.
///
/// Only the parsers in this module construct descriptors, and a descriptor
/// is read-only once returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub(crate) root_id: String,
    pub(crate) root_version: ApiVersion,
    pub(crate) compliance_level: ComplianceLevel,
    pub(crate) image_width: u64,
    pub(crate) image_height: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_width: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_height: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) max_area: Option<u64>,
    pub(crate) preferred_sizes: Vec<PreferredSize>,
    pub(crate) tile_sets: Vec<TileSet>,
    pub(crate) qualities: Vec<ResolvedCapability>,
    pub(crate) formats: Vec<ResolvedCapability>,
    pub(crate) preferred_formats: Vec<String>,
    pub(crate) features: Vec<ResolvedCapability>,
    pub(crate) thumbnail: Option<Thumbnail>,
    pub(crate) informational_terms: Vec<Term>,
}

impl Descriptor {
    /// Select the thumbnail. Called once, by the parser that built `self`.
    pub(crate) fn finish(mut self) -> Self {
        debug_assert!(self.thumbnail.is_none(), "thumbnail selected twice");
        self.thumbnail = Some(select_thumbnail(&self));
        self
    }

    /// Absolute service identifier (the base of every image request).
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// API version the document was parsed as.
    pub fn version(&self) -> ApiVersion {
        self.root_version
    }

    pub fn compliance_level(&self) -> ComplianceLevel {
        self.compliance_level
    }

    /// Full-resolution width in pixels.
    pub fn image_width(&self) -> u64 {
        self.image_width
    }

    /// Full-resolution height in pixels.
    pub fn image_height(&self) -> u64 {
        self.image_height
    }

    pub fn max_width(&self) -> Option<u64> {
        self.max_width
    }

    pub fn max_height(&self) -> Option<u64> {
        self.max_height
    }

    pub fn max_area(&self) -> Option<u64> {
        self.max_area
    }

    /// Preferred sizes, ascending by width then height.
    pub fn preferred_sizes(&self) -> &[PreferredSize] {
        &self.preferred_sizes
    }

    pub fn tile_sets(&self) -> &[TileSet] {
        &self.tile_sets
    }

    /// All known qualities, supported or not.
    pub fn qualities(&self) -> &[ResolvedCapability] {
        &self.qualities
    }

    /// All known formats, supported or not.
    pub fn formats(&self) -> &[ResolvedCapability] {
        &self.formats
    }

    /// Formats the service prefers, in its order (always empty for v2).
    pub fn preferred_formats(&self) -> &[String] {
        &self.preferred_formats
    }

    /// All known features, supported or not.
    pub fn features(&self) -> &[ResolvedCapability] {
        &self.features
    }

    /// The selected preview image.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_ref()
    }

    /// Display metadata in parse order.
    pub fn informational_terms(&self) -> &[Term] {
        &self.informational_terms
    }

    pub fn service_name(&self) -> &'static str {
        self.root_version.service_name()
    }

    pub fn service_spec_url(&self) -> &'static str {
        self.root_version.spec_url()
    }

    pub fn compliance_name(&self) -> &'static str {
        self.compliance_level.display_name()
    }

    pub fn compliance_spec_url(&self) -> &'static str {
        self.root_version.compliance_spec_url()
    }

    /// Names of the qualities the service supports.
    pub fn supported_qualities(&self) -> Vec<&str> {
        supported_names(&self.qualities)
    }

    /// Names of the formats the service supports.
    pub fn supported_formats(&self) -> Vec<&str> {
        supported_names(&self.formats)
    }

    /// Whether a feature is supported.
    pub fn supports_feature(&self, name: &str) -> bool {
        self.features.iter().any(|f| f.name == name && f.supported)
    }

    /// Actionable features mapped to whether they are supported.
    ///
    /// v2 features in [`V2_DEFERRED_FEATURES`] are left out; they still
    /// appear in [`Descriptor::features`].
    pub fn feature_flags(&self) -> BTreeMap<String, bool> {
        self.features
            .iter()
            .filter(|f| {
                self.root_version != ApiVersion::V2
                    || !V2_DEFERRED_FEATURES.contains(&f.name.as_str())
            })
            .map(|f| (f.name.clone(), f.supported))
            .collect()
    }

    /// Informational terms grouped by label, groups ordered by the first
    /// appearance of their label.
    pub fn grouped_terms(&self) -> Vec<TermGroup> {
        let mut groups: Vec<TermGroup> = Vec::new();
        for term in &self.informational_terms {
            match groups.iter_mut().find(|g| g.label == term.label) {
                Some(group) => group.values.push(term.value.clone()),
                None => groups.push(TermGroup {
                    label: term.label.clone(),
                    values: vec![term.value.clone()],
                }),
            }
        }
        groups
    }
}

fn supported_names(capabilities: &[ResolvedCapability]) -> Vec<&str> {
    capabilities
        .iter()
        .filter(|c| c.supported)
        .map(|c| c.name.as_str())
        .collect()
}

// =============================================================================
// Dispatch
// =============================================================================

/// Parse an `info.json` body fetched from `http_url`.
///
/// Tries v3, then v2; the first parser that accepts the document wins.
/// Returns `None` when neither version recognizes it.
pub fn parse(http_url: &str, body: &Value) -> Option<Descriptor> {
    parse_v3(http_url, body).or_else(|| parse_v2(http_url, body))
}
