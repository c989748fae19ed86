//! Static compliance tables for Image API v2 and v3.
//!
//! Qualities and formats are identical across versions. Features differ in
//! small ways (e.g. `sizeUpscaling` only exists in v3, `sizeAboveFull` only
//! in v2, and several level requirements moved), so each version gets its
//! own feature table while the resolver stays version-agnostic.

use super::{ApiVersion, CapabilityKind, ComplianceLevel};

use super::ComplianceLevel::{Level0, Level1, Level2};

/// A named capability and the compliance levels that imply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceEntry {
    /// Capability name as it appears in `info.json`
    pub name: &'static str,

    /// Compliance levels under which this capability is implied
    pub required_levels: &'static [ComplianceLevel],

    /// Grouping for display (`HTTP`, `Region`, `Size`, `Rotation`)
    pub category: Option<&'static str>,

    /// One-line description for display
    pub description: Option<&'static str>,
}

impl ComplianceEntry {
    const fn plain(name: &'static str, required_levels: &'static [ComplianceLevel]) -> Self {
        Self {
            name,
            required_levels,
            category: None,
            description: None,
        }
    }

    const fn feature(
        name: &'static str,
        category: &'static str,
        required_levels: &'static [ComplianceLevel],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            required_levels,
            category: Some(category),
            description: Some(description),
        }
    }

    /// Whether the given level implies this capability.
    pub fn implied_by(&self, level: ComplianceLevel) -> bool {
        self.required_levels.contains(&level)
    }
}

const ANY: &[ComplianceLevel] = &[Level0, Level1, Level2];
const L1: &[ComplianceLevel] = &[Level1, Level2];
const L2: &[ComplianceLevel] = &[Level2];
const NONE: &[ComplianceLevel] = &[];

/// v2 feature names that are resolved and displayed, but not offered as
/// request-builder options.
pub const V2_DEFERRED_FEATURES: &[&str] = &[
    "sizeAboveFull",
    "sizeByDistortedWh",
    "sizeByWhListed",
    "sizeByForcedWh",
];

const QUALITIES: &[ComplianceEntry] = &[
    ComplianceEntry::plain("bitonal", NONE),
    ComplianceEntry::plain("color", L2),
    ComplianceEntry::plain("default", ANY),
    ComplianceEntry::plain("gray", L2),
];

const FORMATS: &[ComplianceEntry] = &[
    ComplianceEntry::plain("jpg", ANY),
    ComplianceEntry::plain("png", L2),
    ComplianceEntry::plain("gif", NONE),
    ComplianceEntry::plain("jp2", NONE),
    ComplianceEntry::plain("pdf", NONE),
    ComplianceEntry::plain("webp", NONE),
    ComplianceEntry::plain("tif", NONE),
];

const V2_FEATURES: &[ComplianceEntry] = &[
    ComplianceEntry::feature(
        "baseUriRedirect",
        "HTTP",
        L1,
        "The base URI of the service will redirect to the image information document.",
    ),
    ComplianceEntry::feature(
        "canonicalLinkHeader",
        "HTTP",
        NONE,
        "The canonical image URI HTTP link header is provided on image responses.",
    ),
    ComplianceEntry::feature(
        "cors",
        "HTTP",
        L1,
        "The CORS HTTP header is provided on all responses.",
    ),
    ComplianceEntry::feature(
        "jsonldMediaType",
        "HTTP",
        L1,
        "The JSON-LD media type is provided when JSON-LD is requested.",
    ),
    ComplianceEntry::feature(
        "mirroring",
        "Rotation",
        NONE,
        "The image may be rotated around the vertical axis, resulting in a left-to-right mirroring of the content.",
    ),
    ComplianceEntry::feature(
        "profileLinkHeader",
        "HTTP",
        NONE,
        "The profile HTTP link header is provided on image responses.",
    ),
    ComplianceEntry::feature(
        "regionByPct",
        "Region",
        L2,
        "Regions of images may be requested by percentage.",
    ),
    ComplianceEntry::feature(
        "regionByPx",
        "Region",
        L1,
        "Regions of images may be requested by pixel dimensions.",
    ),
    ComplianceEntry::feature(
        "regionSquare",
        "Region",
        NONE,
        "A square region where the width and height are equal to the shorter dimension of the complete image content.",
    ),
    ComplianceEntry::feature(
        "rotationArbitrary",
        "Rotation",
        NONE,
        "Rotation of images may be requested by degrees other than multiples of 90.",
    ),
    ComplianceEntry::feature(
        "rotationBy90s",
        "Rotation",
        L2,
        "Rotation of images may be requested by degrees in multiples of 90.",
    ),
    ComplianceEntry::feature(
        "sizeAboveFull",
        "Size",
        NONE,
        "Size of images may be requested larger than the `full` size. See warning.",
    ),
    ComplianceEntry::feature(
        "sizeByConfinedWh",
        "Size",
        L2,
        "Size of images may be requested in the form `!w,h`.",
    ),
    ComplianceEntry::feature(
        "sizeByDistortedWh",
        "Size",
        L2,
        "Size of images may be requested in the form `w,h`, including sizes that would distort the image.",
    ),
    ComplianceEntry::feature(
        "sizeByH",
        "Size",
        L1,
        "Size of images may be requested in the form `,h`.",
    ),
    ComplianceEntry::feature(
        "sizeByPct",
        "Size",
        L1,
        "Size of images may be requested in the form `pct:n`.",
    ),
    ComplianceEntry::feature(
        "sizeByW",
        "Size",
        L1,
        "Size of images may be requested in the form `w,`.",
    ),
    ComplianceEntry::feature(
        "sizeByWh",
        "Size",
        L2,
        "Size of images may be requested in the form `w,h` where the supplied w and h preserve the aspect ratio.",
    ),
    ComplianceEntry::feature("sizeByWhListed", "Size", NONE, "See deprecation warning."),
    ComplianceEntry::feature("sizeByForcedWh", "Size", NONE, "See deprecation warning."),
];

const V3_FEATURES: &[ComplianceEntry] = &[
    ComplianceEntry::feature(
        "baseUriRedirect",
        "HTTP",
        L1,
        "The base URI of the service will redirect to the image information document.",
    ),
    ComplianceEntry::feature(
        "canonicalLinkHeader",
        "HTTP",
        NONE,
        "The canonical image URI HTTP link header is provided on image responses.",
    ),
    ComplianceEntry::feature(
        "cors",
        "HTTP",
        L1,
        "The CORS HTTP headers are provided on all responses.",
    ),
    ComplianceEntry::feature(
        "jsonldMediaType",
        "HTTP",
        L1,
        "The JSON-LD media type is provided when requested.",
    ),
    ComplianceEntry::feature(
        "mirroring",
        "Rotation",
        NONE,
        "The image may be rotated around the vertical axis, resulting in a left-to-right mirroring of the content.",
    ),
    ComplianceEntry::feature(
        "profileLinkHeader",
        "HTTP",
        NONE,
        "The profile HTTP link header is provided on image responses.",
    ),
    ComplianceEntry::feature(
        "regionByPct",
        "Region",
        L2,
        "Regions of the full image may be requested by percentage.",
    ),
    ComplianceEntry::feature(
        "regionByPx",
        "Region",
        L1,
        "Regions of the full image may be requested by pixel dimensions.",
    ),
    ComplianceEntry::feature(
        "regionSquare",
        "Region",
        L1,
        "A square region may be requested, where the width and height are equal to the shorter dimension of the full image.",
    ),
    ComplianceEntry::feature(
        "rotationArbitrary",
        "Rotation",
        NONE,
        "Image rotation may be requested using values other than multiples of 90 degrees.",
    ),
    ComplianceEntry::feature(
        "rotationBy90s",
        "Rotation",
        L2,
        "Image rotation may be requested in multiples of 90 degrees.",
    ),
    ComplianceEntry::feature(
        "sizeByConfinedWh",
        "Size",
        L2,
        "Image size may be requested in the form `!w,h`.",
    ),
    ComplianceEntry::feature(
        "sizeByH",
        "Size",
        L1,
        "Image size may be requested in the form `,h`.",
    ),
    ComplianceEntry::feature(
        "sizeByPct",
        "Size",
        L2,
        "Images size may be requested in the form `pct:n`.",
    ),
    ComplianceEntry::feature(
        "sizeByW",
        "Size",
        L1,
        "Image size may be requested in the form `w,`.",
    ),
    ComplianceEntry::feature(
        "sizeByWh",
        "Size",
        L1,
        "Image size may be requested in the form `w,h`.",
    ),
    ComplianceEntry::feature(
        "sizeUpscaling",
        "Size",
        NONE,
        "Image sizes prefixed with `^` may be requested.",
    ),
];

/// Look up the static table for a version and capability kind.
pub fn table(version: ApiVersion, kind: CapabilityKind) -> &'static [ComplianceEntry] {
    match (version, kind) {
        (_, CapabilityKind::Quality) => QUALITIES,
        (_, CapabilityKind::Format) => FORMATS,
        (ApiVersion::V2, CapabilityKind::Feature) => V2_FEATURES,
        (ApiVersion::V3, CapabilityKind::Feature) => V3_FEATURES,
    }
}
