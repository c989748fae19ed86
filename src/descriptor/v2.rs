//! Image API 2.1 `info.json` parser.
//!
//! The v2 `profile` is an array. Its first element must be a compliance
//! level URI; later elements are either profile description objects, which
//! add formats, qualities, supported features and maxima, or legacy strings
//! that are ignored.

use serde_json::{Map, Value};
use tracing::debug;

use crate::compliance::{resolve, table, ApiVersion, CapabilityKind, ComplianceLevel};

use super::common::{self, Maxima};
use super::{Descriptor, Term};

/// `@type` of a v2 image information document, when present.
const IMAGE_TYPE: &str = "iiif:Image";

/// `@type` of a v2 profile description object, when present.
const PROFILE_TYPE: &str = "iiif:ImageProfile";

// =============================================================================
// Profile entries
// =============================================================================

/// Contents of a profile description object.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct ProfileDescription {
    formats: Vec<String>,
    qualities: Vec<String>,
    supports: Vec<String>,
    maxima: Maxima,
}

/// One element of the v2 `profile` array.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ProfileEntry {
    /// A compliance level URI (bare or `.json`)
    Compliance(ComplianceLevel),

    /// A profile description object
    Description(ProfileDescription),

    /// Anything else: legacy shorthand strings, foreign objects
    Ignored,
}

impl ProfileEntry {
    fn classify(value: &Value) -> Self {
        match value {
            Value::String(uri) => match ComplianceLevel::from_v2_uri(uri) {
                Some(level) => ProfileEntry::Compliance(level),
                None => ProfileEntry::Ignored,
            },
            Value::Object(obj) => match obj.get("@type").and_then(Value::as_str) {
                Some(t) if t != PROFILE_TYPE => ProfileEntry::Ignored,
                _ => ProfileEntry::Description(ProfileDescription::read(obj)),
            },
            _ => ProfileEntry::Ignored,
        }
    }
}

impl ProfileDescription {
    fn read(obj: &Map<String, Value>) -> Self {
        Self {
            formats: common::string_list(obj.get("formats")),
            qualities: common::string_list(obj.get("qualities")),
            supports: common::string_list(obj.get("supports")),
            maxima: Maxima::read(obj),
        }
    }
}

/// Level and cumulative extras gathered from the profile array.
struct Profile {
    level: ComplianceLevel,
    extras: ProfileDescription,
}

fn read_profile(profile: &Value, top_level: Maxima) -> Option<Profile> {
    let entries = profile.as_array()?;
    let (first, rest) = entries.split_first()?;

    let ProfileEntry::Compliance(level) = ProfileEntry::classify(first) else {
        return None;
    };

    let mut extras = ProfileDescription {
        maxima: top_level,
        ..ProfileDescription::default()
    };

    for entry in rest {
        if let ProfileEntry::Description(description) = ProfileEntry::classify(entry) {
            extras.formats.extend(description.formats);
            extras.qualities.extend(description.qualities);
            extras.supports.extend(description.supports);
            extras.maxima = extras.maxima.overridden_by(description.maxima);
        }
    }

    Some(Profile { level, extras })
}

// =============================================================================
// Parser
// =============================================================================

/// Parse a v2 `info.json`.
///
/// Returns `None` when the document is not a v2 image service or the first
/// `profile` element is not a recognized compliance level URI.
pub fn parse_v2(http_url: &str, body: &Value) -> Option<Descriptor> {
    let doc = common::check_header(body, ApiVersion::V2)?;
    let id = doc.get("@id").and_then(Value::as_str)?;

    if let Some(t) = doc.get("@type").and_then(Value::as_str) {
        if t != IMAGE_TYPE {
            debug!(id = id, "Rejected v2 document: @type is {}", t);
            return None;
        }
    }

    let root_id = common::resolve_id(http_url, id)?;

    // Top-level maxima are not conformant but appear in the wild; profile
    // objects take precedence.
    let Some(profile) = doc
        .get("profile")
        .and_then(|p| read_profile(p, Maxima::read(doc)))
    else {
        debug!(id = id, "Rejected v2 document: profile does not start with a level URI");
        return None;
    };

    let (image_width, image_height) = common::image_dimensions(doc)?;

    let mut terms = Vec::new();
    push_attribution(doc, &mut terms);
    push_license(doc, &mut terms);
    terms.push(common::size_term(image_width, image_height));
    let tile_sets = common::tile_sets(doc, &mut terms);

    let Profile { level, extras } = profile;
    extras.maxima.push_terms(&mut terms);

    let descriptor = Descriptor {
        root_id,
        root_version: ApiVersion::V2,
        compliance_level: level,
        image_width,
        image_height,
        max_width: extras.maxima.width,
        max_height: extras.maxima.height,
        max_area: extras.maxima.area,
        preferred_sizes: common::preferred_sizes(doc),
        tile_sets,
        qualities: resolve(
            table(ApiVersion::V2, CapabilityKind::Quality),
            Some(level),
            &extras.qualities,
        ),
        formats: resolve(
            table(ApiVersion::V2, CapabilityKind::Format),
            Some(level),
            &extras.formats,
        ),
        preferred_formats: Vec::new(),
        features: resolve(
            table(ApiVersion::V2, CapabilityKind::Feature),
            Some(level),
            &extras.supports,
        ),
        thumbnail: None,
        informational_terms: terms,
    };

    Some(descriptor.finish())
}

fn push_attribution(doc: &Map<String, Value>, terms: &mut Vec<Term>) {
    let Some(attribution) = doc.get("attribution") else {
        return;
    };

    for value in common::one_or_many(attribution) {
        let text = match value {
            Value::String(s) => Some(s.as_str()),
            Value::Object(obj) => obj.get("@value").and_then(Value::as_str),
            _ => None,
        };
        if let Some(text) = text {
            terms.push(Term::text("Attribution", text));
        }
    }
}

fn push_license(doc: &Map<String, Value>, terms: &mut Vec<Term>) {
    for license in common::string_list(doc.get("license")) {
        terms.push(Term::link("License", common::link_text(&license), license.as_str()));
    }
}
