//! Image API 3.0 `info.json` parser.

use serde_json::{Map, Value};
use tracing::debug;

use crate::compliance::{resolve, table, ApiVersion, CapabilityKind, ComplianceLevel};

use super::common::{self, Maxima};
use super::{Descriptor, Term};

/// Parse a v3 `info.json`.
///
/// Returns `None` when the document is not a v3 image service or its
/// `profile` is not exactly one of `level0`, `level1`, `level2`.
pub fn parse_v3(http_url: &str, body: &Value) -> Option<Descriptor> {
    let doc = common::check_header(body, ApiVersion::V3)?;
    let id = doc.get("id").and_then(Value::as_str)?;
    let root_id = common::resolve_id(http_url, id)?;

    let level = match doc.get("profile").and_then(Value::as_str) {
        Some(profile) => match profile.parse::<ComplianceLevel>() {
            Ok(level) => level,
            Err(e) => {
                debug!(id = id, "Rejected v3 document: {}", e);
                return None;
            }
        },
        None => {
            debug!(id = id, "Rejected v3 document: profile is not a string");
            return None;
        }
    };

    let (image_width, image_height) = common::image_dimensions(doc)?;

    let extra_features = common::string_list(doc.get("extraFeatures"));
    let extra_qualities = common::string_list(doc.get("extraQualities"));
    let preferred_formats = common::string_list(doc.get("preferredFormats"));
    let mut extra_formats = common::string_list(doc.get("extraFormats"));
    extra_formats.extend(preferred_formats.iter().cloned());

    let mut terms = Vec::new();
    push_rights(doc, &mut terms);
    push_part_of(doc, &mut terms);
    terms.push(common::size_term(image_width, image_height));
    let tile_sets = common::tile_sets(doc, &mut terms);

    let maxima = Maxima::read(doc);
    maxima.push_terms(&mut terms);

    let descriptor = Descriptor {
        root_id,
        root_version: ApiVersion::V3,
        compliance_level: level,
        image_width,
        image_height,
        max_width: maxima.width,
        max_height: maxima.height,
        max_area: maxima.area,
        preferred_sizes: common::preferred_sizes(doc),
        tile_sets,
        qualities: resolve(
            table(ApiVersion::V3, CapabilityKind::Quality),
            Some(level),
            &extra_qualities,
        ),
        formats: resolve(
            table(ApiVersion::V3, CapabilityKind::Format),
            Some(level),
            &extra_formats,
        ),
        preferred_formats,
        features: resolve(
            table(ApiVersion::V3, CapabilityKind::Feature),
            Some(level),
            &extra_features,
        ),
        thumbnail: None,
        informational_terms: terms,
    };

    Some(descriptor.finish())
}

fn push_rights(doc: &Map<String, Value>, terms: &mut Vec<Term>) {
    if let Some(rights) = doc.get("rights").and_then(Value::as_str) {
        if !rights.is_empty() {
            terms.push(Term::link("Rights", common::link_text(rights), rights));
        }
    }
}

fn push_part_of(doc: &Map<String, Value>, terms: &mut Vec<Term>) {
    let Some(parts) = doc.get("partOf") else {
        return;
    };

    for part in common::one_or_many(parts) {
        let Some(href) = part.get("id").and_then(Value::as_str) else {
            continue;
        };
        let text = part
            .get("label")
            .and_then(label_text)
            .or_else(|| part.get("type").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| common::link_text(href).to_string());
        terms.push(Term::link("Part of", text, href));
    }
}

/// Text of a label: a plain string, or the first value of a language map
/// (`{"en": ["Title"]}`).
fn label_text(label: &Value) -> Option<String> {
    match label {
        Value::String(s) => Some(s.clone()),
        Value::Object(languages) => languages
            .values()
            .flat_map(common::one_or_many)
            .find_map(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
