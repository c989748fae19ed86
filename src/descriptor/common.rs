//! Parsing helpers shared by the v2 and v3 parsers.

use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::compliance::ApiVersion;

use super::{PreferredSize, Term, TileSet};

/// Value of `protocol` for every IIIF image service.
pub(crate) const IMAGE_PROTOCOL: &str = "http://iiif.io/api/image";

/// Name of the identifier field for a version.
pub(crate) const fn id_field(version: ApiVersion) -> &'static str {
    match version {
        ApiVersion::V2 => "@id",
        ApiVersion::V3 => "id",
    }
}

/// Check the version-identifying header of a document.
///
/// Requires an object with the image `protocol`, an `@context` (scalar or
/// array) containing the version's context URI, and a non-empty identifier.
pub(crate) fn check_header(body: &Value, version: ApiVersion) -> Option<&Map<String, Value>> {
    let doc = body.as_object()?;

    if doc.get("protocol").and_then(Value::as_str) != Some(IMAGE_PROTOCOL) {
        debug!(version = version.number(), "Rejected: protocol is not {}", IMAGE_PROTOCOL);
        return None;
    }

    let context = doc.get("@context")?;
    let has_context = one_or_many(context)
        .into_iter()
        .any(|v| v.as_str() == Some(version.context_uri()));
    if !has_context {
        debug!(version = version.number(), "Rejected: @context does not match");
        return None;
    }

    match doc.get(id_field(version)).and_then(Value::as_str) {
        Some(id) if !id.is_empty() => Some(doc),
        _ => {
            debug!(
                version = version.number(),
                "Rejected: missing {}",
                id_field(version)
            );
            None
        }
    }
}

/// Resolve a (possibly relative) identifier against the URL it was fetched from.
pub(crate) fn resolve_id(http_url: &str, id: &str) -> Option<String> {
    let resolved = match Url::parse(http_url) {
        Ok(base) => base.join(id),
        Err(_) => Url::parse(id),
    };

    match resolved {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            debug!(id = id, base = http_url, "Rejected: identifier is not a URL: {}", e);
            None
        }
    }
}

/// Treat a value as a list: arrays as-is, anything else as a single element.
pub(crate) fn one_or_many(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(values) => values.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// Collect the string elements of an optional scalar-or-array field.
pub(crate) fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .map(one_or_many)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

/// Read a strictly positive integer. Integral floats (`1024.0`) are accepted.
pub(crate) fn positive_int(value: Option<&Value>) -> Option<u64> {
    let value = value?;
    let n = match value.as_u64() {
        Some(n) => n,
        None => {
            let f = value.as_f64()?;
            if f.fract() != 0.0 || f < 1.0 || f > u64::MAX as f64 {
                return None;
            }
            f as u64
        }
    };
    (n > 0).then_some(n)
}

/// Strip a leading `http://` or `https://` for link display text.
pub(crate) fn link_text(href: &str) -> &str {
    href.strip_prefix("https://")
        .or_else(|| href.strip_prefix("http://"))
        .unwrap_or(href)
}

// =============================================================================
// Shared sections
// =============================================================================

/// Read full-resolution `width`/`height`.
pub(crate) fn image_dimensions(doc: &Map<String, Value>) -> Option<(u64, u64)> {
    let width = positive_int(doc.get("width"));
    let height = positive_int(doc.get("height"));
    match (width, height) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => {
            debug!("Rejected: width/height missing or not positive integers");
            None
        }
    }
}

/// The `Size` term for the full-resolution dimensions.
pub(crate) fn size_term(width: u64, height: u64) -> Term {
    Term::text("Size", format!("{}×{}", width, height))
}

/// Read `sizes`, defaulting each height to its width, sorted ascending.
///
/// Source order is not guaranteed by the API, so it is not preserved.
pub(crate) fn preferred_sizes(doc: &Map<String, Value>) -> Vec<PreferredSize> {
    let mut sizes: Vec<PreferredSize> = doc
        .get("sizes")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    let width = positive_int(entry.get("width"))?;
                    let height = positive_int(entry.get("height")).unwrap_or(width);
                    Some(PreferredSize { width, height })
                })
                .collect()
        })
        .unwrap_or_default();

    sizes.sort();
    sizes
}

/// Read `tiles`, sorting scale factors, and append one `Tiles` term per set.
pub(crate) fn tile_sets(doc: &Map<String, Value>, terms: &mut Vec<Term>) -> Vec<TileSet> {
    let Some(entries) = doc.get("tiles").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut sets = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(width) = positive_int(entry.get("width")) else {
            continue;
        };
        let height = positive_int(entry.get("height")).unwrap_or(width);

        let mut scale_factors: Vec<u64> = entry
            .get("scaleFactors")
            .and_then(Value::as_array)
            .map(|factors| factors.iter().filter_map(|f| positive_int(Some(f))).collect())
            .unwrap_or_default();
        scale_factors.sort_unstable();

        terms.push(Term::text("Tiles", tile_term_text(width, height, &scale_factors)));
        sets.push(TileSet {
            width,
            height,
            scale_factors,
        });
    }
    sets
}

fn tile_term_text(width: u64, height: u64, scale_factors: &[u64]) -> String {
    if scale_factors.is_empty() {
        return format!("{}×{}", width, height);
    }

    let factors: Vec<String> = scale_factors.iter().map(u64::to_string).collect();
    format!("{}×{} ({})", width, height, factors.join("/"))
}

/// Maxima declared by a service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Maxima {
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub area: Option<u64>,
}

impl Maxima {
    /// Read `maxWidth`/`maxHeight`/`maxArea` from an object.
    pub(crate) fn read(obj: &Map<String, Value>) -> Self {
        Self {
            width: positive_int(obj.get("maxWidth")),
            height: positive_int(obj.get("maxHeight")),
            area: positive_int(obj.get("maxArea")),
        }
    }

    /// Values from `other` replace ours where present.
    pub(crate) fn overridden_by(self, other: Self) -> Self {
        Self {
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            area: other.area.or(self.area),
        }
    }

    /// Append one `Maximum` term per declared maximum.
    pub(crate) fn push_terms(&self, terms: &mut Vec<Term>) {
        for (kind, value) in [
            ("Width", self.width),
            ("Height", self.height),
            ("Area", self.area),
        ] {
            if let Some(value) = value {
                terms.push(Term::text("Maximum", format!("{} ({})", kind, value)));
            }
        }
    }
}
