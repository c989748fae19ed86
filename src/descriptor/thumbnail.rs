//! Preview thumbnail selection.

use serde::Serialize;

use super::Descriptor;

/// Minimum edge length a preview should have, in pixels.
pub const THUMBNAIL_TARGET_SIZE: u64 = 512;

/// Format used when the service states no preference.
const DEFAULT_FORMAT: &str = "jpg";

/// A preview image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: u64,
    pub height: u64,
}

/// Pick a representative preview for a descriptor.
///
/// The first preferred size (ascending) whose width and height are both at
/// least [`THUMBNAIL_TARGET_SIZE`] wins, since a server-declared size is the
/// one most likely to be served. Otherwise a `512,h` request preserving the
/// aspect ratio is used.
pub fn select_thumbnail(descriptor: &Descriptor) -> Thumbnail {
    let format = descriptor
        .preferred_formats()
        .first()
        .map(String::as_str)
        .unwrap_or(DEFAULT_FORMAT);

    let (width, height) = descriptor
        .preferred_sizes()
        .iter()
        .find(|s| s.width >= THUMBNAIL_TARGET_SIZE && s.height >= THUMBNAIL_TARGET_SIZE)
        .map(|s| (s.width, s.height))
        .unwrap_or_else(|| {
            let height = (THUMBNAIL_TARGET_SIZE as f64 * descriptor.image_height() as f64
                / descriptor.image_width() as f64)
                .round() as u64;
            (THUMBNAIL_TARGET_SIZE, height)
        });

    Thumbnail {
        url: format!(
            "{}/full/{},{}/0/default.{}",
            descriptor.root_id(),
            width,
            height,
            format
        ),
        width,
        height,
    }
}
