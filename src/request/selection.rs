//! Conversion of a preview selection into a request region.

use serde::Deserialize;

use crate::descriptor::Descriptor;

use super::{Rect, Region};

/// A rectangle selected on the preview thumbnail, in thumbnail pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Selection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale a thumbnail selection to the full image.
///
/// Percent regions are rounded to two decimals, pixel regions to whole
/// pixels. Falls back to the full region when the descriptor has no
/// thumbnail to measure against.
pub fn region_from_selection(descriptor: &Descriptor, selection: Selection, percent: bool) -> Region {
    let Some(thumbnail) = descriptor.thumbnail() else {
        return Region::Full;
    };
    if thumbnail.width == 0 || thumbnail.height == 0 {
        return Region::Full;
    }

    let (tw, th) = (thumbnail.width as f64, thumbnail.height as f64);

    if percent {
        let pct = |v: f64, of: f64| (v / of * 10000.0).round() / 100.0;
        Region::Percent(Rect::new(
            pct(selection.x, tw),
            pct(selection.y, th),
            pct(selection.width, tw),
            pct(selection.height, th),
        ))
    } else {
        let (iw, ih) = (descriptor.image_width() as f64, descriptor.image_height() as f64);
        let px = |v: f64, of: f64, full: f64| (v / of * full).round();
        Region::Pixels(Rect::new(
            px(selection.x, tw, iw),
            px(selection.y, th, ih),
            px(selection.width, tw, iw),
            px(selection.height, th, ih),
        ))
    }
}
