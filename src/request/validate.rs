//! Advisory checks of request parameters against declared maxima.

use crate::descriptor::Descriptor;
use crate::error::ValidationWarning;

use super::{ImageRequestParams, SizeSpec};

/// Check requested output dimensions against `maxWidth`, `maxHeight` and
/// `maxArea`.
///
/// Only sizes with explicit pixel dimensions are checked. The area check
/// needs both dimensions, so it applies to `w,h` (with or without `!`) only.
/// Warnings never prevent encoding.
pub fn validate(params: &ImageRequestParams, descriptor: &Descriptor) -> Vec<ValidationWarning> {
    let (width, height) = match params.size.spec {
        SizeSpec::Width { width } => (Some(width), None),
        SizeSpec::Height { height } => (None, Some(height)),
        SizeSpec::WidthHeight { width, height } => (Some(width), Some(height)),
        _ => return Vec::new(),
    };

    let mut warnings = Vec::new();

    if let (Some(width), Some(height), Some(max_area)) = (width, height, descriptor.max_area()) {
        let area = width.saturating_mul(height);
        if area > max_area {
            warnings.push(ValidationWarning::AreaExceeded { area, max_area });
        }
    }

    if let (Some(width), Some(max_width)) = (width, descriptor.max_width()) {
        if width > max_width {
            warnings.push(ValidationWarning::WidthExceeded { width, max_width });
        }
    }

    if let (Some(height), Some(max_height)) = (height, descriptor.max_height()) {
        if height > max_height {
            warnings.push(ValidationWarning::HeightExceeded { height, max_height });
        }
    }

    warnings
}
