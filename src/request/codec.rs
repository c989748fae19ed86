//! Canonical encoding and lenient decoding of image request paths.

use serde::Serialize;

use crate::descriptor::Descriptor;
use crate::error::RequestError;

use super::{parse_file, ImageRequestParams, Region};

/// The four encoded segments of an image request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestSlugs {
    pub region: String,
    pub size: String,
    pub rotation: String,
    pub file: String,
}

impl RequestSlugs {
    /// `{region}/{size}/{rotation}/{file}`
    pub fn path(&self) -> String {
        format!("{}/{}/{}/{}", self.region, self.size, self.rotation, self.file)
    }
}

/// Encode each segment in canonical form.
///
/// A region covering the whole image, either `pct:0,0,100,100` or
/// `0,0,{width},{height}`, is written as `full`.
pub fn slugs(params: &ImageRequestParams, descriptor: &Descriptor) -> RequestSlugs {
    RequestSlugs {
        region: region_slug(&params.region, descriptor),
        size: params.size.to_string(),
        rotation: params.rotation.to_string(),
        file: format!("{}.{}", params.quality, params.format),
    }
}

fn region_slug(region: &Region, descriptor: &Descriptor) -> String {
    let covers_image = match region {
        Region::Percent(rect) => rect.covers(100.0, 100.0),
        Region::Pixels(rect) => rect.covers(
            descriptor.image_width() as f64,
            descriptor.image_height() as f64,
        ),
        _ => false,
    };

    if covers_image {
        Region::Full.to_string()
    } else {
        region.to_string()
    }
}

/// Encode parameters as `{region}/{size}/{rotation}/{quality}.{format}`.
pub fn encode(params: &ImageRequestParams, descriptor: &Descriptor) -> String {
    slugs(params, descriptor).path()
}

/// Full image request URL: `{rootId}/{encoded path}`.
pub fn request_url(descriptor: &Descriptor, params: &ImageRequestParams) -> String {
    format!("{}/{}", descriptor.root_id(), encode(params, descriptor))
}

/// Decode the trailing four segments of a path or URL.
///
/// Anything before the segments is ignored. Returns `None` unless every
/// segment is well formed.
pub fn decode(path: &str) -> Option<ImageRequestParams> {
    split_request(path).ok().map(|(_, params)| params)
}

/// Split a path into the prefix before the image request segments and the
/// decoded parameters. The prefix is empty when the path is only segments.
pub(crate) fn split_request(path: &str) -> Result<(&str, ImageRequestParams), RequestError> {
    let mut parts = path.rsplitn(5, '/');
    let (Some(file), Some(rotation), Some(size), Some(region)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(RequestError::NotAnImageRequest(path.to_string()));
    };
    let prefix = parts.next().unwrap_or("");

    let (quality, format) = parse_file(file)?;
    let params = ImageRequestParams {
        region: region.parse()?,
        size: size.parse()?,
        rotation: rotation.parse()?,
        quality,
        format,
    };

    Ok((prefix, params))
}
