//! Interpretation of user-supplied URLs.

use tracing::debug;

use super::codec::split_request;
use super::ImageRequestParams;

const INFO_JSON_SUFFIX: &str = "/info.json";

/// Split pasted input into a service URL and optional request parameters.
///
/// The query string is dropped first. Then:
///
/// - `.../info.json` yields the URL without the suffix and no parameters
/// - a URL ending in a well-formed image request yields the prefix and the
///   decoded parameters
/// - anything else is returned as the service URL unchanged
///
/// A trailing `/` on the resulting service URL is removed.
pub fn parse_input_url(raw: &str) -> (String, Option<ImageRequestParams>) {
    let input = raw.trim();
    let input = input.split('?').next().unwrap_or(input);

    if let Some(service_url) = input.strip_suffix(INFO_JSON_SUFFIX) {
        return (service_url.trim_end_matches('/').to_string(), None);
    }

    match split_request(input) {
        Ok((prefix, params)) if !prefix.is_empty() => {
            return (prefix.trim_end_matches('/').to_string(), Some(params));
        }
        Ok(_) => {}
        Err(e) => debug!(input = input, "Input is not an image request: {}", e),
    }

    (input.trim_end_matches('/').to_string(), None)
}
