//! Image request tests against parsed descriptors.
//!
//! Tests verify:
//! - Input URLs are split into service URL and request parameters
//! - Decoded requests re-encode canonically against the service
//! - Validation warnings and preview selections on realistic services

use iiif_inspector::{
    decode, encode, parse, parse_input_url, region_from_selection, request_url, validate,
    Descriptor, ImageRequestParams, Rect, Region, Rotation, Selection, Size, SizeSpec,
    ValidationWarning,
};

use super::test_utils::{v2_info, v3_info, V2_SERVICE, V3_SERVICE};

fn v2() -> Descriptor {
    parse(V2_SERVICE, &v2_info()).unwrap()
}

fn v3() -> Descriptor {
    parse(V3_SERVICE, &v3_info()).unwrap()
}

// =============================================================================
// Input URLs
// =============================================================================

#[test]
fn test_input_url_forms() {
    let (service, params) = parse_input_url(V2_SERVICE);
    assert_eq!(service, V2_SERVICE);
    assert!(params.is_none());

    let (service, params) = parse_input_url(&format!("{}/info.json", V2_SERVICE));
    assert_eq!(service, V2_SERVICE);
    assert!(params.is_none());

    let (service, params) =
        parse_input_url(&format!("  {}/square/,300/!180/bitonal.png?token=abc  ", V2_SERVICE));
    assert_eq!(service, V2_SERVICE);
    let params = params.unwrap();
    assert_eq!(params.region, Region::Square);
    assert_eq!(params.size, Size::new(SizeSpec::Height { height: 300 }));
    assert_eq!(params.rotation, Rotation::mirrored(180.0));
    assert_eq!(params.quality, "bitonal");
    assert_eq!(params.format, "png");
}

#[test]
fn test_malformed_request_is_treated_as_service_url() {
    let input = format!("{}/full/max/45deg/default.jpg", V3_SERVICE);
    let (service, params) = parse_input_url(&input);
    assert_eq!(service, input);
    assert!(params.is_none());
}

// =============================================================================
// Canonical Encoding
// =============================================================================

#[test]
fn test_decoded_request_is_canonicalized_per_service() {
    let d = v2();

    // The full-image pixel region depends on the service dimensions
    let params = decode("0,0,1000,800/pct:50/360/color.jpg").unwrap();
    assert_eq!(encode(&params, &d), "full/pct:50/0/color.jpg");
    assert_eq!(encode(&params, &v3()), "0,0,1000,800/pct:50/0/color.jpg");

    let params = decode("pct:0,0,100,100/max/0/default.jpg").unwrap();
    assert_eq!(request_url(&d, &params), format!("{}/full/max/0/default.jpg", V2_SERVICE));
}

#[test]
fn test_input_url_round_trip() {
    let d = v3();
    let input = format!("{}/pct:12.5,0,50,50/^!1200,800/90.5/gray.webp", V3_SERVICE);

    let (service, params) = parse_input_url(&input);
    assert_eq!(service, d.root_id());

    let url = request_url(&d, &params.unwrap());
    assert_eq!(url, input);

    // Encoding is stable
    let (_, reparsed) = parse_input_url(&url);
    assert_eq!(request_url(&d, &reparsed.unwrap()), url);
}

#[test]
fn test_default_params() {
    let d = v3();
    assert_eq!(
        request_url(&d, &ImageRequestParams::default()),
        format!("{}/full/max/0/default.jpg", V3_SERVICE)
    );
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_validate_against_profile_maxima() {
    let d = v2();
    let mut params = ImageRequestParams::default();

    params.size = Size::new(SizeSpec::WidthHeight {
        width: 600,
        height: 600,
    })
    .confined();
    assert_eq!(
        validate(&params, &d),
        vec![ValidationWarning::AreaExceeded {
            area: 360000,
            max_area: 250000
        }]
    );

    params.size = Size::new(SizeSpec::WidthHeight {
        width: 500,
        height: 400,
    });
    assert!(validate(&params, &d).is_empty());

    // A single dimension cannot exceed an area
    params.size = Size::new(SizeSpec::Width { width: 900 });
    assert!(validate(&params, &d).is_empty());
}

#[test]
fn test_validate_width_on_v3() {
    let d = v3();
    let params = decode("full/3001,/0/default.jpg").unwrap();

    let warnings = validate(&params, &d);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].to_string(),
        "Size has a width (3001) which is greater than the maximum (3000)"
    );
}

// =============================================================================
// Selection
// =============================================================================

#[test]
fn test_selection_on_computed_thumbnail() {
    // v2 sample has no preferred sizes, so the preview is 512x410
    let d = v2();
    let selection = Selection {
        x: 128.0,
        y: 0.0,
        width: 256.0,
        height: 205.0,
    };

    let region = region_from_selection(&d, selection, false);
    assert_eq!(region, Region::Pixels(Rect::new(250.0, 0.0, 500.0, 400.0)));

    let region = region_from_selection(&d, selection, true);
    assert_eq!(region.to_string(), "pct:25,0,50,50");
}

#[test]
fn test_selection_of_whole_preview_encodes_full() {
    let d = v3();
    let thumbnail = d.thumbnail().unwrap();
    let selection = Selection {
        x: 0.0,
        y: 0.0,
        width: thumbnail.width as f64,
        height: thumbnail.height as f64,
    };

    for percent in [false, true] {
        let params = ImageRequestParams {
            region: region_from_selection(&d, selection, percent),
            ..Default::default()
        };
        assert_eq!(encode(&params, &d), "full/max/0/default.jpg");
    }
}
