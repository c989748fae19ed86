//! End-to-end inspection tests through the library API.
//!
//! Tests verify:
//! - v2 and v3 documents normalize to the same descriptor model
//! - Capability resolution against compliance levels and extras
//! - Informational terms and thumbnail selection on realistic documents

use serde_json::json;

use iiif_inspector::{inspect, ApiVersion, ComplianceLevel, InspectError, TermValue};

use super::test_utils::{sample_source, MockInfoSource, V2_SERVICE, V3_SERVICE};

#[tokio::test]
async fn test_v3_descriptor() {
    let source = sample_source();
    let inspection = inspect(&source, V3_SERVICE).await.unwrap();
    let d = inspection.descriptor.unwrap();

    assert_eq!(d.version(), ApiVersion::V3);
    assert_eq!(d.compliance_level(), ComplianceLevel::Level1);
    assert_eq!(d.service_name(), "Image Service (v3)");
    assert_eq!(d.compliance_name(), "Level 1");
    assert_eq!((d.image_width(), d.image_height()), (6000, 4000));
    assert_eq!(d.max_width(), Some(3000));
    assert_eq!(d.max_height(), None);

    assert_eq!(d.tile_sets().len(), 1);
    assert_eq!(d.tile_sets()[0].height, 512);
    assert_eq!(d.tile_sets()[0].scale_factors, vec![1, 2, 4, 8]);

    assert_eq!(d.supported_qualities(), vec!["default", "gray"]);
    assert_eq!(d.supported_formats(), vec!["jpg", "png", "webp"]);

    let flags = d.feature_flags();
    assert_eq!(flags.get("mirroring"), Some(&true));
    assert_eq!(flags.get("rotationArbitrary"), Some(&true));
    assert_eq!(flags.get("regionByPx"), Some(&true));
    assert_eq!(flags.get("regionByPct"), Some(&false));
    assert_eq!(flags.get("sizeUpscaling"), Some(&false));
}

#[tokio::test]
async fn test_v3_terms() {
    let source = sample_source();
    let d = inspect(&source, V3_SERVICE).await.unwrap().descriptor.unwrap();

    let groups = d.grouped_terms();
    let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["Rights", "Size", "Tiles", "Maximum"]);

    assert_eq!(
        groups[0].values,
        vec![TermValue {
            text: "creativecommons.org/licenses/by/4.0/".to_string(),
            href: Some("http://creativecommons.org/licenses/by/4.0/".to_string()),
        }]
    );
    assert_eq!(groups[1].values[0].text, "6000×4000");
    assert_eq!(groups[2].values[0].text, "512×512 (1/2/4/8)");

    let maxima: Vec<&str> = groups[3].values.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(maxima, vec!["Width (3000)", "Area (4000000)"]);
}

#[tokio::test]
async fn test_v2_descriptor() {
    let source = sample_source();
    let d = inspect(&source, V2_SERVICE).await.unwrap().descriptor.unwrap();

    assert_eq!(d.version(), ApiVersion::V2);
    assert_eq!(d.compliance_level(), ComplianceLevel::Level2);
    assert_eq!(d.service_name(), "Image Service (v2)");
    assert_eq!(d.max_area(), Some(250000));

    // Level 2 qualities plus the declared extra
    let qualities = d.supported_qualities();
    assert!(qualities.contains(&"bitonal"));
    assert!(qualities.contains(&"color"));
    assert!(qualities.contains(&"gray"));

    let formats = d.supported_formats();
    assert!(formats.contains(&"jpg"));
    assert!(formats.contains(&"png"));
    assert!(formats.contains(&"webp"));
    assert!(!formats.contains(&"tif"));

    assert!(d.supports_feature("canonicalLinkHeader"));
    assert!(d.supports_feature("regionByPct"));
    assert!(!d.supports_feature("sizeAboveFull"));

    // Features not yet actionable for v2 are hidden from the flags
    let flags = d.feature_flags();
    assert!(!flags.contains_key("sizeAboveFull"));
    assert!(!flags.contains_key("sizeByWhListed"));
    assert_eq!(flags.get("rotationBy90s"), Some(&true));
}

#[tokio::test]
async fn test_v2_terms_and_thumbnail() {
    let source = sample_source();
    let d = inspect(&source, V2_SERVICE).await.unwrap().descriptor.unwrap();

    let labels: Vec<&str> = d.informational_terms().iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, vec!["Attribution", "License", "Size", "Tiles", "Maximum"]);

    // No preferred sizes: 512 wide, aspect ratio kept, default format
    let thumbnail = d.thumbnail().unwrap();
    assert_eq!((thumbnail.width, thumbnail.height), (512, 410));
    assert_eq!(thumbnail.url, format!("{}/full/512,410/0/default.jpg", V2_SERVICE));
}

#[tokio::test]
async fn test_relative_id_resolved() {
    let service = "https://iiif.example.org/image/relative";
    let source = MockInfoSource::new().with_info(
        service,
        json!({
            "@context": "http://iiif.io/api/image/3/context.json",
            "id": "other",
            "protocol": "http://iiif.io/api/image",
            "profile": "level0",
            "width": 100,
            "height": 100
        }),
    );

    let d = inspect(&source, service).await.unwrap().descriptor.unwrap();
    assert_eq!(d.root_id(), "https://iiif.example.org/image/other");
}

#[tokio::test]
async fn test_version_is_never_guessed() {
    // v3 context with a v2-style profile array is neither version
    let service = "https://iiif.example.org/image/mixed";
    let source = MockInfoSource::new().with_info(
        service,
        json!({
            "@context": "http://iiif.io/api/image/3/context.json",
            "id": service,
            "@id": service,
            "protocol": "http://iiif.io/api/image",
            "profile": ["http://iiif.io/api/image/2/level2.json"],
            "width": 100,
            "height": 100
        }),
    );

    let inspection = inspect(&source, service).await.unwrap();
    assert!(inspection.descriptor.is_none());
    assert_eq!(inspection.error_messages(), vec!["IIIF Image Not Detected".to_string()]);
}

#[tokio::test]
async fn test_empty_input() {
    let source = sample_source();
    assert!(matches!(inspect(&source, "").await, Err(InspectError::EmptyInput)));
}
