//! API integration tests for the inspect and request endpoints.
//!
//! Tests verify:
//! - Inspection responses for v2 and v3 services
//! - Error reporting for unreachable and non-IIIF services
//! - Request building, validation warnings and preview selections
//! - Caching and forced refresh through the registry

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::test_utils::{
    get_json, post_json, query_encode, sample_source, test_router, HTML_SERVICE, MISSING_SERVICE,
    PLAIN_JSON_SERVICE, PROTECTED_SERVICE, UNREACHABLE_SERVICE, V2_SERVICE, V3_SERVICE,
};

fn inspect_uri(url: &str) -> String {
    format!("/inspect?url={}", query_encode(url))
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json(test_router(sample_source()), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// Inspect
// =============================================================================

#[tokio::test]
async fn test_inspect_v3_service() {
    let router = test_router(sample_source());
    let (status, body) = get_json(router, &inspect_uri(V3_SERVICE)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceUrl"], V3_SERVICE);
    assert_eq!(body["http"]["httpStatus"], 200);
    assert_eq!(body["http"]["errors"], json!([]));
    assert!(body.get("request").is_none());

    let descriptor = &body["descriptor"];
    assert_eq!(descriptor["rootId"], V3_SERVICE);
    assert_eq!(descriptor["rootVersion"], 3);
    assert_eq!(descriptor["complianceLevel"], "level1");
    assert_eq!(descriptor["imageWidth"], 6000);
    assert_eq!(descriptor["maxArea"], 4000000);
    assert_eq!(
        descriptor["thumbnail"]["url"],
        format!("{}/full/768,512/0/default.webp", V3_SERVICE)
    );
}

#[tokio::test]
async fn test_inspect_info_json_url() {
    let router = test_router(sample_source());
    let (status, body) = get_json(router, &inspect_uri(&format!("{}/info.json", V2_SERVICE))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceUrl"], V2_SERVICE);
    assert_eq!(body["descriptor"]["rootVersion"], 2);
    assert_eq!(body["descriptor"]["complianceLevel"], "level2");
}

#[tokio::test]
async fn test_inspect_image_request_url() {
    let router = test_router(sample_source());
    let input = format!("{}/0,0,6000,4000/!3000,3000/360/gray.png", V3_SERVICE);
    let (status, body) = get_json(router, &inspect_uri(&input)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serviceUrl"], V3_SERVICE);
    assert_eq!(body["params"]["quality"], "gray");
    assert_eq!(body["params"]["size"]["confine"], true);

    let request = &body["request"];
    assert_eq!(request["path"], "full/!3000,3000/0/gray.png");
    assert_eq!(
        request["url"],
        format!("{}/full/!3000,3000/0/gray.png", V3_SERVICE)
    );
    assert_eq!(
        request["warnings"],
        json!(["Size has an area (9000000) which is greater than the maximum (4000000)"])
    );
}

#[tokio::test]
async fn test_inspect_reports_fetch_errors() {
    let cases = [
        (UNREACHABLE_SERVICE, "Connection Failed"),
        (PROTECTED_SERVICE, "Authentication Required"),
        (MISSING_SERVICE, "Unexpected Response"),
        (HTML_SERVICE, "Invalid Response (JSON Parse Error)"),
        (PLAIN_JSON_SERVICE, "IIIF Image Not Detected"),
    ];

    for (service, message) in cases {
        let router = test_router(sample_source());
        let (status, body) = get_json(router, &inspect_uri(service)).await;

        assert_eq!(status, StatusCode::OK, "{}", service);
        assert!(body["descriptor"].is_null(), "{}", service);
        assert_eq!(body["http"]["errors"][0]["message"], message, "{}", service);
    }
}

#[tokio::test]
async fn test_inspect_requires_url() {
    let (status, body) = get_json(test_router(sample_source()), "/inspect").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_inspect_is_cached_until_refresh() {
    let source = sample_source();
    let router = test_router(source.clone());
    let info_url = format!("{}/info.json", V3_SERVICE);

    get_json(router.clone(), &inspect_uri(V3_SERVICE)).await;
    get_json(router.clone(), &inspect_uri(&format!("{}/full/max/0/default.jpg", V3_SERVICE))).await;
    assert_eq!(source.request_count(&info_url).await, 1);

    let uri = format!("{}&refresh=true", inspect_uri(V3_SERVICE));
    let (status, _) = get_json(router, &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.request_count(&info_url).await, 2);
}

#[tokio::test]
async fn test_inspect_failures_are_retried() {
    let source = sample_source();
    let router = test_router(source.clone());
    let info_url = format!("{}/info.json", MISSING_SERVICE);

    get_json(router.clone(), &inspect_uri(MISSING_SERVICE)).await;
    get_json(router, &inspect_uri(MISSING_SERVICE)).await;
    assert_eq!(source.request_count(&info_url).await, 2);
}

// =============================================================================
// Request
// =============================================================================

#[tokio::test]
async fn test_request_defaults() {
    let router = test_router(sample_source());
    let (status, body) = post_json(router, "/request", json!({ "serviceUrl": V2_SERVICE })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "full/max/0/default.jpg");
    assert_eq!(body["url"], format!("{}/full/max/0/default.jpg", V2_SERVICE));
    assert_eq!(body["warnings"], json!([]));
}

#[tokio::test]
async fn test_request_with_params_and_warnings() {
    let router = test_router(sample_source());
    let (status, body) = post_json(
        router,
        "/request",
        json!({
            "serviceUrl": V3_SERVICE,
            "params": {
                "region": { "type": "percent", "x": 0, "y": 0, "w": 100, "h": 100 },
                "size": { "spec": { "type": "widthHeight", "width": 3500, "height": 2000 } },
                "rotation": { "degrees": 90, "mirror": true },
                "quality": "default",
                "format": "png"
            }
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "full/3500,2000/!90/default.png");
    assert_eq!(
        body["warnings"],
        json!([
            "Size has an area (7000000) which is greater than the maximum (4000000)",
            "Size has a width (3500) which is greater than the maximum (3000)"
        ])
    );
}

#[tokio::test]
async fn test_request_with_selection() {
    let router = test_router(sample_source());

    // Thumbnail is 768x512; the selection is the top-left quarter
    let selection = json!({ "x": 0, "y": 0, "width": 384, "height": 256 });

    let (status, body) = post_json(
        router.clone(),
        "/request",
        json!({ "serviceUrl": V3_SERVICE, "selection": selection }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "0,0,3000,2000/max/0/default.jpg");
    assert_eq!(body["params"]["region"]["type"], "pixels");

    let (status, body) = post_json(
        router,
        "/request",
        json!({ "serviceUrl": V3_SERVICE, "selection": selection, "percent": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["path"], "pct:0,0,50,50/max/0/default.jpg");
}

#[tokio::test]
async fn test_request_not_iiif() {
    let router = test_router(sample_source());
    let (status, body) =
        post_json(router, "/request", json!({ "serviceUrl": PLAIN_JSON_SERVICE })).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "not_detected");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("IIIF Image Not Detected"));
}

#[tokio::test]
async fn test_request_requires_service_url() {
    let router = test_router(sample_source());
    let (status, _) = post_json(router, "/request", json!({ "serviceUrl": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_request_malformed_body() {
    let router = test_router(sample_source());
    let (status, body) = post_json(router, "/request", json!({ "params": {} })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_request_rotation_out_of_range() {
    let router = test_router(sample_source());
    let params = json!({
        "region": { "type": "full" },
        "size": { "spec": { "type": "max" } },
        "rotation": { "degrees": 450 },
        "quality": "default",
        "format": "jpg"
    });

    let (status, body) = post_json(
        router,
        "/request",
        json!({ "serviceUrl": V3_SERVICE, "params": params }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_request");
    assert!(body["message"].as_str().unwrap().contains("450"));
}

#[tokio::test]
async fn test_request_empty_selection() {
    let router = test_router(sample_source());
    let selection = json!({ "x": 10, "y": 10, "width": 0, "height": 0 });

    let (status, body) = post_json(
        router,
        "/request",
        json!({ "serviceUrl": V3_SERVICE, "selection": selection }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_params");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid region"));
}

// =============================================================================
// CORS
// =============================================================================

#[tokio::test]
async fn test_cors_any_origin() {
    let router = test_router(sample_source());
    let request = Request::builder()
        .uri("/health")
        .header("origin", "https://viewer.example.com")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
