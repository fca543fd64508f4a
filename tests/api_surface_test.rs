mod common;

use actix_web::http::header;
use actix_web::{http::StatusCode, test};
use common::TestApp;
use serial_test::serial;

#[actix_rt::test]
#[serial]
async fn test_health_stays_up_when_the_database_is_down() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    //dead database degrades the report but never takes the endpoint down
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["mongodb"]["status"], "error");
    assert_eq!(body["services"]["image_storage"]["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[actix_rt::test]
#[serial]
async fn test_listing_endpoints_fail_closed_without_a_database() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/activitybookings").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Failed to retrieve bookings");
    assert!(body["error"].is_string());

    let req = test::TestRequest::get().uri("/api/bookinglist").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal server error");

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let error = body["error"].as_str().unwrap_or_default();
    assert!(error.starts_with("Failed to fetch blogs"), "got {:?}", error);
}

#[actix_rt::test]
#[serial]
async fn test_malformed_search_query_gets_a_json_envelope() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // Query deserialization fails before the handler runs; the rejection
    // must carry the same JSON envelope as handler-level 400s.
    let req = test::TestRequest::get()
        .uri("/api/rooms/search?minPrice=abc")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(
        message.starts_with("Query deserialize error"),
        "got {:?}",
        message
    );
}

#[actix_rt::test]
#[serial]
async fn test_unknown_routes_return_not_found() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/definitely-not-a-route")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
#[serial]
async fn test_cors_allows_browser_clients() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header((header::ORIGIN, "http://localhost:3000"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}
