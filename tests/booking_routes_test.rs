mod common;

use actix_web::{http::StatusCode, test};
use common::TestApp;
use serde_json::json;
use serial_test::serial;

const VALID_OBJECT_ID: &str = "507f1f77bcf86cd799439011";

#[actix_rt::test]
#[serial]
async fn test_add_booking_rejects_empty_payload() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/activitybookings")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "All fields are required");
    assert_eq!(
        body["missingFields"],
        json!([
            "guestName",
            "email",
            "phoneNumber",
            "noOfPassengers",
            "date",
            "activityId"
        ])
    );
}

#[actix_rt::test]
#[serial]
async fn test_add_booking_reports_only_absent_fields() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // Whitespace-only values count as absent, same as omitted ones.
    let req = test::TestRequest::post()
        .uri("/activitybookings")
        .set_json(json!({
            "guestName": "Jane Doe",
            "email": "   ",
            "noOfPassengers": 2
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "All fields are required");
    assert_eq!(
        body["missingFields"],
        json!(["email", "phoneNumber", "date", "activityId"])
    );
}

#[actix_rt::test]
#[serial]
async fn test_add_booking_collects_field_errors() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/activitybookings")
        .set_json(json!({
            "guestName": "J4ne",
            "email": "not-an-email",
            "phoneNumber": "123",
            "noOfPassengers": 0,
            "date": "2026-13-99",
            "activityId": "definitely-not-hex"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Booking validation failed");

    let errors = body["errors"].as_object().expect("errors map");
    assert_eq!(errors.len(), 6);
    assert_eq!(
        errors["guestName"],
        "Guest name may only contain letters and spaces"
    );
    assert_eq!(errors["email"], "Enter a valid email address");
    assert_eq!(
        errors["phoneNumber"],
        "Phone number must be 10 to 15 digits, with an optional leading +"
    );
    assert_eq!(errors["noOfPassengers"], "At least one passenger is required");
    assert_eq!(errors["date"], "Date must be a valid YYYY-MM-DD date");
    assert_eq!(errors["activityId"], "Invalid activity id format");
}

#[actix_rt::test]
#[serial]
async fn test_add_booking_rejects_past_dates() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/activitybookings")
        .set_json(json!({
            "guestName": "Jane Doe",
            "email": "jane@example.com",
            "phoneNumber": "0771234567",
            "noOfPassengers": 2,
            "date": "2020-01-01",
            "activityId": VALID_OBJECT_ID
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "You cannot book a past date!");
}

#[actix_rt::test]
#[serial]
async fn test_booking_id_routes_reject_malformed_ids() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/activitybookings/not-a-hex-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid booking ID format");

    let req = test::TestRequest::delete()
        .uri("/activitybookings/not-a-hex-id")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid booking ID format");

    let req = test::TestRequest::put()
        .uri("/activitybookings/not-a-hex-id")
        .set_json(json!({ "email": "jane@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid booking ID format");
}

#[actix_rt::test]
#[serial]
async fn test_update_booking_requires_at_least_one_field() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/activitybookings/{}", VALID_OBJECT_ID))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "At least one field must be provided");
}

#[actix_rt::test]
#[serial]
async fn test_add_booking_rejects_truncated_json_with_json_envelope() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    // Body parsing fails before the handler runs; the envelope must still
    // be JSON, not the framework's plain-text default.
    let req = test::TestRequest::post()
        .uri("/activitybookings")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"guestName": "Jane""#)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap_or_default();
    assert!(
        message.starts_with("Json deserialize error"),
        "got {:?}",
        message
    );
}

#[actix_rt::test]
#[serial]
async fn test_update_booking_validates_provided_fields() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::put()
        .uri(&format!("/activitybookings/{}", VALID_OBJECT_ID))
        .set_json(json!({ "email": "broken", "noOfPassengers": 3 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Booking validation failed");
    assert_eq!(body["errors"]["email"], "Enter a valid email address");
    assert!(body["errors"].get("noOfPassengers").is_none());
}
