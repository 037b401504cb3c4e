mod common;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};

use common::{place_json, vehicles_json, TestApp};

#[actix_rt::test]
async fn test_root_endpoint() {
    let app = test::init_service(
        App::new().route("/", web::get().to(|| async { "Trip builder API is running" })),
    )
    .await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    assert_eq!(body, "Trip builder API is running");
}

#[actix_rt::test]
async fn test_featured_places_are_proxied() {
    let mut test_app = TestApp::new().await;
    let _places = test_app
        .server
        .mock("GET", "/api/places")
        .match_query(mockito::Matcher::UrlEncoded("featured".into(), "true".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([place_json("p1", "Sigiriya"), place_json("p2", "Ella")]).to_string())
        .create_async()
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get()
        .uri("/api/places?featured=true")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    // new sessions start with the featured list as candidates
    let req = test::TestRequest::post()
        .uri("/api/custom-package/sessions")
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session: Value = test::read_body_json(resp).await;
    assert_eq!(session["candidates"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_vehicles_load_into_store() {
    let mut test_app = TestApp::new().await;
    let _vehicles = test_app
        .mock_json("GET", "/api/vehicles", 200, vehicles_json())
        .await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/vehicles").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body[0]["pricePerDay"], 80.0);

    let state = test_app.state.stores.vehicles.snapshot();
    assert!(!state.loading);
    assert_eq!(state.items.len(), 2);
}

#[actix_rt::test]
async fn test_catalog_failure_is_bad_gateway() {
    let mut test_app = TestApp::new().await;
    let _drivers = test_app
        .mock_json("GET", "/api/drivers", 503, json!({ "error": "maintenance" }))
        .await;
    let _root = test_app.mock_json("GET", "/api/", 200, json!({})).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/drivers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let state = test_app.state.stores.drivers.snapshot();
    assert!(!state.loading);
    assert!(state.error.unwrap().contains("maintenance"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["services"]["backend"]["status"], "ok");
    assert_eq!(body["services"]["catalogs"]["status"], "error");
}

#[actix_rt::test]
async fn test_hotel_tiers() {
    let test_app = TestApp::new().await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/api/hotel-tiers").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    let standard = body
        .as_array()
        .unwrap()
        .iter()
        .find(|tier| tier["id"] == "standard")
        .unwrap();
    assert_eq!(standard["pricePerNight"], 85.0);
}

#[actix_rt::test]
async fn test_health_check_ok() {
    let mut test_app = TestApp::new().await;
    let _root = test_app.mock_json("GET", "/api/", 200, json!({})).await;
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
}
