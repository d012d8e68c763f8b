//! Tests for destination handlers.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::inbound::http::test_utils::{
    bearer, demo_token, error_message, memory_state, seeded_destination, test_app,
};

macro_rules! destinations_app {
    ($state:expr) => {
        test::init_service(test_app($state).service(web::scope("/api").service(scope()))).await
    };
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (state, _backend) = memory_state();
    let app = destinations_app!(state);
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = res.status();
    (status, test::read_body_json(res).await)
}

fn names(rows: &Value) -> Vec<&str> {
    rows.as_array()
        .map(|rows| rows.iter().filter_map(|row| row["name"].as_str()).collect())
        .unwrap_or_default()
}

#[actix_web::test]
async fn listing_filters_by_country_and_reports_pagination() {
    let (status, body) = get_json("/api/destinations?country=JAP&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body["data"]), vec!["Kyoto"]);
    assert_eq!(body["pagination"], json!({ "total": 1, "limit": 5, "offset": 0 }));
}

#[actix_web::test]
async fn listing_applies_minimum_rating() {
    let (_, body) = get_json("/api/destinations?min_rating=4.7").await;
    let mut found = names(&body["data"]);
    found.sort_unstable();
    assert_eq!(found, vec!["Cusco", "Kyoto"]);
}

#[rstest]
#[case("/api/destinations?limit=0", "invalid_pagination")]
#[case("/api/destinations?limit=-1", "invalid_query")]
#[case("/api/destinations?min_rating=high", "invalid_query")]
#[actix_web::test]
async fn malformed_queries_are_rejected(#[case] uri: &str, #[case] code: &str) {
    let (status, body) = get_json(uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], code);
}

#[actix_web::test]
async fn popular_orders_by_trip_count() {
    let (status, body) = get_json("/api/destinations/popular?limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), vec!["Kyoto", "Lisbon"]);
}

#[rstest]
#[case("/api/destinations/search?q=lis", vec!["Lisbon"])]
#[case("/api/destinations/search?q=PERU", vec!["Cusco"])]
#[actix_web::test]
async fn search_matches_name_or_country(#[case] uri: &str, #[case] expected: Vec<&str>) {
    let (status, body) = get_json(uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(names(&body), expected);
}

#[rstest]
#[case("/api/destinations/search")]
#[case("/api/destinations/search?q=%20")]
#[case("/api/destinations/search?q=%28%29")]
#[case("/api/destinations/search?q=%2A%25")]
#[actix_web::test]
async fn search_requires_text(#[case] uri: &str) {
    let (status, body) = get_json(uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_message(&body), Some("Search query is required"));
}

#[actix_web::test]
async fn detail_embeds_activities_and_trips() {
    let (state, _backend) = memory_state();
    let destination = seeded_destination(&state).await;
    let app = destinations_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/destinations/{}", destination.id))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["name"], destination.name);
    assert!(body["activities"].is_array());
    assert!(body["trips"].is_array());
}

#[actix_web::test]
async fn unknown_destination_is_not_found() {
    let (status, body) = get_json("/api/destinations/3fa85f64-5717-4562-b3fc-2c963f66afa6").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_message(&body), Some("Destination not found"));
}

#[actix_web::test]
async fn create_requires_auth_and_fields() {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let app = destinations_app!(state);

    let anonymous = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/destinations")
            .set_json(json!({ "name": "Porto", "country": "Portugal" }))
            .to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let missing = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/destinations")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Porto" }))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(missing).await;
    assert_eq!(
        error_message(&body),
        Some("Missing required fields: name and country are required")
    );

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/destinations")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Porto", "country": "Portugal", "average_cost_per_day": "85" }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(created).await;
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["average_cost_per_day"], 85.0);
    assert!(body["created_by"].is_string());
}
