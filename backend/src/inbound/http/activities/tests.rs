//! Tests for activity handlers.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::PageRequest;
use crate::inbound::http::test_utils::{
    bearer, demo_token, error_message, memory_state, seeded_destination, sign_in, test_app,
};
use crate::outbound::memory::{MODERATOR_EMAIL, MODERATOR_PASSWORD};

macro_rules! activities_app {
    ($state:expr) => {
        test::init_service(test_app($state).service(web::scope("/api").service(scope()))).await
    };
}

async fn seeded_activity_id(state: &HttpState) -> Uuid {
    state
        .activities
        .list(&ActivityFilter::default(), PageRequest::default())
        .await
        .expect("activities listed")
        .data
        .first()
        .map(|listing| listing.activity.id)
        .expect("seeded activity")
}

#[actix_web::test]
async fn listing_filters_by_price_and_embeds_badges() {
    let (state, _backend) = memory_state();
    let app = activities_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/activities?min_price=40&max_price=80")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let rows = body["data"].as_array().expect("data array");
    let mut names: Vec<&str> = rows.iter().filter_map(|row| row["name"].as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["Nishiki market tasting", "Rainbow Mountain trek"]);
    assert!(rows.iter().all(|row| row["activity_types"]["name"].is_string()));
    assert!(rows.iter().all(|row| row["destinations"]["country"].is_string()));
    assert_eq!(body["pagination"]["total"], 2);
}

#[actix_web::test]
async fn types_are_sorted_by_name() {
    let (state, _backend) = memory_state();
    let app = activities_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/activities/types").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let names: Vec<&str> = body
        .as_array()
        .expect("types array")
        .iter()
        .filter_map(|row| row["name"].as_str())
        .collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(names.first().copied(), Some("Adventure"));
}

#[actix_web::test]
async fn create_requires_fields_then_applies_defaults() {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let destination = seeded_destination(&state).await;
    let type_id = state
        .activities
        .types()
        .await
        .expect("types")
        .first()
        .map(|kind| kind.id)
        .expect("seeded type");
    let app = activities_app!(state);

    let missing = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/activities")
            .insert_header(bearer(&token))
            .set_json(json!({ "destination_id": destination.id, "name": "Cooking class" }))
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(missing).await;
    assert_eq!(
        error_message(&body),
        Some("Missing required fields: destination_id, type_id, name, and location are required")
    );

    let created = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/activities")
            .insert_header(bearer(&token))
            .set_json(json!({
                "destination_id": destination.id,
                "type_id": type_id,
                "name": "Cooking class",
                "location": "Market hall",
                "price": "25",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(created).await;
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["is_public"], true);
    assert_eq!(body["image_urls"], json!([]));
    assert_eq!(body["price"], 25.0);
}

#[rstest]
#[case(json!({}))]
#[case(json!({ "rating": 0 }))]
#[case(json!({ "rating": 5.5 }))]
#[case(json!({ "rating": "great" }))]
#[actix_web::test]
async fn ratings_must_lie_between_one_and_five(#[case] payload: Value) {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let id = seeded_activity_id(&state).await;
    let app = activities_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/activities/{id}/rate"))
            .insert_header(bearer(&token))
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(error_message(&body), Some(INVALID_RATING));
}

#[actix_web::test]
async fn rating_unknown_activity_is_not_found() {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let app = activities_app!(state);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/activities/{}/rate", Uuid::new_v4()))
            .insert_header(bearer(&token))
            .set_json(json!({ "rating": 4 }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(error_message(&body), Some("Activity not found"));
}

#[actix_web::test]
async fn rating_upserts_and_recomputes_the_average() {
    let (state, _backend) = memory_state();
    let traveller = demo_token(&state).await;
    let moderator = sign_in(&state, MODERATOR_EMAIL, MODERATOR_PASSWORD).await;
    let id = seeded_activity_id(&state).await;
    let app = activities_app!(state);
    let uri = format!("/api/activities/{id}/rate");

    for (token, rating) in [(&traveller, 3.0), (&moderator, 4.0), (&traveller, 5.0)] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&uri)
                .insert_header(bearer(token))
                .set_json(json!({ "rating": rating, "review": "" }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["rating"], rating);
        assert!(body["review"].is_null());
    }

    let detail = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/activities/{id}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(detail).await;
    assert_eq!(body["average_rating"], 4.5);
    assert_eq!(body["rating_count"], 2);
    assert_eq!(body["user_activities"].as_array().map(Vec::len), Some(2));
    assert!(body["destinations"]["name"].is_string());
}
