//! Tests for booking handlers.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::NaiveDate;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::TripDraft;
use crate::inbound::http::test_utils::{
    bearer, caller_for, demo_token, error_message, memory_state, seeded_destination, sign_in,
    test_app,
};
use crate::outbound::memory::{MODERATOR_EMAIL, MODERATOR_PASSWORD};

macro_rules! bookings_app {
    ($state:expr) => {
        test::init_service(test_app($state).service(web::scope("/api").service(scope()))).await
    };
}

struct Fixture {
    token: String,
    trip_id: Uuid,
    type_id: Uuid,
}

async fn fixture(state: &HttpState) -> Fixture {
    let token = demo_token(state).await;
    let caller = caller_for(state, &token).await;
    let destination = seeded_destination(state).await;
    let day = |d| {
        NaiveDate::from_ymd_opt(2026, 7, d)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .expect("valid day")
    };
    let trip = state
        .trips
        .create(
            &caller,
            TripDraft {
                destination_id: destination.id,
                start_date: day(1),
                end_date: day(9),
                budget: None,
                notes: None,
                is_public: None,
            },
        )
        .await
        .expect("trip created");
    let type_id = state
        .bookings
        .types(&caller)
        .await
        .expect("types")
        .first()
        .map(|kind| kind.id)
        .expect("seeded type");
    Fixture {
        token,
        trip_id: trip.id,
        type_id,
    }
}

async fn create<S>(app: &S, token: &str, payload: Value) -> actix_web::dev::ServiceResponse
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/bookings")
            .insert_header(bearer(token))
            .set_json(payload)
            .to_request(),
    )
    .await
}

#[actix_web::test]
async fn every_route_requires_authentication() {
    let (state, _backend) = memory_state();
    let app = bookings_app!(state);

    for uri in ["/api/bookings", "/api/bookings/types"] {
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}

#[rstest]
#[case(json!({ "type_id": "x", "booking_date": "2026-05-01", "amount": 10 }))]
#[case(json!({ "trip_id": "x", "type_id": "x", "booking_date": "2026-05-01" }))]
#[case(json!({ "trip_id": "x", "type_id": "x", "booking_date": "2026-05-01", "amount": null }))]
#[actix_web::test]
async fn create_requires_core_fields(#[case] payload: Value) {
    let (state, _backend) = memory_state();
    let token = demo_token(&state).await;
    let app = bookings_app!(state);

    let res = create(&app, &token, payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        error_message(&body),
        Some("Missing required fields: trip_id, type_id, booking_date, and amount are required")
    );
}

#[actix_web::test]
async fn zero_amount_is_accepted_with_defaults() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let app = bookings_app!(state);

    let res = create(
        &app,
        &fx.token,
        json!({
            "trip_id": fx.trip_id,
            "type_id": fx.type_id,
            "booking_date": "2026-05-01",
            "amount": 0,
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["amount"], 0.0);
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["booking_date"], "2026-05-01T00:00:00Z");
}

#[actix_web::test]
async fn booking_against_a_foreign_trip_is_refused() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let moderator = sign_in(&state, MODERATOR_EMAIL, MODERATOR_PASSWORD).await;
    let app = bookings_app!(state);

    let res = create(
        &app,
        &moderator,
        json!({
            "trip_id": fx.trip_id,
            "type_id": fx.type_id,
            "booking_date": "2026-05-01",
            "amount": 90,
        }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(error_message(&body), Some("Trip not found or access denied"));
}

#[actix_web::test]
async fn listing_filters_by_status_and_embeds_relations() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let app = bookings_app!(state);

    for (status, date) in [("pending", "2026-05-01"), ("confirmed", "2026-05-03")] {
        let res = create(
            &app,
            &fx.token,
            json!({
                "trip_id": fx.trip_id,
                "type_id": fx.type_id,
                "booking_date": date,
                "amount": "120.00",
                "status": status,
            }),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/bookings?status=pending")
            .insert_header(bearer(&fx.token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let rows = body["data"].as_array().expect("data array");
    assert_eq!(rows.len(), 1);
    let row = rows.first().expect("one booking");
    assert_eq!(row["status"], "pending");
    assert!(row["booking_types"]["name"].is_string());
    assert!(row["trips"]["destinations"]["name"].is_string());
    assert_eq!(body["pagination"]["total"], 1);
}

#[actix_web::test]
async fn update_clears_nullable_fields_and_keeps_the_rest() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let app = bookings_app!(state);

    let created = create(
        &app,
        &fx.token,
        json!({
            "trip_id": fx.trip_id,
            "type_id": fx.type_id,
            "booking_date": "2026-05-01",
            "amount": 240,
            "notes": "window seat",
            "provider_name": "Iberia",
        }),
    )
    .await;
    let body: Value = test::read_body_json(created).await;
    let id = body["id"].as_str().expect("id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/bookings/{id}"))
            .insert_header(bearer(&fx.token))
            .set_json(json!({ "notes": null, "status": "", "amount": "260" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert!(body["notes"].is_null());
    assert_eq!(body["provider_name"], "Iberia");
    assert_eq!(body["status"], "confirmed");
    assert_eq!(body["amount"], 260.0);
    assert!(body["updated_at"].is_string());
}

#[actix_web::test]
async fn blank_text_clears_nullable_fields() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let app = bookings_app!(state);

    let created = create(
        &app,
        &fx.token,
        json!({
            "trip_id": fx.trip_id,
            "type_id": fx.type_id,
            "booking_date": "2026-05-01",
            "amount": 90,
            "notes": "x",
            "provider_name": "Renfe",
            "booking_reference": "RF-22",
        }),
    )
    .await;
    let body: Value = test::read_body_json(created).await;
    let id = body["id"].as_str().expect("id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/bookings/{id}"))
            .insert_header(bearer(&fx.token))
            .set_json(json!({ "notes": "", "provider_name": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert!(body["notes"].is_null());
    assert!(body["provider_name"].is_null());
    assert_eq!(body["booking_reference"], "RF-22");
}

#[actix_web::test]
async fn listing_honours_limits_above_one_hundred() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let app = bookings_app!(state);

    let created = create(
        &app,
        &fx.token,
        json!({
            "trip_id": fx.trip_id,
            "type_id": fx.type_id,
            "booking_date": "2026-05-01",
            "amount": 30,
        }),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/bookings?limit=150")
            .insert_header(bearer(&fx.token))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["pagination"]["limit"], 150);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn non_owner_cannot_read_or_delete() {
    let (state, _backend) = memory_state();
    let fx = fixture(&state).await;
    let moderator = sign_in(&state, MODERATOR_EMAIL, MODERATOR_PASSWORD).await;
    let app = bookings_app!(state);

    let created = create(
        &app,
        &fx.token,
        json!({
            "trip_id": fx.trip_id,
            "type_id": fx.type_id,
            "booking_date": "2026-05-01",
            "amount": 55,
        }),
    )
    .await;
    let body: Value = test::read_body_json(created).await;
    let uri = format!("/api/bookings/{}", body["id"].as_str().expect("id"));

    let read = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&moderator))
            .to_request(),
    )
    .await;
    assert_eq!(read.status(), StatusCode::NOT_FOUND);

    let delete = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&moderator))
            .to_request(),
    )
    .await;
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(delete).await;
    assert_eq!(error_message(&body), Some("Booking not found or access denied"));

    let owner_delete = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&fx.token))
            .to_request(),
    )
    .await;
    assert_eq!(owner_delete.status(), StatusCode::OK);
    let body: Value = test::read_body_json(owner_delete).await;
    assert_eq!(body["message"], "Booking deleted successfully");
}
