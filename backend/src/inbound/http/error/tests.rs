//! Tests for HTTP error mapping.

use std::collections::HashMap;

use super::*;
use crate::domain::Error;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use actix_web::{App, ResponseError, test as actix_test};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use uuid::Uuid;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn decode_response(error: Error, expected_trace_id: Option<&str>) -> Value {
    let response = ResponseError::error_response(&error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace id is ASCII").to_owned());
    assert_eq!(header.as_deref(), expected_trace_id);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON decodes")
}

#[rstest]
#[actix_web::test]
async fn internal_messages_reach_the_client(expected_trace_id: String) {
    let error = Error::internal("Failed to fetch trips").with_trace_id(expected_trace_id.clone());

    let body = decode_response(error, Some(expected_trace_id.as_str())).await;
    assert_eq!(body["error"], "Failed to fetch trips");
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["traceId"], TRACE_ID);
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let error = Error::invalid_request("bad").with_details(json!({"field": "name"}));

    let body = decode_response(error, None).await;
    assert_eq!(body["error"], "bad");
    assert!(body.get("traceId").is_none());
    assert_eq!(body["details"], json!({"field": "name"}));
}

#[rstest]
fn from_actix_error_is_generic_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

async fn echo_body(_body: web::Json<Value>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn echo_path(_id: web::Path<Uuid>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn echo_query(_query: web::Query<HashMap<String, u32>>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[rstest]
#[case(actix_test::TestRequest::post().uri("/body").insert_header(("content-type", "application/json")).set_payload("{"), "invalid_json")]
#[case(actix_test::TestRequest::get().uri("/items/not-a-uuid"), "invalid_path")]
#[case(actix_test::TestRequest::get().uri("/query?limit=lots"), "invalid_query")]
#[actix_web::test]
async fn extractor_failures_use_the_error_envelope(
    #[case] request: actix_test::TestRequest,
    #[case] detail_code: &str,
) {
    let app = actix_test::init_service(
        App::new()
            .app_data(json_config())
            .app_data(path_config())
            .app_data(query_config())
            .route("/body", web::post().to(echo_body))
            .route("/items/{id}", web::get().to(echo_path))
            .route("/query", web::get().to(echo_query))
            .default_service(web::to(not_found)),
    )
    .await;

    let response = actix_test::call_service(&app, request.to_request()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], detail_code);
}

#[actix_web::test]
async fn unknown_routes_return_not_found_envelope() {
    let app =
        actix_test::init_service(App::new().default_service(web::to(not_found))).await;

    let request = actix_test::TestRequest::get().uri("/nowhere").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["error"], "Not Found");
}
