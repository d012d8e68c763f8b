//! Tests for the error payload formatting and trace capture.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
fn invalid_request_constructor_sets_code() {
    let err = Error::invalid_request("bad");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_a_message_for_blank_input() {
    let err = Error::new(ErrorCode::NotFound, "  ");
    assert_eq!(err.message(), "Not Found");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values() {
    let result = Error::invalid_request("bad").try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_message_under_error_key(expected_trace_id: String) {
    let err = Error::not_found("Trip not found")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "id" }));

    let value = serde_json::to_value(&err).expect("error serialises");

    assert_eq!(
        value,
        json!({
            "code": "not_found",
            "error": "Trip not found",
            "traceId": expected_trace_id,
            "details": { "field": "id" }
        })
    );
}

#[rstest]
fn omits_optional_fields_when_absent() {
    let value = serde_json::to_value(Error::forbidden("nope")).expect("error serialises");
    assert!(value.get("traceId").is_none());
    assert!(value.get("details").is_none());
}

#[rstest]
#[tokio::test]
async fn deserialising_ignores_the_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({ "code": "forbidden", "error": "nope" });

    let decoded: Error = TraceId::scope(trace_id, async move {
        serde_json::from_value(payload).expect("payload decodes")
    })
    .await;

    assert!(decoded.trace_id().is_none());
}

#[rstest]
#[case(json!({ "code": "forbidden", "error": " " }))]
#[case(json!({ "code": "forbidden", "error": "nope", "traceId": "" }))]
fn deserialising_rejects_blank_fields(#[case] payload: serde_json::Value) {
    let result: Result<Error, _> = serde_json::from_value(payload);
    assert!(result.is_err());
}
