//! Tests for the error payload constructors and serde contract.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no auth"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::method_not_allowed("nope"), ErrorCode::MethodNotAllowed)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn convenience_constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
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
#[tokio::test]
async fn deserialising_clears_ambient_trace(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let payload = json!({"code": "invalid_request", "message": "bad"});

    let error = TraceId::scope(trace_id, async move {
        serde_json::from_value::<Error>(payload).expect("valid payload")
    })
    .await;

    assert!(error.trace_id().is_none());
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"field": "email"}));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "bad",
            "traceId": expected_trace_id,
            "details": {"field": "email"},
        })
    );

    let bare = serde_json::to_value(Error::not_found("missing")).expect("serialise error");
    assert_eq!(bare, json!({"code": "not_found", "message": "missing"}));
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({"code": "not_found", "message": " "}));
    assert!(result.is_err());
}
