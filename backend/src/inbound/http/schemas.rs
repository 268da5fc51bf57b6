//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the structure of their corresponding domain
//! types but live in the inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The bearer token is missing, unknown or belongs to an inactive account.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The resource does not exist or is owned by another account.
    #[schema(rename = "not_found")]
    NotFound,
    /// The path exists but does not support the request method.
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    /// A backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
///
/// API error response payload with machine-readable code and human-readable
/// message. Validation failures name the offending field in `details`.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "password must be at least 5 characters")]
    message: String,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, e.g. `{"field": "password", "code": "min_length"}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        let name = ErrorCodeSchema::name();
        // utoipa replaces :: with . in schema names
        assert_eq!(name, "crate.domain.ErrorCode");
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("message"));
        assert!(
            schema_json.contains("traceId"),
            "schema should use the camelCase trace id"
        );
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "not_found",
            "method_not_allowed",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
        assert!(!schema_json.contains("forbidden"));
    }
}
