//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Extractor failures (bad JSON, non-numeric path ids, unmatched
//! methods) are funnelled through the same envelope.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Challenge sent with every 401 so clients learn the expected scheme.
pub const AUTH_CHALLENGE: &str = "Token";

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        if matches!(self.code(), ErrorCode::Unauthorized) {
            builder.insert_header((WWW_AUTHENTICATE, AUTH_CHALLENGE));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// JSON extractor configuration producing `invalid_request` envelopes.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Path extractor configuration; a malformed id names no resource.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let error = match &err {
        JsonPayloadError::ContentType => {
            Error::invalid_request("request body must be application/json")
        }
        JsonPayloadError::Deserialize(inner) => Error::invalid_request("malformed JSON body")
            .with_details(json!({ "reason": inner.to_string() })),
        _ => Error::invalid_request("unreadable request body"),
    };
    error.into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected path parameters");
    Error::not_found("resource not found").into()
}

/// Default service for resources: the path matched but the method did not.
pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    Error::method_not_allowed(format!("method {} not allowed", req.method())).error_response()
}

/// App-level default service for paths no resource matches.
pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    Error::not_found(format!("no route for {}", req.path())).error_response()
}
