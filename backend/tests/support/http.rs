//! Shared HTTP harness for the end-to-end API suites.
//!
//! Each test builds the full route table over a fresh in-memory store, wrapped
//! in the tracing middleware exactly as the server does.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use actix_web::http::{Method, StatusCode};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use recipe_backend::Trace;
use recipe_backend::domain::TRACE_ID_HEADER;
use recipe_backend::inbound::http::error::route_not_found;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::routes::configure;
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::memory::MemoryStore;
use serde_json::{Value, json};

/// Status, selected headers and decoded JSON body of one exchange.
#[derive(Debug)]
pub struct Snapshot {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    /// `WWW-Authenticate` value, sent with 401 responses.
    pub challenge: Option<String>,
    pub body: Value,
}

pub async fn init_app()
-> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let state = HttpState::in_memory(Arc::new(MemoryStore::new()));
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(health)
            .wrap(Trace)
            .configure(configure)
            .default_service(web::to(route_not_found)),
    )
    .await
}

/// Send a request, optionally authenticated and with a JSON body.
pub async fn send<S>(
    app: &S,
    method: Method,
    path: &str,
    token: Option<&str>,
    payload: Option<Value>,
) -> Snapshot
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let mut request = TestRequest::default().method(method).uri(path);
    if let Some(token) = token {
        request = request.insert_header((AUTHORIZATION, format!("Token {token}")));
    }
    if let Some(payload) = payload {
        request = request.set_json(payload);
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(ToOwned::to_owned)
    };
    let trace_id = header(TRACE_ID_HEADER);
    let challenge = header(WWW_AUTHENTICATE.as_str());
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    Snapshot {
        status,
        trace_id,
        challenge,
        body,
    }
}

/// Register an account and return its token.
pub async fn sign_up<S>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let created = send(
        app,
        Method::POST,
        "/user/create/",
        None,
        Some(json!({ "email": email, "password": password, "name": "Test Name" })),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.body);
    obtain_token(app, email, password)
        .await
        .body
        .get("token")
        .and_then(Value::as_str)
        .expect("token issued")
        .to_owned()
}

pub async fn obtain_token<S>(app: &S, email: &str, password: &str) -> Snapshot
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    send(
        app,
        Method::POST,
        "/user/token/",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// `details.field` and `details.code` of a validation error.
pub fn field_error(body: &Value) -> (Option<&str>, Option<&str>) {
    let details = body.get("details");
    (
        details.and_then(|d| d.get("field")).and_then(Value::as_str),
        details.and_then(|d| d.get("code")).and_then(Value::as_str),
    )
}
