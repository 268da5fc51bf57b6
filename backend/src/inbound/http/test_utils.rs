//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::MockTokenIssuer;
use crate::inbound::http::health::HealthState;
use crate::inbound::http::routes::configure;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::MemoryStore;

/// In-memory state whose token issuer is replaced by `tokens`.
pub fn state_with_tokens(tokens: MockTokenIssuer) -> HttpState {
    HttpState {
        tokens: Arc::new(tokens),
        ..HttpState::in_memory(Arc::new(MemoryStore::new()))
    }
}

/// Full route table over `state`, with readiness already flagged.
pub fn routed_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    App::new()
        .app_data(web::Data::new(state))
        .app_data(health)
        .configure(configure)
}
