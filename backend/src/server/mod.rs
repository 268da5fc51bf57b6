//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use recipe_backend::Trace;
#[cfg(debug_assertions)]
use recipe_backend::doc::ApiDoc;
use recipe_backend::inbound::http::error::route_not_found;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::inbound::http::routes::configure;
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::memory::MemoryStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => HttpState::with_pool(pool),
        None => {
            info!("no database configured; serving from the in-memory store");
            HttpState::in_memory(Arc::new(MemoryStore::new()))
        }
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(route_not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_http_state(&config));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
