//! Route table for the HTTP adapter.
//!
//! ```text
//! POST                    /user/create/
//! POST                    /user/token/
//! GET PATCH               /user/me/
//! GET POST                /recipe/recipes/
//! GET PUT PATCH DELETE    /recipe/recipes/{id}/
//! GET                     /recipe/tags/
//! PUT PATCH DELETE        /recipe/tags/{id}/
//! GET                     /health/live, /health/ready
//! ```
//!
//! Each path is one resource whose default service answers 405, so an
//! unsupported method on a known path never falls through to 404. Protected
//! paths authenticate first: an anonymous caller gets 401 whatever the method.

use actix_web::{HttpRequest, HttpResponse, web};

use super::auth::Authenticated;
use super::error::{json_config, method_not_allowed, path_config};
use super::{health, recipes, tags, users};

async fn method_not_allowed_for_caller(_caller: Authenticated, req: HttpRequest) -> HttpResponse {
    method_not_allowed(req).await
}

fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(method_not_allowed))
}

fn protected(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(method_not_allowed_for_caller))
}

/// Register every endpoint plus the extractor configuration.
///
/// Handlers expect `web::Data<HttpState>` and `web::Data<HealthState>` to be
/// registered on the app.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::health::HealthState;
/// use recipe_backend::inbound::http::routes::configure;
/// use recipe_backend::inbound::http::state::HttpState;
/// use recipe_backend::outbound::memory::MemoryStore;
///
/// let state = HttpState::in_memory(Arc::new(MemoryStore::new()));
/// let _app = App::new()
///     .app_data(web::Data::new(state))
///     .app_data(web::Data::new(HealthState::new()))
///     .configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .service(resource("/user/create/").route(web::post().to(users::create_user)))
        .service(resource("/user/token/").route(web::post().to(users::create_token)))
        .service(
            protected("/user/me/")
                .route(web::get().to(users::current_user))
                .route(web::patch().to(users::update_current_user)),
        )
        .service(
            protected("/recipe/recipes/")
                .route(web::get().to(recipes::list_recipes))
                .route(web::post().to(recipes::create_recipe)),
        )
        .service(
            protected("/recipe/recipes/{id}/")
                .route(web::get().to(recipes::get_recipe))
                .route(web::put().to(recipes::replace_recipe))
                .route(web::patch().to(recipes::patch_recipe))
                .route(web::delete().to(recipes::delete_recipe)),
        )
        .service(protected("/recipe/tags/").route(web::get().to(tags::list_tags)))
        .service(
            protected("/recipe/tags/{id}/")
                .route(web::put().to(tags::replace_tag))
                .route(web::patch().to(tags::patch_tag))
                .route(web::delete().to(tags::delete_tag)),
        )
        .service(resource("/health/live").route(web::get().to(health::live)))
        .service(resource("/health/ready").route(web::get().to(health::ready)));
}

#[cfg(test)]
mod tests;
