//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler from the inbound layer, the request and
//! response DTOs, and the wrapper schemas for domain errors. The document backs
//! Swagger UI in debug builds and is exported by the `openapi-dump` binary.

use crate::inbound::http::recipes::{RecipeDetail, RecipeRequest, RecipeSummary, TagInput};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tags::{TagRequest, TagResponse};
use crate::inbound::http::users::{AccountRequest, AccountResponse, TokenRequest, TokenResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme in the generated document.
pub const TOKEN_SCHEME: &str = "Token";

/// Adds the `Authorization: Token <key>` scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token <key> issued by POST /user/token/",
            ))),
        );
    }
}

/// OpenAPI document for the recipe API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe API",
        description = "Accounts, token authentication, and owner-scoped recipes and tags.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("Token" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::tags::list_tags,
        crate::inbound::http::tags::replace_tag,
        crate::inbound::http::tags::patch_tag,
        crate::inbound::http::tags::delete_tag,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        AccountRequest,
        AccountResponse,
        TokenRequest,
        TokenResponse,
        RecipeRequest,
        RecipeSummary,
        RecipeDetail,
        TagInput,
        TagRequest,
        TagResponse,
    )),
    tags(
        (name = "user", description = "Account creation, tokens and the caller's profile"),
        (name = "recipe", description = "Recipes and tags owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
