//! Tag API handlers.
//!
//! ```text
//! GET    /recipe/tags/
//! PUT    /recipe/tags/{id}/ {"name":"Dessert"}
//! PATCH  /recipe/tags/{id}/ {"name":"Dessert"}
//! DELETE /recipe/tags/{id}/
//! ```
//!
//! Tags are created through recipe payloads only.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Tag, TagId, TagName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{NAME, recipe_error, require};

/// Tag representation. The owner is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "Vegan")]
    pub name: String,
}

impl From<&Tag> for TagResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name.as_ref().to_owned(),
        }
    }
}

/// Tag update payload; `id` is read-only and ignored.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TagRequest {
    pub name: Option<String>,
}

fn parse_name(raw: String) -> Result<TagName, Error> {
    TagName::new(raw).map_err(|err| recipe_error(&err))
}

/// List the caller's tags ordered by name.
#[utoipa::path(
    get,
    path = "/recipe/tags/",
    responses(
        (status = 200, description = "Caller's tags", body = [TagResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 405, description = "Tags cannot be created directly", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listTags"
)]
pub async fn list_tags(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.tags_query.list(caller.account_id()).await?;
    Ok(web::Json(tags.iter().map(TagResponse::from).collect()))
}

/// Rename a tag; `name` is required.
#[utoipa::path(
    put,
    path = "/recipe/tags/{id}/",
    params(("id" = i64, Path, description = "Tag identifier")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Updated tag", body = TagResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "updateTag"
)]
pub async fn replace_tag(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<TagRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    let name = parse_name(require(payload.into_inner().name, NAME)?)?;
    let tag = state
        .tags
        .update(caller.account_id(), TagId::new(path.into_inner()), Some(name))
        .await?;
    Ok(web::Json(TagResponse::from(&tag)))
}

/// Rename a tag when `name` is present.
#[utoipa::path(
    patch,
    path = "/recipe/tags/{id}/",
    params(("id" = i64, Path, description = "Tag identifier")),
    request_body = TagRequest,
    responses(
        (status = 200, description = "Updated tag", body = TagResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "partialUpdateTag"
)]
pub async fn patch_tag(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<TagRequest>,
) -> ApiResult<web::Json<TagResponse>> {
    let name = payload.into_inner().name.map(parse_name).transpose()?;
    let tag = state
        .tags
        .update(caller.account_id(), TagId::new(path.into_inner()), name)
        .await?;
    Ok(web::Json(TagResponse::from(&tag)))
}

/// Delete a tag and detach it from the caller's recipes.
#[utoipa::path(
    delete,
    path = "/recipe/tags/{id}/",
    params(("id" = i64, Path, description = "Tag identifier")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "destroyTag"
)]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .tags
        .delete(caller.account_id(), TagId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
