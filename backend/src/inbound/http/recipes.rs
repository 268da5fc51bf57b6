//! Recipe API handlers.
//!
//! ```text
//! GET    /recipe/recipes/
//! POST   /recipe/recipes/      {"title":"Curry","time_minute":30,"price":"5.50","tags":[{"name":"Thai"}]}
//! GET    /recipe/recipes/{id}/
//! PUT    /recipe/recipes/{id}/
//! PATCH  /recipe/recipes/{id}/ {"title":"New title"}
//! DELETE /recipe/recipes/{id}/
//! ```
//!
//! Every query is scoped to the authenticated caller. Owner fields and
//! unknown keys in the payload are ignored.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::domain::ports::{RecipePatch, RecipeReplacement, RecipeWrite};
use crate::domain::{
    Error, Price, Recipe, RecipeFields, RecipeFieldsPatch, RecipeId, RecipeLink, RecipeTitle,
    TagName, TimeMinutes,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::tags::TagResponse;
use crate::inbound::http::validation::{
    FieldName, PRICE, nested_tag_error, parse_price, recipe_error, require,
};

const TITLE: FieldName = FieldName::new("title");
const TIME_MINUTE: FieldName = FieldName::new("time_minute");

/// Tag reference inside a recipe payload, matched by name.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TagInput {
    #[serde(default)]
    pub name: String,
}

/// Recipe payload for create, PUT and PATCH.
///
/// `price` accepts a decimal string or a JSON number.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub time_minute: Option<i32>,
    #[schema(value_type = Option<String>, example = "5.50")]
    pub price: Option<serde_json::Value>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<TagInput>>,
}

/// Reduced representation used by the list endpoint.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub time_minute: i32,
    #[schema(example = "5.50")]
    pub price: String,
    pub link: String,
    pub tags: Vec<TagResponse>,
}

/// Full representation returned by every other recipe endpoint.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeDetail {
    pub id: i64,
    pub title: String,
    pub time_minute: i32,
    #[schema(example = "5.50")]
    pub price: String,
    pub link: String,
    pub tags: Vec<TagResponse>,
    pub description: String,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.get(),
            title: recipe.fields.title.as_ref().to_owned(),
            time_minute: recipe.fields.time_minutes.get(),
            price: recipe.fields.price.get().to_string(),
            link: recipe.fields.link.as_ref().to_owned(),
            tags: recipe.tags.iter().map(TagResponse::from).collect(),
        }
    }
}

impl From<&Recipe> for RecipeDetail {
    fn from(recipe: &Recipe) -> Self {
        let RecipeSummary {
            id,
            title,
            time_minute,
            price,
            link,
            tags,
        } = RecipeSummary::from(recipe);
        Self {
            id,
            title,
            time_minute,
            price,
            link,
            tags,
            description: recipe.fields.description.clone(),
        }
    }
}

fn parse_title(raw: String) -> Result<RecipeTitle, Error> {
    RecipeTitle::new(raw).map_err(|err| recipe_error(&err))
}

fn parse_time(raw: i32) -> Result<TimeMinutes, Error> {
    TimeMinutes::new(raw).map_err(|err| recipe_error(&err))
}

fn parse_price_field(raw: &serde_json::Value) -> Result<Price, Error> {
    Price::new(parse_price(raw)?).map_err(|err| recipe_error(&err))
}

fn parse_link(raw: String) -> Result<RecipeLink, Error> {
    RecipeLink::new(raw).map_err(|err| recipe_error(&err))
}

fn parse_tags(raw: Option<Vec<TagInput>>) -> Result<Option<Vec<TagName>>, Error> {
    raw.map(|tags| {
        tags.into_iter()
            .enumerate()
            .map(|(index, tag)| {
                TagName::new(&tag.name).map_err(|err| nested_tag_error(index, &err))
            })
            .collect()
    })
    .transpose()
}

impl TryFrom<RecipeRequest> for RecipeWrite {
    type Error = Error;

    fn try_from(payload: RecipeRequest) -> Result<Self, Self::Error> {
        let fields = RecipeFields {
            title: parse_title(require(payload.title, TITLE)?)?,
            time_minutes: parse_time(require(payload.time_minute, TIME_MINUTE)?)?,
            price: parse_price_field(&require(payload.price, PRICE)?)?,
            link: parse_link(payload.link.unwrap_or_default())?,
            description: payload.description.unwrap_or_default(),
        };
        Ok(Self {
            fields,
            tags: parse_tags(payload.tags)?,
        })
    }
}

impl TryFrom<RecipeRequest> for RecipeReplacement {
    type Error = Error;

    fn try_from(payload: RecipeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: parse_title(require(payload.title, TITLE)?)?,
            time_minutes: parse_time(require(payload.time_minute, TIME_MINUTE)?)?,
            price: parse_price_field(&require(payload.price, PRICE)?)?,
            link: payload.link.map(parse_link).transpose()?,
            description: payload.description,
            tags: parse_tags(payload.tags)?,
        })
    }
}

impl TryFrom<RecipeRequest> for RecipePatch {
    type Error = Error;

    fn try_from(payload: RecipeRequest) -> Result<Self, Self::Error> {
        let fields = RecipeFieldsPatch {
            title: payload.title.map(parse_title).transpose()?,
            time_minutes: payload.time_minute.map(parse_time).transpose()?,
            price: payload.price.as_ref().map(parse_price_field).transpose()?,
            link: payload.link.map(parse_link).transpose()?,
            description: payload.description,
        };
        Ok(Self {
            fields,
            tags: parse_tags(payload.tags)?,
        })
    }
}

/// List the caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/recipe/recipes/",
    responses(
        (status = 200, description = "Caller's recipes", body = [RecipeSummary]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "listRecipes"
)]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<RecipeSummary>>> {
    let recipes = state.recipes_query.list(caller.account_id()).await?;
    Ok(web::Json(recipes.iter().map(RecipeSummary::from).collect()))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/recipe/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeDetail),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "createRecipe"
)]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let write = RecipeWrite::try_from(payload.into_inner())?;
    let recipe = state.recipes.create(caller.account_id(), write).await?;
    Ok(HttpResponse::Created().json(RecipeDetail::from(&recipe)))
}

#[utoipa::path(
    get,
    path = "/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetail),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "retrieveRecipe"
)]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetail>> {
    let id = RecipeId::new(path.into_inner());
    let recipe = state.recipes_query.get(caller.account_id(), id).await?;
    Ok(web::Json(RecipeDetail::from(&recipe)))
}

/// Replace the recipe.
///
/// `title`, `time_minute` and `price` are required. `link`, `description`
/// and `tags` are optional, and any of them left out keeps its stored value.
/// Send `""` or `[]` to clear one.
#[utoipa::path(
    put,
    path = "/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetail),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "updateRecipe"
)]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeDetail>> {
    let id = RecipeId::new(path.into_inner());
    let replacement = RecipeReplacement::try_from(payload.into_inner())?;
    let recipe = state.recipes.replace(caller.account_id(), id, replacement).await?;
    Ok(web::Json(RecipeDetail::from(&recipe)))
}

#[utoipa::path(
    patch,
    path = "/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetail),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "partialUpdateRecipe"
)]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeDetail>> {
    let id = RecipeId::new(path.into_inner());
    let patch = RecipePatch::try_from(payload.into_inner())?;
    let recipe = state.recipes.patch(caller.account_id(), id, patch).await?;
    Ok(web::Json(RecipeDetail::from(&recipe)))
}

#[utoipa::path(
    delete,
    path = "/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipe"],
    operation_id = "destroyRecipe"
)]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = RecipeId::new(path.into_inner());
    state.recipes.delete(caller.account_id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, Tag, TagId};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    #[fixture]
    fn payload() -> Value {
        json!({
            "title": "Sample recipe",
            "time_minute": 22,
            "price": "5.25",
            "link": "http://example.com/recipe.pdf",
            "description": "Sample description",
            "user": 99,
            "tags": [{"name": "Thai"}, {"name": "Dinner"}]
        })
    }

    fn request(value: Value) -> RecipeRequest {
        serde_json::from_value(value).expect("recipe payload")
    }

    #[rstest]
    fn full_payload_becomes_a_write(payload: Value) {
        let write = RecipeWrite::try_from(request(payload)).expect("valid payload");
        assert_eq!(write.fields.title.as_ref(), "Sample recipe");
        assert_eq!(write.fields.price.get().to_string(), "5.25");
        let names: Vec<&str> = write
            .tags
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(AsRef::as_ref)
            .collect();
        assert_eq!(names, vec!["Thai", "Dinner"]);
    }

    #[rstest]
    #[case("title")]
    #[case("time_minute")]
    #[case("price")]
    fn writes_require_core_fields(payload: Value, #[case] missing: &str) {
        let mut value = payload;
        value.as_object_mut().expect("object").remove(missing);
        let error = RecipeWrite::try_from(request(value)).expect_err("missing field");
        let details = error.details().expect("details");
        assert_eq!(details["field"], missing);
        assert_eq!(details["code"], "required");
    }

    #[rstest]
    fn optional_text_defaults_to_blank(payload: Value) {
        let mut value = payload;
        let object = value.as_object_mut().expect("object");
        object.remove("link");
        object.remove("description");
        object.remove("tags");
        let write = RecipeWrite::try_from(request(value)).expect("valid payload");
        assert_eq!(write.fields.link.as_ref(), "");
        assert_eq!(write.fields.description, "");
        assert!(write.tags.is_none());
    }

    #[rstest]
    fn replacement_leaves_omitted_optionals_unset(payload: Value) {
        let mut value = payload;
        let object = value.as_object_mut().expect("object");
        object.remove("link");
        object.remove("tags");
        let replacement = RecipeReplacement::try_from(request(value)).expect("valid payload");
        assert_eq!(replacement.title.as_ref(), "Sample recipe");
        assert!(replacement.link.is_none());
        assert!(replacement.tags.is_none());
        assert_eq!(replacement.description.as_deref(), Some("Sample description"));
    }

    #[rstest]
    fn replacement_requires_core_fields(payload: Value) {
        let mut value = payload;
        value.as_object_mut().expect("object").remove("price");
        let error = RecipeReplacement::try_from(request(value)).expect_err("missing price");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "price");
        assert_eq!(details["code"], "required");
    }

    #[rstest]
    #[case(json!({"price": "5.555"}), "price", "decimal_places")]
    #[case(json!({"price": "-1.00"}), "price", "min_value")]
    #[case(json!({"time_minute": -3}), "time_minute", "min_value")]
    #[case(json!({"title": "   "}), "title", "blank")]
    fn patch_fields_are_validated(
        #[case] value: Value,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = RecipePatch::try_from(request(value)).expect_err("invalid patch");
        let details = error.details().expect("details");
        assert_eq!(details["field"], field);
        assert_eq!(details["code"], code);
    }

    #[rstest]
    fn blank_nested_tag_reports_its_index() {
        let error = RecipePatch::try_from(request(json!({"tags": [{"name": "ok"}, {"name": ""}]})))
            .expect_err("blank tag");
        let details = error.details().expect("details");
        assert_eq!(details["field"], "tags");
        assert_eq!(details["index"], 1);
    }

    #[rstest]
    fn patch_without_tags_keeps_them() {
        let patch = RecipePatch::try_from(request(json!({"title": "New"}))).expect("valid patch");
        assert!(patch.tags.is_none());
        assert!(patch.fields.price.is_none());
    }

    #[rstest]
    fn list_representation_omits_description(payload: Value) {
        let write = RecipeWrite::try_from(request(payload)).expect("valid payload");
        let owner = AccountId::new(1);
        let recipe = Recipe {
            id: RecipeId::new(3),
            owner,
            fields: write.fields,
            tags: vec![Tag {
                id: TagId::new(8),
                owner,
                name: TagName::new("Thai").expect("tag"),
            }],
        };

        let summary = serde_json::to_value(RecipeSummary::from(&recipe)).expect("json");
        assert!(summary.get("description").is_none());
        assert!(summary.get("user").is_none());
        assert_eq!(summary["price"], "5.25");
        assert_eq!(summary["tags"], json!([{"id": 8, "name": "Thai"}]));

        let detail = serde_json::to_value(RecipeDetail::from(&recipe)).expect("json");
        assert_eq!(detail["description"], "Sample description");
        assert_eq!(detail["time_minute"], 22);
    }
}
