//! Route table behaviour: method handling, auth precedence and scoping.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::domain::ports::{
    INVALID_TOKEN, MockRecipeCommand, MockTagCommand, MockTagQuery, MockTokenIssuer,
};
use crate::domain::{AccountId, Error, Tag, TagId, TagName};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::test_utils::{routed_app, state_with_tokens};

const CALLER: i64 = 7;

#[fixture]
fn signed_in() -> MockTokenIssuer {
    let mut tokens = MockTokenIssuer::new();
    tokens.expect_authenticate().returning(|token| {
        if token.expose() == "good" {
            Ok(AccountId::new(CALLER))
        } else {
            Err(Error::unauthorized(INVALID_TOKEN))
        }
    });
    tokens
}

fn tag(id: i64, name: &str) -> Tag {
    Tag {
        id: TagId::new(id),
        owner: AccountId::new(CALLER),
        name: TagName::new(name).expect("tag name"),
    }
}

#[rstest]
#[case(test::TestRequest::put(), "/user/me/")]
#[case(test::TestRequest::post(), "/recipe/tags/")]
#[case(test::TestRequest::post(), "/recipe/tags/3/")]
#[case(test::TestRequest::get(), "/recipe/tags/3/")]
#[actix_web::test]
async fn unsupported_methods_are_405_for_callers(
    signed_in: MockTokenIssuer,
    #[case] request: test::TestRequest,
    #[case] uri: &str,
) {
    let app = test::init_service(routed_app(state_with_tokens(signed_in))).await;
    let response = test::call_service(
        &app,
        request
            .uri(uri)
            .insert_header((AUTHORIZATION, "Token good"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "method_not_allowed");
}

#[rstest]
#[case(test::TestRequest::post(), "/recipe/tags/")]
#[case(test::TestRequest::get(), "/recipe/recipes/")]
#[case(test::TestRequest::delete(), "/recipe/recipes/1/")]
#[case(test::TestRequest::get(), "/user/me/")]
#[actix_web::test]
async fn anonymous_callers_get_401_first(
    signed_in: MockTokenIssuer,
    #[case] request: test::TestRequest,
    #[case] uri: &str,
) {
    let app = test::init_service(routed_app(state_with_tokens(signed_in))).await;
    let response = test::call_service(&app, request.uri(uri).to_request()).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn public_endpoints_reject_other_methods() {
    let app = test::init_service(routed_app(state_with_tokens(MockTokenIssuer::new()))).await;
    let response =
        test::call_service(&app, test::TestRequest::get().uri("/user/token/").to_request()).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[rstest]
#[actix_web::test]
async fn non_numeric_ids_are_not_found(signed_in: MockTokenIssuer) {
    let mut recipes = MockRecipeCommand::new();
    recipes.expect_delete().never();
    let state = HttpState {
        recipes: Arc::new(recipes),
        ..state_with_tokens(signed_in)
    };
    let app = test::init_service(routed_app(state)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/recipe/recipes/abc/")
            .insert_header((AUTHORIZATION, "Token good"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn tag_list_is_scoped_to_the_caller(signed_in: MockTokenIssuer) {
    let mut tags_query = MockTagQuery::new();
    tags_query
        .expect_list()
        .withf(|owner| owner.get() == CALLER)
        .times(1)
        .returning(|_| Ok(vec![tag(2, "Dessert"), tag(1, "Vegan")]));
    let state = HttpState {
        tags_query: Arc::new(tags_query),
        ..state_with_tokens(signed_in)
    };
    let app = test::init_service(routed_app(state)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/recipe/tags/")
            .insert_header((AUTHORIZATION, "Token good"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(
        body,
        json!([{"id": 2, "name": "Dessert"}, {"id": 1, "name": "Vegan"}])
    );
}

#[rstest]
#[case(test::TestRequest::put(), json!({}), StatusCode::BAD_REQUEST)]
#[case(test::TestRequest::put(), json!({"name": "  "}), StatusCode::BAD_REQUEST)]
#[case(test::TestRequest::patch(), json!({}), StatusCode::OK)]
#[case(test::TestRequest::patch(), json!({"name": "Sweet"}), StatusCode::OK)]
#[actix_web::test]
async fn tag_updates_validate_the_name(
    signed_in: MockTokenIssuer,
    #[case] request: test::TestRequest,
    #[case] body: Value,
    #[case] expected: StatusCode,
) {
    let mut tags = MockTagCommand::new();
    tags.expect_update()
        .withf(|owner, id, _| owner.get() == CALLER && id.get() == 4)
        .returning(|_, id, name| {
            let name = name.map_or_else(|| "Dessert".to_owned(), |n| n.as_ref().to_owned());
            Ok(tag(id.get(), &name))
        });
    let state = HttpState {
        tags: Arc::new(tags),
        ..state_with_tokens(signed_in)
    };
    let app = test::init_service(routed_app(state)).await;

    let response = test::call_service(
        &app,
        request
            .uri("/recipe/tags/4/")
            .insert_header((AUTHORIZATION, "Token good"))
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn foreign_tag_delete_is_not_found(signed_in: MockTokenIssuer) {
    let mut tags = MockTagCommand::new();
    tags.expect_delete()
        .times(1)
        .returning(|_, _| Err(Error::not_found("tag not found")));
    let state = HttpState {
        tags: Arc::new(tags),
        ..state_with_tokens(signed_in)
    };
    let app = test::init_service(routed_app(state)).await;

    let response = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/recipe/tags/99/")
            .insert_header((AUTHORIZATION, "Token good"))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request(signed_in: MockTokenIssuer) {
    let app = test::init_service(routed_app(state_with_tokens(signed_in))).await;
    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/recipe/recipes/")
            .insert_header((AUTHORIZATION, "Token good"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"title\": ")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
}
