//! Account API handlers.
//!
//! ```text
//! POST  /user/create/ {"email":"a@example.com","password":"testpass123","name":"Ada"}
//! POST  /user/token/  {"email":"a@example.com","password":"testpass123"}
//! GET   /user/me/
//! PATCH /user/me/     {"name":"New name"}
//! ```

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{INVALID_CREDENTIALS, ProfileUpdate, SignupRequest};
use crate::domain::{Account, AccountName, Email, Error, PlainPassword, TokenCredentials};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    EMAIL, FieldName, NAME, PASSWORD, account_error, password_error, read_only_field_error,
    require,
};

const ID: FieldName = FieldName::new("id");

/// Account payload for signup and profile updates.
///
/// `password` is write-only and `id` is read-only; sending an `id` is a
/// validation error.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    #[schema(value_type = Option<i64>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
}

/// Public account representation. Never carries the password.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    #[schema(example = "test@example.com")]
    pub email: String,
    #[schema(example = "Test Name")]
    pub name: String,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            email: account.email().as_ref().to_owned(),
            name: account.name().as_ref().to_owned(),
        }
    }
}

/// Credentials exchanged for a token.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    /// Forty hexadecimal characters; present as `Authorization: Token <key>`.
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

fn reject_id(payload: &AccountRequest) -> Result<(), Error> {
    match payload.id {
        Some(_) => Err(read_only_field_error(ID)),
        None => Ok(()),
    }
}

fn parse_email(raw: &str) -> Result<Email, Error> {
    Email::parse_strict(raw).map_err(|err| account_error(EMAIL, &err))
}

fn parse_name(raw: String) -> Result<AccountName, Error> {
    AccountName::non_blank(raw).map_err(|err| account_error(NAME, &err))
}

fn parse_password(raw: String) -> Result<PlainPassword, Error> {
    PlainPassword::chosen(raw).map_err(|err| password_error(&err))
}

impl TryFrom<AccountRequest> for SignupRequest {
    type Error = Error;

    fn try_from(payload: AccountRequest) -> Result<Self, Self::Error> {
        reject_id(&payload)?;
        let email = parse_email(&require(payload.email, EMAIL)?)?;
        let name = parse_name(require(payload.name, NAME)?)?;
        let password = parse_password(require(payload.password, PASSWORD)?)?;
        Ok(Self {
            email,
            name,
            password,
        })
    }
}

impl TryFrom<AccountRequest> for ProfileUpdate {
    type Error = Error;

    fn try_from(payload: AccountRequest) -> Result<Self, Self::Error> {
        reject_id(&payload)?;
        Ok(Self {
            email: payload.email.as_deref().map(parse_email).transpose()?,
            name: payload.name.map(parse_name).transpose()?,
            password: payload.password.map(parse_password).transpose()?,
        })
    }
}

impl TryFrom<TokenRequest> for TokenCredentials {
    type Error = Error;

    fn try_from(payload: TokenRequest) -> Result<Self, Self::Error> {
        let email = require(payload.email, EMAIL)?;
        let password = require(payload.password, PASSWORD)?;
        Self::try_from_parts(&email, &password).map_err(|err| {
            debug!(reason = %err, "rejected token request shape");
            Error::invalid_request(INVALID_CREDENTIALS)
        })
    }
}

/// Create a regular account.
#[utoipa::path(
    post,
    path = "/user/create/",
    request_body = AccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 405, description = "Method not allowed", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "createUser",
    security([])
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<AccountRequest>,
) -> ApiResult<HttpResponse> {
    let request = SignupRequest::try_from(payload.into_inner())?;
    let account = state.accounts.register(request).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(&account)))
}

/// Exchange credentials for a bearer token.
///
/// Every credential failure shares one message so callers cannot tell an
/// unknown email from a wrong password.
#[utoipa::path(
    post,
    path = "/user/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "createToken",
    security([])
)]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = TokenCredentials::try_from(payload.into_inner())?;
    let token = state.tokens.issue(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.expose().to_owned(),
    }))
}

/// Return the caller's own profile.
#[utoipa::path(
    get,
    path = "/user/me/",
    responses(
        (status = 200, description = "Caller profile", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "retrieveMe"
)]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<AccountResponse>> {
    let account = state.profiles.profile(caller.account_id()).await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

/// Partially update the caller's own profile.
#[utoipa::path(
    patch,
    path = "/user/me/",
    request_body = AccountRequest,
    responses(
        (status = 200, description = "Updated profile", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["user"],
    operation_id = "partialUpdateMe"
)]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<AccountRequest>,
) -> ApiResult<web::Json<AccountResponse>> {
    let update = ProfileUpdate::try_from(payload.into_inner())?;
    let account = state
        .accounts
        .update_profile(caller.account_id(), update)
        .await?;
    Ok(web::Json(AccountResponse::from(&account)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn signup(email: Option<&str>, password: Option<&str>, name: Option<&str>) -> AccountRequest {
        AccountRequest {
            email: email.map(str::to_owned),
            password: password.map(str::to_owned),
            name: name.map(str::to_owned),
            id: None,
        }
    }

    fn field_and_code(error: &Error) -> (String, String) {
        let details = error.details().expect("field details");
        (
            details["field"].as_str().unwrap_or_default().to_owned(),
            details["code"].as_str().unwrap_or_default().to_owned(),
        )
    }

    #[rstest]
    #[case(signup(None, Some("testpass123"), Some("Name")), "email", "required")]
    #[case(signup(Some(""), Some("testpass123"), Some("Name")), "email", "required")]
    #[case(signup(Some("nope"), Some("testpass123"), Some("Name")), "email", "invalid")]
    #[case(signup(Some("a@example.com"), Some("pw"), Some("Name")), "password", "min_length")]
    #[case(signup(Some("a@example.com"), Some("testpass123"), Some("  ")), "name", "blank")]
    #[case(signup(Some("a@example.com"), None, Some("Name")), "password", "required")]
    fn signup_payload_errors_name_the_field(
        #[case] payload: AccountRequest,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let error = SignupRequest::try_from(payload).expect_err("invalid payload");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(field_and_code(&error), (field.to_owned(), code.to_owned()));
    }

    #[rstest]
    fn signup_rejects_client_supplied_id() {
        let payload = AccountRequest {
            id: Some(serde_json::json!(7)),
            ..signup(Some("a@example.com"), Some("testpass123"), Some("Name"))
        };
        let error = SignupRequest::try_from(payload).expect_err("id is read-only");
        assert_eq!(field_and_code(&error), ("id".to_owned(), "read_only".to_owned()));
    }

    #[rstest]
    fn signup_normalises_the_email_domain() {
        let request =
            SignupRequest::try_from(signup(Some("Test2@Example.com"), Some("testpass123"), Some("N")))
                .expect("valid payload");
        assert_eq!(request.email.as_ref(), "Test2@example.com");
    }

    #[rstest]
    fn empty_profile_patch_changes_nothing() {
        let update = ProfileUpdate::try_from(AccountRequest::default()).expect("empty patch");
        assert_eq!(update, ProfileUpdate::default());
    }

    #[rstest]
    #[case(Some(""), Some("testpass123"))]
    #[case(Some("a@example.com"), Some(""))]
    fn blank_credentials_share_the_uniform_error(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
    ) {
        let error = TokenCredentials::try_from(TokenRequest {
            email: email.map(str::to_owned),
            password: password.map(str::to_owned),
        })
        .expect_err("blank credentials");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(error.message(), INVALID_CREDENTIALS);
    }
}
