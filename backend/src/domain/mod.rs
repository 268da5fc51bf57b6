//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services implementing the driving ports.
//! Keep types immutable where possible and document invariants in each
//! type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure envelope.
//! - Account, Email, AccountName: account identity.
//! - PlainPassword, PasswordHash: credential handling.
//! - Recipe, Tag and their field newtypes.
//! - AccountService, TokenService, RecipeService, TagService: driving port
//!   implementations generic over the repository ports.

pub mod account;
mod account_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod recipe;
mod recipe_service;
mod tag_service;
mod token_service;
pub mod trace_id;

pub use self::account::{
    ACCOUNT_FIELD_MAX, Account, AccountFlags, AccountId, AccountName, AccountValidationError,
    Email, NewAccount,
};
pub use self::account_service::AccountService;
pub use self::auth::{AuthToken, CredentialsValidationError, TokenCredentials, TokenDigest};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{MIN_PASSWORD_LENGTH, PasswordError, PasswordHash, PlainPassword};
pub use self::recipe::{
    Price, RECIPE_FIELD_MAX, Recipe, RecipeFields, RecipeFieldsPatch, RecipeId, RecipeLink,
    RecipeTitle, RecipeValidationError, Tag, TagId, TagName, TimeMinutes, sort_tags_for_listing,
};
pub use self::recipe_service::RecipeService;
pub use self::tag_service::TagService;
pub use self::token_service::TokenService;
pub use self::trace_id::TraceId;

/// Build an `invalid_request` error pointing at a single payload field.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{ErrorCode, field_error};
///
/// let err = field_error("email", "duplicate_email", "email already registered");
/// assert_eq!(err.code(), ErrorCode::InvalidRequest);
/// assert_eq!(err.details().unwrap()["field"], "email");
/// ```
pub fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(serde_json::json!({
        "field": field,
        "code": code,
    }))
}
