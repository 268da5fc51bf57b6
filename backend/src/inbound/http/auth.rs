//! Bearer token authentication for HTTP handlers.
//!
//! Keep the HTTP modules focused on request/response mapping by concentrating
//! header parsing and caller identity derivation here. Handlers declare an
//! [`Authenticated`] argument and receive the caller's [`AccountId`].

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::ports::INVALID_TOKEN;
use crate::domain::{AccountId, AuthToken, Error};

use super::state::HttpState;

/// Accepted `Authorization` schemes, compared case-insensitively.
const SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// Extract the presented token from `Authorization: Token <key>`.
///
/// Returns `None` when the header is absent, not ASCII, uses another scheme
/// or carries an empty key.
pub(crate) fn presented_token(headers: &HeaderMap) -> Option<AuthToken> {
    let raw = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, key) = raw.trim().split_once(' ')?;
    if !SCHEMES
        .iter()
        .any(|accepted| accepted.eq_ignore_ascii_case(scheme))
    {
        return None;
    }
    let key = key.trim();
    if key.is_empty() || key.contains(' ') {
        return None;
    }
    Some(AuthToken::from_presented(key))
}

/// Caller identity resolved from the bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(AccountId);

impl Authenticated {
    pub fn account_id(self) -> AccountId {
        self.0
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = presented_token(req.headers());
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let Some(token) = token else {
                debug!("request without usable authorization header");
                return Err(Error::unauthorized(INVALID_TOKEN).into());
            };
            let state = state
                .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            let account_id = state.tokens.authenticate(&token).await?;
            Ok(Self(account_id))
        })
    }
}
