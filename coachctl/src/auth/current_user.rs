//! Request credentials and the identity the auth gate attaches to a request.
//!
//! The gate in [`middleware`](super::middleware) stores a [`Principal`] in the request
//! extensions. Handlers never read credentials themselves; they extract [`CurrentUser`] or
//! [`Principal`] from what the gate left behind.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::trace;

use crate::{
    api::models::users::CurrentUser,
    auth::session::SESSION_COOKIE_NAME,
    errors::{Error, Result},
};

/// Who the gate let through.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    /// A user holding a verified session token
    User(CurrentUser),
    /// A caller holding the static administrative token
    Service,
}

/// Value of the session cookie, if the request carries one
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE_NAME)
        .map(|(_, value)| value)
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// The session token of a request: the cookie wins over the bearer header.
pub fn session_token(headers: &HeaderMap) -> Result<&str> {
    let token = match session_cookie(headers) {
        Some(token) => {
            trace!("using session cookie");
            token
        }
        None => bearer_token(headers).ok_or_else(|| Error::Unauthenticated {
            message: Some("Missing or invalid token".to_string()),
        })?,
    };

    if token.is_empty() {
        return Err(Error::Unauthenticated {
            message: Some("Missing token".to_string()),
        });
    }
    Ok(token)
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or(Error::Unauthenticated { message: None })
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self> {
        match Principal::from_request_parts(parts, state).await? {
            Principal::User(user) => Ok(user),
            Principal::Service => Err(Error::Unauthenticated {
                message: Some("User session required".to_string()),
            }),
        }
    }
}
