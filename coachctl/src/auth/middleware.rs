//! The auth gate in front of `/api/v1`.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::{debug, trace};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::{
        current_user::{Principal, bearer_token, session_token},
        session::SessionKeys,
    },
    config::{AuthMode, Config},
    errors::{Error, Result},
};

/// How requests to the protected tree are authenticated. Chosen once when the router is built.
#[derive(Debug, Clone)]
pub enum Authenticator {
    /// Session token from the `access_token` cookie or a bearer header
    Session(SessionKeys),
    /// One shared administrative bearer token
    StaticToken(String),
}

impl Authenticator {
    pub fn from_config(config: &Config, keys: SessionKeys) -> Result<Self> {
        match config.auth.mode {
            AuthMode::Session => Ok(Authenticator::Session(keys)),
            AuthMode::StaticToken => config
                .admin_token
                .clone()
                .filter(|token| !token.is_empty())
                .map(Authenticator::StaticToken)
                .ok_or_else(|| Error::Internal {
                    operation: "build static token gate: admin_token is not configured".to_string(),
                }),
        }
    }

    /// Decide whether a request may pass, and as whom
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Principal> {
        match self {
            Authenticator::Session(keys) => {
                let token = session_token(headers)?;
                let claims = keys.verify(token)?;
                trace!(user_id = claims.user_id, "session token accepted");
                Ok(Principal::User(CurrentUser::from(claims)))
            }
            Authenticator::StaticToken(expected) => match bearer_token(headers) {
                Some(token) if constant_time_eq(token.as_bytes(), expected.as_bytes()) => Ok(Principal::Service),
                Some(_) => Err(Error::Unauthenticated {
                    message: Some("Invalid token".to_string()),
                }),
                None => Err(Error::Unauthenticated {
                    message: Some("Missing or invalid token".to_string()),
                }),
            },
        }
    }
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Middleware that rejects unauthenticated requests and attaches the [`Principal`] to the rest.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response> {
    let principal = state.authenticator.authenticate(request.headers()).inspect_err(|e| {
        debug!(path = %request.uri().path(), "rejected request: {}", e.user_message());
    })?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use axum::http::HeaderValue;
    use std::time::Duration;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"gate-test-secret", Duration::from_secs(900))
    }

    fn with_header(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_gate_accepts_cookie_and_bearer() {
        let keys = keys();
        let token = keys.issue(3, Role::Trainer, "Alice").unwrap();
        let gate = Authenticator::Session(keys);

        let from_cookie = gate.authenticate(&with_header("cookie", &format!("access_token={token}"))).unwrap();
        let from_header = gate.authenticate(&with_header("authorization", &format!("Bearer {token}"))).unwrap();
        assert_eq!(from_cookie, from_header);
        match from_cookie {
            Principal::User(user) => {
                assert_eq!(user.id, 3);
                assert_eq!(user.role, Role::Trainer);
            }
            Principal::Service => panic!("expected a user"),
        }
    }

    #[test]
    fn test_session_gate_rejections() {
        let gate = Authenticator::Session(keys());
        let missing = gate.authenticate(&HeaderMap::new()).unwrap_err();
        assert_eq!(missing.user_message(), "Missing or invalid token");

        let forged = gate.authenticate(&with_header("authorization", "Bearer a.b.c")).unwrap_err();
        assert_eq!(forged.user_message(), "Invalid token");
    }

    #[test]
    fn test_static_gate() {
        let gate = Authenticator::StaticToken("s3cret".to_string());
        assert_eq!(
            gate.authenticate(&with_header("authorization", "Bearer s3cret")).unwrap(),
            Principal::Service
        );
        assert!(gate.authenticate(&with_header("authorization", "Bearer s3cre")).is_err());
        assert!(gate.authenticate(&with_header("authorization", "s3cret")).is_err());
        assert!(gate.authenticate(&HeaderMap::new()).is_err());

        // Session tokens mean nothing to the static gate.
        let token = keys().issue(3, Role::Trainer, "Alice").unwrap();
        assert!(gate.authenticate(&with_header("cookie", &format!("access_token={token}"))).is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        assert!(matches!(Authenticator::from_config(&config, keys()), Ok(Authenticator::Session(_))));

        config.auth.mode = AuthMode::StaticToken;
        assert!(Authenticator::from_config(&config, keys()).is_err());

        config.admin_token = Some("token".to_string());
        assert!(matches!(
            Authenticator::from_config(&config, keys()),
            Ok(Authenticator::StaticToken(t)) if t == "token"
        ));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
