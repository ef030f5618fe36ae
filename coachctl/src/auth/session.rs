//! Session token creation and verification.
//!
//! Tokens are HS256 JWTs. Verification pins the algorithm, allows no clock leeway, and checks
//! `exp` a second time after the library has validated it.

use std::{fmt, time::Duration};

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    api::models::users::{CurrentUser, Role},
    config::{Config, DEFAULT_SECRET_KEY},
    errors::Error,
    types::UserId,
};

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE_NAME: &str = "access_token";

const INVALID_TOKEN: &str = "Invalid token";
const EXPIRED_TOKEN: &str = "Token expired";

/// Session token claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: UserId,
    pub role: Role,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl From<SessionClaims> for CurrentUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            id: claims.user_id,
            role: claims.role,
            name: claims.name,
        }
    }
}

/// Signing and verification keys plus token lifetime, built once at startup.
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("secret", &"<redacted>")
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl SessionKeys {
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            expiry,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let secret = config.secret_key_or_default();
        if secret == DEFAULT_SECRET_KEY {
            warn!("secret_key is not set (JWT_SECRET / COACHCTL_SECRET_KEY); signing sessions with the insecure default");
        }
        Self::new(secret.as_bytes(), config.auth.security.jwt_expiry)
    }

    /// Token lifetime, also used for the cookie `Max-Age`
    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user_id: UserId, role: Role, name: &str) -> Result<String, Error> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            user_id,
            role,
            name: name.to_string(),
            iat: now,
            exp: now + self.expiry.as_secs() as i64,
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &SessionClaims) -> Result<String, Error> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| Error::Internal {
            operation: format!("create JWT: {e}"),
        })
    }

    /// Verify a token and return its claims.
    ///
    /// Structural failures, bad signatures, foreign algorithms and expiry are `Unauthenticated`.
    /// A correctly signed token whose claims do not match [`SessionClaims`] is `MalformedClaims`.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, Error> {
        // Header problems are structural, so keep them apart from claim decoding errors.
        decode_header(token).map_err(|_| invalid_token())?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let claims = decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => Error::Unauthenticated {
                    message: Some(EXPIRED_TOKEN.to_string()),
                },
                ErrorKind::MissingRequiredClaim(_) | ErrorKind::Json(_) => Error::MalformedClaims,
                _ => invalid_token(),
            })?
            .claims;

        if claims.exp <= Utc::now().timestamp() {
            return Err(Error::Unauthenticated {
                message: Some(EXPIRED_TOKEN.to_string()),
            });
        }

        Ok(claims)
    }
}

fn invalid_token() -> Error {
    Error::Unauthenticated {
        message: Some(INVALID_TOKEN.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret-key-for-jwt";

    fn keys() -> SessionKeys {
        SessionKeys::new(SECRET, Duration::from_secs(900))
    }

    fn claims_expiring_at(exp: i64) -> SessionClaims {
        SessionClaims {
            user_id: 7,
            role: Role::Trainer,
            name: "Alice".to_string(),
            iat: Utc::now().timestamp(),
            exp,
        }
    }

    fn message(err: Error) -> Option<String> {
        match err {
            Error::Unauthenticated { message } => message,
            other => panic!("expected Unauthenticated, got {other:?}"),
        }
    }

    #[test]
    fn test_issue_and_verify() {
        let keys = keys();
        let token = keys.issue(7, Role::Client, "Alice").unwrap();

        let claims = keys.verify(&token).unwrap();
        assert_eq!(claims.user_id, 7);
        assert_eq!(claims.role, Role::Client);
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.exp - claims.iat, 900);

        let user = CurrentUser::from(claims);
        assert_eq!(user.id, 7);
    }

    #[test]
    fn test_fresh_token_is_accepted() {
        let keys = keys();
        let token = keys.sign(&claims_expiring_at(Utc::now().timestamp() + 900)).unwrap();
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let keys = keys();
        let token = keys.sign(&claims_expiring_at(Utc::now().timestamp() - 1)).unwrap();
        assert_eq!(message(keys.verify(&token).unwrap_err()).as_deref(), Some("Token expired"));
    }

    #[test]
    fn test_wrong_secret() {
        let token = keys().issue(7, Role::Trainer, "Alice").unwrap();
        let other = SessionKeys::new(b"different-secret", Duration::from_secs(900));
        assert_eq!(message(other.verify(&token).unwrap_err()).as_deref(), Some("Invalid token"));
    }

    #[test]
    fn test_other_algorithm_is_rejected() {
        let claims = claims_expiring_at(Utc::now().timestamp() + 900);
        let token = encode(&Header::new(Algorithm::HS384), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert_eq!(message(keys().verify(&token).unwrap_err()).as_deref(), Some("Invalid token"));
    }

    #[test]
    fn test_missing_claim_is_malformed() {
        let claims = json!({
            "role": "trainer",
            "name": "Alice",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + 900,
        });
        let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert!(matches!(keys().verify(&token), Err(Error::MalformedClaims)));
    }

    #[test]
    fn test_wrongly_typed_claim_is_malformed() {
        let claims = json!({
            "user_id": "seven",
            "role": "trainer",
            "name": "Alice",
            "iat": Utc::now().timestamp(),
            "exp": Utc::now().timestamp() + 900,
        });
        let token = encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert!(matches!(keys().verify(&token), Err(Error::MalformedClaims)));
    }

    #[test]
    fn test_malformed_tokens() {
        let keys = keys();
        for token in ["not.a.token", "invalid", "", "too.many.parts.in.this.token"] {
            let err = keys.verify(token).unwrap_err();
            assert!(
                matches!(err, Error::Unauthenticated { .. }),
                "Expected Unauthenticated error for token: {token}"
            );
        }
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", keys());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("test-secret"));
    }
}
