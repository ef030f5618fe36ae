//! External identity providers.
//!
//! A provider turns a browser-facing consent redirect and the authorization code it returns into
//! a [`ProviderProfile`]. What happens with the profile is up to
//! [`IdentityResolver`](crate::auth::identity::IdentityResolver).

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{config::GoogleOAuthConfig, errors::Error};

/// Anti-forgery state sent with every consent redirect. Fixed rather than per-session; the
/// callback does not check it.
pub const OAUTH_STATE: &str = "random-state-string-for-csrf-protection";

/// Identity asserted by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}

#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Consent URL to redirect the browser to
    fn authorize_url(&self, state: &str) -> Result<String, Error>;

    /// Exchange an authorization code for the user's profile
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, Error>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Google OAuth 2.0 authorization-code flow.
#[derive(Debug, Clone)]
pub struct GoogleProvider {
    client: Client,
    config: GoogleOAuthConfig,
}

impl GoogleProvider {
    pub fn new(config: GoogleOAuthConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn fetch_access_token(&self, code: &str) -> Result<String, Error> {
        let exchange_failed = |detail: String| Error::UpstreamProvider {
            operation: "exchange token".to_string(),
            detail,
        };

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| exchange_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(exchange_failed(format!("token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = response.json().await.map_err(|e| exchange_failed(e.to_string()))?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, Error> {
        let lookup_failed = |detail: String| Error::UpstreamProvider {
            operation: "get user info".to_string(),
            detail,
        };

        let response = self
            .client
            .get(&self.config.userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| lookup_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(lookup_failed(format!("userinfo endpoint returned {status}")));
        }

        let profile: ProviderProfile = response.json().await.map_err(|e| lookup_failed(e.to_string()))?;
        if profile.email.is_empty() {
            return Err(lookup_failed("profile has no email".to_string()));
        }
        Ok(profile)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for GoogleProvider {
    fn authorize_url(&self, state: &str) -> Result<String, Error> {
        let mut url = Url::parse(&self.config.auth_url).map_err(|e| Error::Internal {
            operation: format!("parse Google auth URL: {e}"),
        })?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("state", state);
        Ok(url.into())
    }

    #[instrument(skip_all, err)]
    async fn exchange_code(&self, code: &str) -> Result<ProviderProfile, Error> {
        if code.is_empty() {
            return Err(Error::UpstreamProvider {
                operation: "exchange token".to_string(),
                detail: "callback carried no authorization code".to_string(),
            });
        }

        let access_token = self.fetch_access_token(code).await?;
        let profile = self.fetch_profile(&access_token).await?;
        debug!(email = %profile.email, "resolved provider profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::install_crypto_provider;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header, method, path},
    };

    fn provider_for(server: &MockServer) -> GoogleProvider {
        install_crypto_provider();
        GoogleProvider::new(GoogleOAuthConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_url: "http://localhost:8080/auth/google/callback".to_string(),
            auth_url: format!("{}/o/oauth2/auth", server.uri()),
            token_url: format!("{}/token", server.uri()),
            userinfo_url: format!("{}/userinfo", server.uri()),
            scopes: vec!["email".to_string(), "profile".to_string()],
        })
    }

    #[test_log::test(tokio::test)]
    async fn test_authorize_url_carries_static_state() {
        let server = MockServer::start().await;
        let provider = provider_for(&server);

        let url = Url::parse(&provider.authorize_url(OAUTH_STATE).unwrap()).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("state".to_string(), OAUTH_STATE.to_string())));
        assert!(pairs.contains(&("client_id".to_string(), "client-id".to_string())));
        assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
        assert!(pairs.contains(&("scope".to_string(), "email profile".to_string())));
    }

    #[test_log::test(tokio::test)]
    async fn test_exchange_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("code=auth-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "google-access-token",
                "token_type": "Bearer",
                "expires_in": 3599
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .and(header("authorization", "Bearer google-access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "1234",
                "email": "g@example.com",
                "name": "Google User",
                "verified_email": true
            })))
            .mount(&server)
            .await;

        let profile = provider_for(&server).exchange_code("auth-code").await.unwrap();
        assert_eq!(
            profile,
            ProviderProfile {
                email: "g@example.com".to_string(),
                name: "Google User".to_string(),
            }
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_rejected_code_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
            .mount(&server)
            .await;

        let err = provider_for(&server).exchange_code("stale").await.unwrap_err();
        assert!(matches!(&err, Error::UpstreamProvider { operation, .. } if operation == "exchange token"));
        assert_eq!(err.user_message(), "Failed to exchange token");
    }

    #[test_log::test(tokio::test)]
    async fn test_profile_failure_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "t"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/userinfo"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = provider_for(&server).exchange_code("code").await.unwrap_err();
        assert!(matches!(&err, Error::UpstreamProvider { operation, .. } if operation == "get user info"));
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_code_is_rejected_without_calling_provider() {
        let server = MockServer::start().await;
        let err = provider_for(&server).exchange_code("").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamProvider { .. }));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }
}
