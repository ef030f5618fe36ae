use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    AppState,
    api::{
        handlers::require_text,
        models::{
            auth::{
                AuthSuccessResponse, LoginRequest, LoginResponse, LogoutResponse, OAuthCallbackQuery, OAuthRedirectResponse,
                RegisterRequest, RegisterResponse,
            },
            users::{CurrentUser, MeResponse, UserResponse},
        },
    },
    auth::{oauth::OAUTH_STATE, session::SESSION_COOKIE_NAME},
    config::Config,
    errors::Error,
};

/// Register a new trainer account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 201, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Missing name, email or password"),
        (status = 500, description = "Email already registered or storage failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, Json(request): Json<RegisterRequest>) -> Result<RegisterResponse, Error> {
    let name = request.display_name().ok_or_else(|| Error::BadRequest {
        message: "Name is required".to_string(),
    })?;
    require_text(&request.email, "Email")?;

    let user = state.identity.register(&name, request.email.trim(), &request.password).await?;

    Ok(RegisterResponse { user: user.into() })
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful; session cookie set", body = AuthSuccessResponse),
        (status = 400, description = "Password missing"),
        (status = 401, description = "Invalid email or password"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(request): Json<LoginRequest>) -> Result<LoginResponse, Error> {
    // An empty password would skip verification in the resolver, so it never reaches it from here.
    if request.password.is_empty() {
        return Err(Error::BadRequest {
            message: "Password is required".to_string(),
        });
    }

    let token = state.identity.login(request.email.trim(), &request.password).await?;

    Ok(LoginResponse {
        auth_response: AuthSuccessResponse {
            message: "Login successful".to_string(),
        },
        cookie: create_session_cookie(&token, &state.config, state.identity.keys().expiry().as_secs()),
    })
}

/// Logout (clear session cookie)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "authentication",
    responses(
        (status = 200, description = "Logout successful", body = AuthSuccessResponse),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> Result<LogoutResponse, Error> {
    Ok(LogoutResponse {
        auth_response: AuthSuccessResponse {
            message: "Logout successful".to_string(),
        },
        cookie: create_session_cookie("", &state.config, 0),
    })
}

/// Start Google sign-in
#[utoipa::path(
    get,
    path = "/auth/google/login",
    tag = "authentication",
    responses(
        (status = 307, description = "Redirect to the Google consent screen"),
        (status = 500, description = "Google sign-in is not configured"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn google_login(State(state): State<AppState>) -> Result<OAuthRedirectResponse, Error> {
    let provider = state.oauth_provider.as_ref().ok_or_else(oauth_not_configured)?;
    Ok(OAuthRedirectResponse {
        location: provider.authorize_url(OAUTH_STATE)?,
        cookie: None,
    })
}

/// Complete Google sign-in: find or create the account, set the session, go to the frontend
#[utoipa::path(
    get,
    path = "/auth/google/callback",
    params(OAuthCallbackQuery),
    tag = "authentication",
    responses(
        (status = 307, description = "Session cookie set; redirect to the frontend"),
        (status = 500, description = "Code exchange or profile lookup failed"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn google_callback(
    State(state): State<AppState>,
    Query(query): Query<OAuthCallbackQuery>,
) -> Result<OAuthRedirectResponse, Error> {
    let provider = state.oauth_provider.as_ref().ok_or_else(oauth_not_configured)?;

    let code = query.code.unwrap_or_default();
    let profile = provider.exchange_code(&code).await?;
    let token = state.identity.login_oauth(&profile.email, &profile.name).await?;

    Ok(OAuthRedirectResponse {
        location: state.config.oauth.frontend_redirect_url.clone(),
        cookie: Some(create_session_cookie(&token, &state.config, state.identity.keys().expiry().as_secs())),
    })
}

/// Who the session belongs to
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    tag = "authentication",
    responses(
        (status = 200, description = "Authenticated", body = MeResponse),
        (status = 401, description = "Missing, invalid or expired session"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(current_user: CurrentUser) -> Json<MeResponse> {
    Json(MeResponse::from(&current_user))
}

fn oauth_not_configured() -> Error {
    Error::Internal {
        operation: "start Google sign-in: OAuth client is not configured".to_string(),
    }
}

/// `Set-Cookie` value for the session token. `Max-Age=0` with an empty token clears it.
fn create_session_cookie(token: &str, config: &Config, max_age: u64) -> String {
    let session = &config.auth.session;
    let mut cookie = format!("{SESSION_COOKIE_NAME}={token}; Path=/; Max-Age={max_age}; HttpOnly");
    if session.cookie_secure {
        cookie.push_str("; Secure");
    }
    if let Some(domain) = &session.cookie_domain {
        cookie.push_str(&format!("; Domain={domain}"));
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::models::users::Role,
        auth::oauth::{IdentityProvider, ProviderProfile},
        db::handlers::UserStore,
        test_utils::{create_test_app, create_test_config, create_test_state, create_test_user},
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use std::sync::Arc;

    struct StubProvider {
        profile: Option<ProviderProfile>,
    }

    #[async_trait::async_trait]
    impl IdentityProvider for StubProvider {
        fn authorize_url(&self, state: &str) -> Result<String, Error> {
            Ok(format!("https://accounts.example.com/auth?state={state}"))
        }

        async fn exchange_code(&self, _code: &str) -> Result<ProviderProfile, Error> {
            self.profile.clone().ok_or_else(|| Error::UpstreamProvider {
                operation: "exchange token".to_string(),
                detail: "invalid_grant".to_string(),
            })
        }
    }

    fn server_with_provider(profile: Option<ProviderProfile>) -> (TestServer, crate::AppState) {
        let (mut state, _) = create_test_state(create_test_config());
        state.oauth_provider = Some(Arc::new(StubProvider { profile }));
        let router = crate::build_router(state.clone()).unwrap();
        (TestServer::new(router).unwrap(), state)
    }

    fn set_cookie(response: &axum_test::TestResponse) -> String {
        response
            .headers()
            .get("set-cookie")
            .map(|v| v.to_str().unwrap().to_string())
            .expect("response should set a cookie")
    }

    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[test_log::test(tokio::test)]
    async fn test_register_success() {
        let (server, _) = create_test_app(create_test_config());

        let response = server
            .post("/auth/register")
            .json(&json!({"firstName": "Alice", "lastName": "Smith", "email": "alice@example.com", "password": "pw1"}))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["name"], "Alice Smith");
        assert_eq!(body["email"], "alice@example.com");
        assert_eq!(body["role"], "trainer");
        assert!(body.get("password_hash").is_none());
        assert!(body.get("password").is_none());
    }

    #[test_log::test(tokio::test)]
    async fn test_register_validation() {
        let (server, _) = create_test_app(create_test_config());

        let no_password = server
            .post("/auth/register")
            .json(&json!({"name": "Alice", "email": "alice@example.com"}))
            .await;
        no_password.assert_status(StatusCode::BAD_REQUEST);
        no_password.assert_json(&json!({"error": "Password is required"}));

        let no_name = server
            .post("/auth/register")
            .json(&json!({"email": "alice@example.com", "password": "pw1"}))
            .await;
        no_name.assert_status(StatusCode::BAD_REQUEST);
        no_name.assert_json(&json!({"error": "Name is required"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_register_duplicate_email() {
        let (server, store) = create_test_app(create_test_config());
        create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;

        let response = server
            .post("/auth/register")
            .json(&json!({"name": "Alice", "email": "alice@example.com", "password": "pw2"}))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"error": "Failed to create user (email might already exist)"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_login_sets_session_cookie() {
        let (server, store) = create_test_app(create_test_config());
        create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;

        let response = server
            .post("/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "pw1"}))
            .await;

        response.assert_status_ok();
        response.assert_json(&json!({"message": "Login successful"}));

        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("access_token="));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=900"));
        assert!(cookie.contains("HttpOnly"));
        assert!(!cookie.contains("; Secure"));
    }

    #[test_log::test(tokio::test)]
    async fn test_login_accepts_padded_email() {
        let (server, _) = create_test_app(create_test_config());

        server
            .post("/auth/register")
            .json(&json!({"name": "Alice", "email": " alice@example.com ", "password": "pw1"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .post("/auth/login")
            .json(&json!({"email": " alice@example.com ", "password": "pw1"}))
            .await;

        response.assert_status_ok();
        assert!(set_cookie(&response).starts_with("access_token="));
    }

    #[test_log::test(tokio::test)]
    async fn test_login_secure_cookie_when_configured() {
        let mut config = create_test_config();
        config.auth.session.cookie_secure = true;
        config.auth.session.cookie_domain = Some("coach.example.com".to_string());
        let (server, store) = create_test_app(config);
        create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;

        let response = server
            .post("/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "pw1"}))
            .await;

        let cookie = set_cookie(&response);
        assert!(cookie.contains("; Secure"));
        assert!(cookie.contains("; Domain=coach.example.com"));
    }

    #[test_log::test(tokio::test)]
    async fn test_login_failures() {
        let (server, store) = create_test_app(create_test_config());
        create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;

        for body in [
            json!({"email": "alice@example.com", "password": "wrong"}),
            json!({"email": "nobody@example.com", "password": "pw1"}),
        ] {
            let response = server.post("/auth/login").json(&body).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            response.assert_json(&json!({"error": "Invalid email or password"}));
            assert!(response.headers().get("set-cookie").is_none());
        }

        let empty = server.post("/auth/login").json(&json!({"email": "alice@example.com"})).await;
        empty.assert_status(StatusCode::BAD_REQUEST);
        empty.assert_json(&json!({"error": "Password is required"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_logout_clears_cookie() {
        let (server, _) = create_test_app(create_test_config());

        let response = server.post("/auth/logout").await;

        response.assert_status_ok();
        response.assert_json(&json!({"message": "Logout successful"}));
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("access_token=;"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test_log::test(tokio::test)]
    async fn test_me_after_login() {
        let (server, store) = create_test_app(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;

        let login = server
            .post("/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "pw1"}))
            .await;
        let cookie = cookie_pair(&set_cookie(&login));

        let response = server.get("/api/v1/auth/me").add_header("cookie", &cookie).await;
        response.assert_status_ok();
        response.assert_json(&json!({"message": "You are authenticated!", "user_id": alice.id, "role": "trainer"}));

        let token = cookie.trim_start_matches("access_token=");
        let via_header = server
            .get("/api/v1/auth/me")
            .add_header("authorization", &format!("Bearer {token}"))
            .await;
        via_header.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_me_without_session() {
        let (server, _) = create_test_app(create_test_config());

        let response = server.get("/api/v1/auth/me").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({"error": "Missing or invalid token"}));

        let garbage = server.get("/api/v1/auth/me").add_header("cookie", "access_token=garbage").await;
        garbage.assert_status(StatusCode::UNAUTHORIZED);
        garbage.assert_json(&json!({"error": "Invalid token"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_google_login_redirects_with_state() {
        let (server, _) = server_with_provider(None);

        let response = server.get("/auth/google/login").await;

        response.assert_status(StatusCode::TEMPORARY_REDIRECT);
        let location = response.headers().get("location").unwrap().to_str().unwrap();
        assert!(location.ends_with("state=random-state-string-for-csrf-protection"));
    }

    #[test_log::test(tokio::test)]
    async fn test_google_login_unconfigured() {
        let (server, _) = create_test_app(create_test_config());
        server.get("/auth/google/login").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test_log::test(tokio::test)]
    async fn test_google_callback_creates_then_reuses_user() {
        let profile = ProviderProfile {
            email: "g@example.com".to_string(),
            name: "Google User".to_string(),
        };
        let (server, state) = server_with_provider(Some(profile));

        let first = server.get("/auth/google/callback?code=abc&state=whatever").await;
        first.assert_status(StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(
            first.headers().get("location").unwrap().to_str().unwrap(),
            "http://localhost:3000/dashboard"
        );
        let cookie = set_cookie(&first);
        assert!(cookie.contains("HttpOnly"));

        let second = server.get("/auth/google/callback?code=def").await;
        second.assert_status(StatusCode::TEMPORARY_REDIRECT);

        let user = state.store.get_user_by_email("g@example.com").await.unwrap().unwrap();
        assert_eq!(user.name, "Google User");
        assert_eq!(user.role, Role::Trainer);
        assert_eq!(state.store.count_users().await.unwrap(), 1);

        let me = server.get("/api/v1/auth/me").add_header("cookie", &cookie_pair(&cookie)).await;
        me.assert_json(&json!({"message": "You are authenticated!", "user_id": user.id, "role": "trainer"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_google_callback_keeps_existing_account() {
        let profile = ProviderProfile {
            email: "alice@example.com".to_string(),
            name: "Alice From Google".to_string(),
        };
        let (server, state) = server_with_provider(Some(profile));
        let register = server
            .post("/auth/register")
            .json(&json!({"name": "Alice", "email": "alice@example.com", "password": "pw1"}))
            .await;
        register.assert_status(StatusCode::CREATED);

        server
            .get("/auth/google/callback?code=abc")
            .await
            .assert_status(StatusCode::TEMPORARY_REDIRECT);

        let user = state.store.get_user_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(user.name, "Alice");
        server
            .post("/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "pw1"}))
            .await
            .assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_google_callback_exchange_failure() {
        let (server, state) = server_with_provider(None);

        let response = server.get("/auth/google/callback?code=stale").await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({"error": "Failed to exchange token"}));
        assert!(response.headers().get("set-cookie").is_none());
        assert_eq!(state.store.count_users().await.unwrap(), 0);
    }
}
