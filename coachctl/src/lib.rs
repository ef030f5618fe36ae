//! # coachctl: authentication and ownership-scoped access for a coaching platform
//!
//! Trainers manage clients, programs, schedules and assignments; clients see what their trainer
//! assigned to them. `coachctl` is the HTTP service in front of that data. It owns who a caller
//! is and which rows the caller may touch.
//!
//! ## Request Flow
//!
//! Public authentication routes (`/auth/*`) exchange credentials for a session:
//!
//! - `POST /auth/register` and `POST /auth/login` for email and password
//! - `GET /auth/google/login` and `/auth/google/callback` for Google sign-in, which finds or
//!   creates the account for the Google email
//!
//! A session is a short-lived HS256 JWT set as the HTTP-only `access_token` cookie.
//!
//! Everything under `/api/v1` passes through one gate ([`auth::middleware::authenticate`]) that
//! either verifies the session token or, in `static_token` mode, compares a shared administrative
//! token. The gate attaches a [`auth::current_user::Principal`] to the request; handlers get
//! identity only from there.
//!
//! Handlers then call the persistence layer ([`db`]) with a [`db::scope::Scope`] built from the
//! caller. The scope travels into the query itself, so a row that belongs to someone else looks
//! exactly like a row that does not exist.
//!
//! ## Core Components
//!
//! - [`api`]: HTTP handlers and request/response models
//! - [`auth`]: Password hashing, session tokens, identity resolution, the gate
//! - [`db`]: Store traits with PostgreSQL and in-memory implementations
//! - [`config`]: YAML + environment configuration
//! - [`telemetry`]: Logging and optional OTLP trace export

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod telemetry;
mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    http::{self, HeaderValue},
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;

use crate::{
    auth::{
        identity::IdentityResolver,
        middleware::{Authenticator, authenticate},
        oauth::{GoogleProvider, IdentityProvider},
        session::SessionKeys,
    },
    config::{CorsOrigin, DatabaseConfig, PoolSettings},
    db::{
        handlers::{PgStore, Store, UserStore},
        memory::MemoryStore,
    },
    openapi::ApiDoc,
};

/// Shared state handed to every handler.
///
/// Everything in here is immutable after startup.
#[derive(Clone, Builder)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub identity: IdentityResolver,
    pub authenticator: Authenticator,
    pub oauth_provider: Option<Arc<dyn IdentityProvider>>,
    pub config: Config,
}

impl AppState {
    /// Wire session keys, the identity resolver, the gate and the OAuth provider around a store.
    pub fn from_store<S: Store + 'static>(store: Arc<S>, config: Config) -> anyhow::Result<Self> {
        let keys = SessionKeys::from_config(&config);
        let users: Arc<dyn UserStore> = store.clone();
        let identity = IdentityResolver::new(users, keys.clone(), config.auth.password.argon2_params());
        let authenticator = Authenticator::from_config(&config, keys)?;

        let oauth_provider: Option<Arc<dyn IdentityProvider>> = if config.oauth.google.enabled() {
            Some(Arc::new(GoogleProvider::new(config.oauth.google.clone())))
        } else {
            warn!("Google OAuth is not configured (GOOGLE_CLIENT_ID unset); /auth/google/* will fail");
            None
        };

        Ok(Self::builder()
            .store(store)
            .identity(identity)
            .authenticator(authenticator)
            .maybe_oauth_provider(oauth_provider)
            .config(config)
            .build())
    }
}

/// Get the coachctl database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

async fn connect_pool(url: &str, settings: &PoolSettings) -> anyhow::Result<PgPool> {
    let non_zero = |secs: u64| (secs > 0).then(|| Duration::from_secs(secs));
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .idle_timeout(non_zero(settings.idle_timeout_secs))
        .max_lifetime(non_zero(settings.max_lifetime_secs))
        .connect(url)
        .await?;
    Ok(pool)
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.auth.security.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().trim_end_matches('/').parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    let mut cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([http::Method::GET, http::Method::POST, http::Method::PUT, http::Method::DELETE])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .allow_credentials(config.auth.security.cors.allow_credentials)
        .expose_headers(vec![http::header::LOCATION]);

    if let Some(max_age) = config.auth.security.cors.max_age {
        cors = cors.max_age(Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router: public auth routes, the gated `/api/v1` tree, health and docs.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    use api::handlers::{assignments, auth, clients, dashboard, health, programs, schedules, sessions, users};

    let auth_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/google/login", get(auth::google_login))
        .route("/auth/google/callback", get(auth::google_callback));

    let api_routes = Router::new()
        .route("/auth/me", get(auth::me))
        // User administration
        .route("/users", get(users::list_users))
        .route("/users/{id}", get(users::get_user).put(users::update_user).delete(users::delete_user))
        // Clients and notes
        .route("/clients", get(clients::list_clients).post(clients::create_client))
        .route(
            "/clients/{id}",
            get(clients::get_client).put(clients::update_client).delete(clients::delete_client),
        )
        .route("/clients/{id}/notes", get(clients::list_client_notes).post(clients::create_client_note))
        .route("/clients/{id}/sessions", get(sessions::list_client_sessions))
        // Programs
        .route("/programs", get(programs::list_programs).post(programs::create_program))
        .route(
            "/programs/{id}",
            get(programs::get_program).put(programs::update_program).delete(programs::delete_program),
        )
        .route("/programs/{id}/exercises", post(programs::add_program_exercise))
        .route("/programs/{id}/exercises/{exercise_id}", delete(programs::remove_program_exercise))
        // Schedules and assignments
        .route("/schedules", get(schedules::list_schedules).post(schedules::create_schedule))
        .route("/schedules/{id}", axum::routing::put(schedules::update_schedule).delete(schedules::delete_schedule))
        // Sessions and their logs
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{id}/logs", get(sessions::list_session_logs).post(sessions::create_session_log))
        .route("/assignments", get(assignments::list_assignments).post(assignments::create_assignment))
        .route(
            "/assignments/{id}",
            axum::routing::put(assignments::update_assignment).delete(assignments::delete_assignment),
        )
        .route("/dashboard/stats", get(dashboard::get_dashboard_stats))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let router = Router::new()
        .route("/health", get(health::health))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(auth_routes)
        .nest("/api/v1", api_routes)
        .with_state(state.clone());

    let cors_layer = create_cors_layer(&state.config)?;
    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// A configured server, ready to bind.
pub struct Application {
    router: Router,
    config: Config,
    pool: Option<PgPool>,
}

impl Application {
    /// Connect storage, run migrations and build the router
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting coachctl with configuration: {:#?}", config);

        let (state, pool) = match &config.database {
            DatabaseConfig::Postgres { url, pool: settings } => {
                info!("Using PostgreSQL store");
                let pool = connect_pool(url, settings).await?;
                migrator().run(&pool).await?;
                let state = AppState::from_store(Arc::new(PgStore::new(pool.clone())), config.clone())?;
                (state, Some(pool))
            }
            DatabaseConfig::Memory => {
                info!("Using in-memory store; data will be lost on shutdown");
                (AppState::from_store(Arc::new(MemoryStore::new()), config.clone())?, None)
            }
        };

        let router = build_router(state)?;
        Ok(Self { router, config, pool })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Serve until `shutdown` resolves, then release resources
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("coachctl listening on http://{}", bind_addr);

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        if let Some(pool) = self.pool {
            info!("Closing database connections...");
            pool.close().await;
        }

        info!("Shutting down telemetry...");
        telemetry::shutdown_telemetry();

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        api::models::users::Role,
        config::AuthMode,
        test_utils::{create_test_app, create_test_client, create_test_config, create_test_state, create_test_user, session_cookie_for},
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};

    #[test_log::test(tokio::test)]
    async fn test_register_login_me_flow() {
        let (server, _) = create_test_app(create_test_config());

        let registered = server
            .post("/auth/register")
            .json(&json!({"name": "Alice", "email": "alice@example.com", "password": "pw123"}))
            .await;
        registered.assert_status(StatusCode::CREATED);
        let alice_id = registered.json::<Value>()["id"].as_i64().unwrap();

        let login = server
            .post("/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "pw123"}))
            .await;
        login.assert_status_ok();
        let set_cookie = login.headers().get("set-cookie").unwrap().to_str().unwrap().to_string();
        let cookie = set_cookie.split(';').next().unwrap().to_string();

        let wrong = server
            .post("/auth/login")
            .json(&json!({"email": "alice@example.com", "password": "pw124"}))
            .await;
        wrong.assert_status(StatusCode::UNAUTHORIZED);
        wrong.assert_json(&json!({"error": "Invalid email or password"}));

        let me = server.get("/api/v1/auth/me").add_header("cookie", &cookie).await;
        me.assert_status_ok();
        let body: Value = me.json();
        assert_eq!(body["user_id"], alice_id);
        assert_eq!(body["role"], "trainer");

        server.get("/api/v1/auth/me").await.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[test_log::test(tokio::test)]
    async fn test_every_api_route_is_gated() {
        let (server, _) = create_test_app(create_test_config());

        for path in [
            "/api/v1/users",
            "/api/v1/clients",
            "/api/v1/programs",
            "/api/v1/schedules",
            "/api/v1/clients/1/sessions",
            "/api/v1/sessions/1/logs",
            "/api/v1/assignments",
            "/api/v1/dashboard/stats",
        ] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            response.assert_json(&json!({"error": "Missing or invalid token"}));
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_expired_session_is_rejected() {
        let (state, store) = create_test_state(create_test_config());
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        let now = chrono::Utc::now().timestamp();
        let token = state
            .identity
            .keys()
            .sign(&crate::auth::session::SessionClaims {
                user_id: alice.id,
                role: Role::Trainer,
                name: alice.name.clone(),
                iat: now - 1000,
                exp: now - 100,
            })
            .unwrap();
        let server = TestServer::new(build_router(state).unwrap()).unwrap();

        let response = server
            .get("/api/v1/clients")
            .add_header("cookie", &format!("access_token={token}"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({"error": "Token expired"}));
    }

    #[test_log::test(tokio::test)]
    async fn test_static_token_deployment() {
        let mut config = create_test_config();
        config.auth.mode = AuthMode::StaticToken;
        config.admin_token = Some("admin-secret".to_string());
        let (state, store) = create_test_state(config);
        let alice = create_test_user(&store, "alice@example.com", "pw1", Role::Trainer).await;
        create_test_client(&store, &alice, "Carol").await;
        let session = session_cookie_for(&state, &alice);
        let server = TestServer::new(build_router(state).unwrap()).unwrap();

        // Session cookies carry no weight in this deployment.
        let response = server.get("/api/v1/users").add_header("cookie", &session).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({"error": "Missing or invalid token"}));

        let wrong = server.get("/api/v1/users").add_header("authorization", "Bearer not-it").await;
        wrong.assert_status(StatusCode::UNAUTHORIZED);
        wrong.assert_json(&json!({"error": "Invalid token"}));

        server
            .get("/api/v1/users")
            .add_header("authorization", "Bearer admin-secret")
            .await
            .assert_status_ok();

        // The administrative token is not a user, so it cannot act on owned resources.
        let clients = server
            .get("/api/v1/clients")
            .add_header("authorization", "Bearer admin-secret")
            .await;
        clients.assert_status(StatusCode::UNAUTHORIZED);
        clients.assert_json(&json!({"error": "User session required"}));

        // Public routes stay public.
        server.get("/health").await.assert_status_ok();
    }

    #[test_log::test(tokio::test)]
    async fn test_cors_preflight_allows_frontend_origin() {
        let (server, _) = create_test_app(create_test_config());

        let response = server
            .method(http::Method::OPTIONS, "/auth/login")
            .add_header("origin", "http://localhost:3000")
            .add_header("access-control-request-method", "POST")
            .await;

        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
        assert_eq!(response.headers().get("access-control-allow-credentials").unwrap(), "true");
    }

    #[test_log::test(tokio::test)]
    async fn test_openapi_document_is_served() {
        let (server, _) = create_test_app(create_test_config());
        let response = server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        assert!(response.json::<Value>()["paths"]["/api/v1/auth/me"].is_object());
    }

    #[test_log::test(tokio::test)]
    async fn test_memory_application_builds() {
        let app = Application::new(create_test_config()).await.unwrap();
        let server = app.into_test_server();
        server.get("/health").await.assert_status_ok();
    }
}
