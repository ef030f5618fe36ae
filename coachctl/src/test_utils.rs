//! Test utilities for integration testing (available with `test-utils` feature).

use std::sync::Arc;

use axum_test::TestServer;

use crate::{
    AppState,
    api::models::{
        clients::ClientCreate,
        users::{CurrentUser, Role},
    },
    auth::password::{self, Argon2Params},
    config::{Config, DatabaseConfig},
    db::{
        handlers::{ClientStore, UserStore},
        memory::MemoryStore,
        models::{
            clients::{ClientCreateDBRequest, ClientDBResponse},
            users::{UserCreateDBRequest, UserDBResponse},
        },
        scope::Scope,
    },
};

pub const TEST_SECRET_KEY: &str = "test-secret-key-for-testing-only";

/// Argon2 parameters cheap enough for tests. Never use outside tests.
pub fn fast_argon2_params() -> Argon2Params {
    Argon2Params {
        memory_kib: 128,
        iterations: 1,
        parallelism: 1,
    }
}

/// reqwest is built without a default TLS provider; install one before creating clients.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

pub fn create_test_config() -> Config {
    let mut config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database: DatabaseConfig::Memory,
        secret_key: Some(TEST_SECRET_KEY.to_string()),
        ..Default::default()
    };
    let params = fast_argon2_params();
    config.auth.password.argon2_memory_kib = params.memory_kib;
    config.auth.password.argon2_iterations = params.iterations;
    config.auth.password.argon2_parallelism = params.parallelism;
    config
}

/// Application state over a fresh in-memory store
pub fn create_test_state(config: Config) -> (AppState, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_store(store.clone(), config).expect("Failed to build test state");
    (state, store)
}

/// Full router over a fresh in-memory store
pub fn create_test_app(config: Config) -> (TestServer, Arc<MemoryStore>) {
    let (state, store) = create_test_state(config);
    let router = crate::build_router(state).expect("Failed to build router");
    (TestServer::new(router).expect("Failed to create test server"), store)
}

pub async fn create_test_user(store: &MemoryStore, email: &str, password: &str, role: Role) -> UserDBResponse {
    let password_hash = password::hash_string_with_params(password, fast_argon2_params()).expect("Failed to hash password");
    store
        .create_user(&UserCreateDBRequest {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash,
            role,
        })
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_client(store: &MemoryStore, trainer: &UserDBResponse, name: &str) -> ClientDBResponse {
    create_client_record(store, trainer, name, None).await
}

/// Client record readable by the client-role `account`
pub async fn create_linked_test_client(
    store: &MemoryStore,
    trainer: &UserDBResponse,
    name: &str,
    account: &UserDBResponse,
) -> ClientDBResponse {
    create_client_record(store, trainer, name, Some(account.id)).await
}

async fn create_client_record(store: &MemoryStore, trainer: &UserDBResponse, name: &str, user_id: Option<i64>) -> ClientDBResponse {
    let request = ClientCreateDBRequest::from(ClientCreate {
        name: name.to_string(),
        user_id,
        ..Default::default()
    });
    store
        .create_client(&Scope::new(trainer.id, trainer.role), &request)
        .await
        .expect("Failed to create test client")
}

/// `Cookie` header value carrying a valid session for `user`
pub fn session_cookie_for(state: &AppState, user: &UserDBResponse) -> String {
    let current = CurrentUser::from(user.clone());
    let token = state
        .identity
        .keys()
        .issue(current.id, current.role, &current.name)
        .expect("Failed to issue session token");
    format!("access_token={token}")
}
