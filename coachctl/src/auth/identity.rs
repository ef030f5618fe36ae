//! Credential login, registration and provider-identity resolution.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    api::models::users::Role,
    auth::{
        password::{self, Argon2Params, OAUTH_PLACEHOLDER_PASSWORD},
        session::SessionKeys,
    },
    db::{
        handlers::UserStore,
        models::users::{UserCreateDBRequest, UserDBResponse},
    },
    errors::Error,
};

/// Turns credentials or a provider profile into a user and a session token.
#[derive(Clone)]
pub struct IdentityResolver {
    users: Arc<dyn UserStore>,
    keys: SessionKeys,
    argon2: Argon2Params,
}

impl std::fmt::Debug for IdentityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityResolver")
            .field("keys", &self.keys)
            .field("argon2", &self.argon2)
            .finish_non_exhaustive()
    }
}

impl IdentityResolver {
    pub fn new(users: Arc<dyn UserStore>, keys: SessionKeys, argon2: Argon2Params) -> Self {
        Self { users, keys, argon2 }
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    /// Check credentials and issue a session token.
    ///
    /// An unknown email and a wrong password both give `InvalidCredentials`. An empty password
    /// skips the hash comparison; only the provider login path passes one.
    #[instrument(skip(self, password), err)]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, Error> {
        let user = self.users.get_user_by_email(email).await?.ok_or(Error::InvalidCredentials)?;

        if !password.is_empty() && !password::verify_string_blocking(password.to_string(), user.password_hash.clone()).await {
            debug!(user_id = user.id, "password verification failed");
            return Err(Error::InvalidCredentials);
        }

        self.keys.issue(user.id, user.role, &user.name)
    }

    /// Create a trainer account with a hashed password.
    #[instrument(skip(self, password), err)]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserDBResponse, Error> {
        if password.is_empty() {
            return Err(Error::BadRequest {
                message: "Password is required".to_string(),
            });
        }
        self.create_user(name, email, password).await
    }

    /// Find the user with this provider email, or create one.
    ///
    /// Existing accounts are returned unchanged; provider data never overwrites name or role.
    /// If a concurrent request creates the same email first, that user is returned.
    #[instrument(skip(self), err)]
    pub async fn resolve_oauth_identity(&self, provider_email: &str, provider_name: &str) -> Result<UserDBResponse, Error> {
        if let Some(user) = self.users.get_user_by_email(provider_email).await? {
            return Ok(user);
        }

        match self.create_user(provider_name, provider_email, OAUTH_PLACEHOLDER_PASSWORD).await {
            Ok(user) => {
                info!(user_id = user.id, "provisioned user from identity provider");
                Ok(user)
            }
            Err(Error::DuplicateEmail) => {
                debug!("lost registration race, reading existing user");
                self.users
                    .get_user_by_email(provider_email)
                    .await?
                    .ok_or(Error::DuplicateEmail)
            }
            Err(e) => Err(e),
        }
    }

    /// Provider login: resolve the identity, then log in without a password.
    #[instrument(skip(self), err)]
    pub async fn login_oauth(&self, provider_email: &str, provider_name: &str) -> Result<String, Error> {
        let user = self.resolve_oauth_identity(provider_email, provider_name).await?;
        self.login(&user.email, "").await
    }

    async fn create_user(&self, name: &str, email: &str, password: &str) -> Result<UserDBResponse, Error> {
        let password_hash = password::hash_string_blocking(password.to_string(), self.argon2).await?;
        let request = UserCreateDBRequest {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Trainer,
        };

        self.users.create_user(&request).await.map_err(|e| {
            if e.is_duplicate_email() {
                Error::DuplicateEmail
            } else {
                e.into()
            }
        })
    }
}
