use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but not provided, or the presented token was rejected
    #[error("Not authenticated")]
    Unauthenticated { message: Option<String> },

    /// Unknown email or wrong password. Both cases share one message.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Registration hit the unique email constraint
    #[error("Email already registered")]
    DuplicateEmail,

    /// Token signature was valid but its claims were missing or of the wrong shape
    #[error("Malformed token claims")]
    MalformedClaims,

    /// Resource does not exist or belongs to someone else
    #[error("{resource} not found or not owned by caller")]
    NotFoundOrUnauthorized { resource: String },

    /// The OAuth identity provider failed or returned an unusable response
    #[error("Identity provider failed to {operation}: {detail}")]
    UpstreamProvider { operation: String, detail: String },

    /// Invalid request data or business rule violation
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Scoped persistence rejections surface as `NotFoundOrUnauthorized`; everything else is wrapped.
impl From<DbError> for Error {
    fn from(err: DbError) -> Self {
        match err {
            DbError::OutOfScope { entity } => Error::NotFoundOrUnauthorized {
                resource: entity.to_string(),
            },
            other => Error::Database(other),
        }
    }
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } | Error::InvalidCredentials | Error::MalformedClaims => StatusCode::UNAUTHORIZED,
            Error::DuplicateEmail => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NotFoundOrUnauthorized { .. } => StatusCode::NOT_FOUND,
            Error::UpstreamProvider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound | DbError::OutOfScope { .. } => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthenticated { message } => message.clone().unwrap_or_else(|| "Authentication required".to_string()),
            Error::InvalidCredentials => "Invalid email or password".to_string(),
            Error::DuplicateEmail => "Failed to create user (email might already exist)".to_string(),
            Error::MalformedClaims => "Invalid token claims".to_string(),
            Error::NotFoundOrUnauthorized { resource } => format!("{resource} not found"),
            Error::UpstreamProvider { operation, .. } => format!("Failed to {operation}"),
            Error::BadRequest { message } => message.clone(),
            Error::NotFound { resource, id } => format!("{resource} with ID {id} not found"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::OutOfScope { entity } => format!("{entity} not found"),
                DbError::UniqueViolation { .. } => "Resource already exists".to_string(),
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Database error occurred".to_string(),
            },
            Error::Other(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_))
            | Error::Internal { .. }
            | Error::Other(_)
            | Error::UpstreamProvider { .. }
            | Error::DuplicateEmail => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::Unauthenticated { .. } | Error::InvalidCredentials | Error::MalformedClaims => {
                tracing::info!("Authentication error: {}", self);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } | Error::NotFoundOrUnauthorized { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_scope_becomes_not_found_or_unauthorized() {
        let err: Error = DbError::OutOfScope { entity: "Client" }.into();
        assert!(matches!(&err, Error::NotFoundOrUnauthorized { resource } if resource == "Client"));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.user_message(), "Client not found");
    }

    #[test]
    fn test_upstream_detail_is_not_exposed() {
        let err = Error::UpstreamProvider {
            operation: "exchange token".to_string(),
            detail: "invalid_grant: code already redeemed".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "Failed to exchange token");
    }

    #[test]
    fn test_credential_failures_share_a_message() {
        assert_eq!(Error::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::InvalidCredentials.user_message(), "Invalid email or password");
        assert_eq!(Error::MalformedClaims.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_duplicate_email_is_generic_server_error() {
        assert_eq!(Error::DuplicateEmail.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!Error::DuplicateEmail.user_message().contains("users_email_key"));
    }
}
