//! HTTP request handlers for all API endpoints.
//!
//! Handlers validate input, take the caller from the request extensions, and call the store with
//! a [`Scope`](crate::db::scope::Scope) built from that caller. Ownership is enforced by the
//! store; handlers never compare owner ids themselves.
//!
//! # Handler Modules
//!
//! - [`assignments`]: Assignment CRUD
//! - [`auth`]: Registration, login, logout, Google sign-in and session introspection
//! - [`clients`]: Client CRUD and client notes
//! - [`dashboard`]: Caller-scoped statistics
//! - [`health`]: Liveness and database connectivity
//! - [`programs`]: Program CRUD and program exercises
//! - [`schedules`]: Schedule CRUD
//! - [`sessions`]: Per-client sessions and session logs
//! - [`users`]: User administration
//!
//! # Error Handling
//!
//! Handlers return `Result<T, Error>`; [`Error`](crate::errors::Error) renders as
//! `{"error": "<message>"}` with the matching status code.

pub mod assignments;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod health;
pub mod programs;
pub mod schedules;
pub mod sessions;
pub mod users;

use crate::errors::Error;

/// Reject a blank required text field with `400 "<field> is required"`
pub(crate) fn require_text(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::BadRequest {
            message: format!("{field} is required"),
        });
    }
    Ok(())
}
