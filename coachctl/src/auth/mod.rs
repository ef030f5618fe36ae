//! Authentication and authorization.
//!
//! # Authentication Methods
//!
//! ## 1. Session tokens
//!
//! - Users log in via `/auth/login` with email/password, or through Google at `/auth/google/login`
//! - The session is an HS256 JWT carrying `user_id`, `role` and `name`, valid for 15 minutes
//! - It travels in the HTTP-only `access_token` cookie, or in an `Authorization: Bearer` header
//!
//! ## 2. Static administrative token
//!
//! - Enabled with `auth.mode: static_token`
//! - A single shared secret (`API_TOKEN`) passed as a bearer token
//! - Grants service access to user administration, never to ownership-scoped resources
//!
//! # Authorization
//!
//! Trainers own their clients, programs, schedules and assignments. A client account reads what
//! is assigned to the client record linked to it. The checks live in [`crate::db::scope`] and run inside each store call.
//!
//! # Modules
//!
//! - [`current_user`]: Credential extraction and the extractors handlers use
//! - [`identity`]: Login, registration and provider find-or-create
//! - [`middleware`]: The gate protecting `/api/v1`
//! - [`oauth`]: External identity providers
//! - [`password`]: Password hashing and verification using Argon2
//! - [`session`]: Token issuing and verification

pub mod current_user;
pub mod identity;
pub mod middleware;
pub mod oauth;
pub mod password;
pub mod session;
