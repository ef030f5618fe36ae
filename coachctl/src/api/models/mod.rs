//! API request and response data models.
//!
//! API models are distinct from database models so the storage representation can change
//! without changing the public contract. Response types never carry secrets: users are
//! returned without their password hash.
//!
//! - [`auth`]: Login, registration and OAuth callback payloads
//! - [`users`]: User profiles, roles and the authenticated caller
//! - [`clients`]: Client records and notes
//! - [`programs`]: Programs and their exercises
//! - [`schedules`]: Scheduled sessions
//! - [`sessions`]: Exercise logs recorded against a session
//! - [`assignments`]: Assignments
//! - [`dashboard`]: Aggregate counts
//! - [`pagination`]: Offset pagination helpers

pub mod assignments;
pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod pagination;
pub mod programs;
pub mod schedules;
pub mod sessions;
pub mod users;
