//! Database record structures and request types.
//!
//! Each submodule holds the `*DBResponse` row type (decoded with `sqlx::FromRow`) and the
//! `*DBRequest` types the stores accept.

pub mod assignments;
pub mod clients;
pub mod dashboard;
pub mod programs;
pub mod schedules;
pub mod sessions;
pub mod users;
