//! Persistence layer.
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (api::handlers - HTTP request handlers)
//! └──────┬──────┘
//!        │  Scope
//!        ↓
//! ┌─────────────┐
//! │   Stores    │  (db::handlers - store traits, PgStore / MemoryStore)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`handlers`]: Store traits and the PostgreSQL implementation
//! - [`memory`]: In-process implementation of the same traits
//! - [`scope`]: Ownership scoping shared by both implementations
//! - [`models`]: Database record structures matching table schemas
//! - [`errors`]: Database-specific error types
//!
//! Owned rows (clients, notes, programs, schedules, assignments) are only reachable through
//! methods that take a [`scope::Scope`]. An id that does not exist and an id owned by another
//! trainer produce the same [`errors::DbError::OutOfScope`].

pub mod errors;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod scope;
