//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Authentication** (`/auth/*`): Registration, login, logout and Google sign-in. Public.
//! - **Session** (`/api/v1/auth/me`): Who the gate says the caller is
//! - **Users** (`/api/v1/users/*`): User administration
//! - **Clients** (`/api/v1/clients/*`): A trainer's clients and their notes
//! - **Programs** (`/api/v1/programs/*`): Training programs and their exercises
//! - **Schedules** (`/api/v1/schedules/*`): Scheduled sessions
//! - **Assignments** (`/api/v1/assignments/*`): Work assigned to clients
//! - **Dashboard** (`/api/v1/dashboard/stats`): Counts for the caller
//!
//! # OpenAPI Documentation
//!
//! Endpoints are annotated with `utoipa`; the document is served at `/api-docs/openapi.json`.

pub mod handlers;
pub mod models;
