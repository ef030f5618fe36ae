//! Database models for assignments.

use crate::api::models::assignments::{AssignmentCreate, AssignmentUpdate};
use crate::types::{AssignmentId, ClientId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const DEFAULT_ASSIGNMENT_STATUS: &str = "pending";

#[derive(Debug, Clone)]
pub struct AssignmentCreateDBRequest {
    pub client_id: ClientId,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
}

impl From<AssignmentCreate> for AssignmentCreateDBRequest {
    fn from(api: AssignmentCreate) -> Self {
        Self {
            client_id: api.client_id,
            title: api.title,
            description: api.description.unwrap_or_default(),
            due_date: api.due_date,
            status: api.status.unwrap_or_else(|| DEFAULT_ASSIGNMENT_STATUS.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdateDBRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl From<AssignmentUpdate> for AssignmentUpdateDBRequest {
    fn from(api: AssignmentUpdate) -> Self {
        Self {
            title: api.title,
            description: api.description,
            due_date: api.due_date,
            status: api.status,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AssignmentDBResponse {
    pub id: AssignmentId,
    pub trainer_id: UserId,
    pub client_id: ClientId,
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
