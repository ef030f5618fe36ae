//! API request/response models for assignments.

use crate::db::models::assignments::AssignmentDBResponse;
use crate::types::{AssignmentId, ClientId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentCreate {
    #[serde(default)]
    pub client_id: ClientId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    /// Defaults to "pending"
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentResponse {
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

impl From<AssignmentDBResponse> for AssignmentResponse {
    fn from(db: AssignmentDBResponse) -> Self {
        Self {
            id: db.id,
            trainer_id: db.trainer_id,
            client_id: db.client_id,
            title: db.title,
            description: db.description,
            due_date: db.due_date,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
