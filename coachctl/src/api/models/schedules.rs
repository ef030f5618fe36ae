//! API request/response models for scheduled sessions.

use crate::db::models::schedules::ScheduleDBResponse;
use crate::types::{ClientId, ScheduleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleCreate {
    pub client_id: ClientId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Defaults to "scheduled"
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScheduleUpdate {
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: ScheduleId,
    pub trainer_id: UserId,
    pub client_id: ClientId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ScheduleDBResponse> for ScheduleResponse {
    fn from(db: ScheduleDBResponse) -> Self {
        Self {
            id: db.id,
            trainer_id: db.trainer_id,
            client_id: db.client_id,
            title: db.title,
            start_time: db.start_time,
            end_time: db.end_time,
            status: db.status,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
