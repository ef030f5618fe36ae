//! Database models for scheduled sessions.

use crate::api::models::schedules::{ScheduleCreate, ScheduleUpdate};
use crate::types::{ClientId, ScheduleId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub const DEFAULT_SCHEDULE_STATUS: &str = "scheduled";

#[derive(Debug, Clone)]
pub struct ScheduleCreateDBRequest {
    pub client_id: ClientId,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
}

impl From<ScheduleCreate> for ScheduleCreateDBRequest {
    fn from(api: ScheduleCreate) -> Self {
        Self {
            client_id: api.client_id,
            title: api.title,
            start_time: api.start_time,
            end_time: api.end_time,
            status: api.status.unwrap_or_else(|| DEFAULT_SCHEDULE_STATUS.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleUpdateDBRequest {
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

impl From<ScheduleUpdate> for ScheduleUpdateDBRequest {
    fn from(api: ScheduleUpdate) -> Self {
        Self {
            title: api.title,
            start_time: api.start_time,
            end_time: api.end_time,
            status: api.status,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ScheduleDBResponse {
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
