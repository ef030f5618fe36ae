//! API request/response models for session logs.

use crate::db::models::sessions::{SessionLogDBResponse, SessionLogSetDBResponse};
use crate::types::{ExerciseId, ScheduleId, SessionLogId, SessionLogSetId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionLogSetCreate {
    /// 1-based position of the set within the exercise
    pub set_number: i32,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub reps: i32,
    /// Rate of perceived exertion, 1 to 10
    pub rpe: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SessionLogCreate {
    pub exercise_id: Option<ExerciseId>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sets: Vec<SessionLogSetCreate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionLogSetResponse {
    pub id: SessionLogSetId,
    pub set_number: i32,
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<i32>,
}

impl From<SessionLogSetDBResponse> for SessionLogSetResponse {
    fn from(db: SessionLogSetDBResponse) -> Self {
        Self {
            id: db.id,
            set_number: db.set_number,
            weight_kg: db.weight_kg,
            reps: db.reps,
            rpe: db.rpe,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionLogResponse {
    pub id: SessionLogId,
    pub schedule_id: ScheduleId,
    pub trainer_id: UserId,
    pub exercise_id: Option<ExerciseId>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub sets: Vec<SessionLogSetResponse>,
}

impl From<SessionLogDBResponse> for SessionLogResponse {
    fn from(db: SessionLogDBResponse) -> Self {
        Self {
            id: db.id,
            schedule_id: db.schedule_id,
            trainer_id: db.trainer_id,
            exercise_id: db.exercise_id,
            notes: db.notes,
            created_at: db.created_at,
            sets: db.sets.into_iter().map(Into::into).collect(),
        }
    }
}
