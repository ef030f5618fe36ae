//! Database models for session logs. A session is a schedule row; a log records one exercise
//! performed in it together with its sets.

use crate::api::models::sessions::{SessionLogCreate, SessionLogSetCreate};
use crate::types::{ExerciseId, ScheduleId, SessionLogId, SessionLogSetId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct SessionLogSetCreateDBRequest {
    pub set_number: i32,
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<i32>,
}

impl From<SessionLogSetCreate> for SessionLogSetCreateDBRequest {
    fn from(api: SessionLogSetCreate) -> Self {
        Self {
            set_number: api.set_number,
            weight_kg: api.weight_kg,
            reps: api.reps,
            rpe: api.rpe,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionLogCreateDBRequest {
    pub exercise_id: Option<ExerciseId>,
    pub notes: String,
    pub sets: Vec<SessionLogSetCreateDBRequest>,
}

impl From<SessionLogCreate> for SessionLogCreateDBRequest {
    fn from(api: SessionLogCreate) -> Self {
        Self {
            exercise_id: api.exercise_id,
            notes: api.notes,
            sets: api.sets.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionLogSetDBResponse {
    pub id: SessionLogSetId,
    pub session_log_id: SessionLogId,
    pub set_number: i32,
    pub weight_kg: f64,
    pub reps: i32,
    pub rpe: Option<i32>,
}

#[derive(Debug, Clone, FromRow)]
pub struct SessionLogDBResponse {
    pub id: SessionLogId,
    pub schedule_id: ScheduleId,
    pub trainer_id: UserId,
    pub exercise_id: Option<ExerciseId>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    /// Loaded separately from `session_log_sets`, ordered by set number
    #[sqlx(skip)]
    pub sets: Vec<SessionLogSetDBResponse>,
}
