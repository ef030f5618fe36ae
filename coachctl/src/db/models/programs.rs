//! Database models for programs and their exercises.

use crate::api::models::programs::{ProgramCreate, ProgramExerciseCreate, ProgramUpdate};
use crate::types::{ClientId, ExerciseId, ProgramExerciseId, ProgramId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database request for creating a program. A program without a client is a template.
#[derive(Debug, Clone)]
pub struct ProgramCreateDBRequest {
    pub client_id: Option<ClientId>,
    pub name: String,
    pub description: String,
    pub is_template: bool,
}

impl From<ProgramCreate> for ProgramCreateDBRequest {
    fn from(api: ProgramCreate) -> Self {
        let is_template = api.client_id.is_none() || api.is_template.unwrap_or(false);
        Self {
            client_id: api.client_id,
            name: api.name,
            description: api.description.unwrap_or_default(),
            is_template,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgramUpdateDBRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_template: Option<bool>,
}

impl From<ProgramUpdate> for ProgramUpdateDBRequest {
    fn from(api: ProgramUpdate) -> Self {
        Self {
            name: api.name,
            description: api.description,
            is_template: api.is_template,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProgramDBResponse {
    pub id: ProgramId,
    pub trainer_id: UserId,
    pub client_id: Option<ClientId>,
    pub name: String,
    pub description: String,
    pub is_template: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProgramExerciseCreateDBRequest {
    pub exercise_id: ExerciseId,
    pub sets: i32,
    pub reps: i32,
    pub duration_seconds: i32,
    pub rest_seconds: i32,
    pub notes: String,
    pub position: i32,
}

impl From<ProgramExerciseCreate> for ProgramExerciseCreateDBRequest {
    fn from(api: ProgramExerciseCreate) -> Self {
        Self {
            exercise_id: api.exercise_id,
            sets: api.sets.unwrap_or(0),
            reps: api.reps.unwrap_or(0),
            duration_seconds: api.duration_seconds.unwrap_or(0),
            rest_seconds: api.rest_seconds.unwrap_or(0),
            notes: api.notes.unwrap_or_default(),
            position: api.position.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProgramExerciseDBResponse {
    pub id: ProgramExerciseId,
    pub program_id: ProgramId,
    pub exercise_id: ExerciseId,
    pub sets: i32,
    pub reps: i32,
    pub duration_seconds: i32,
    pub rest_seconds: i32,
    pub notes: String,
    pub position: i32,
}
