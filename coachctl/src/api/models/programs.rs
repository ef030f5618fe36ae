//! API request/response models for programs and program exercises.

use crate::db::models::programs::{ProgramDBResponse, ProgramExerciseDBResponse};
use crate::types::{ClientId, ExerciseId, ProgramExerciseId, ProgramId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProgramCreate {
    pub name: String,
    pub description: Option<String>,
    /// Client this program is written for; omit for a template
    pub client_id: Option<ClientId>,
    pub is_template: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProgramUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_template: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProgramExerciseCreate {
    pub exercise_id: ExerciseId,
    pub sets: Option<i32>,
    pub reps: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub rest_seconds: Option<i32>,
    pub notes: Option<String>,
    /// Position of the exercise within the program
    #[serde(alias = "order")]
    pub position: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgramExerciseResponse {
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

impl From<ProgramExerciseDBResponse> for ProgramExerciseResponse {
    fn from(db: ProgramExerciseDBResponse) -> Self {
        Self {
            id: db.id,
            program_id: db.program_id,
            exercise_id: db.exercise_id,
            sets: db.sets,
            reps: db.reps,
            duration_seconds: db.duration_seconds,
            rest_seconds: db.rest_seconds,
            notes: db.notes,
            position: db.position,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProgramResponse {
    pub id: ProgramId,
    pub trainer_id: UserId,
    pub client_id: Option<ClientId>,
    pub name: String,
    pub description: String,
    pub is_template: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only populated on the detail endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<ProgramExerciseResponse>>,
}

impl From<ProgramDBResponse> for ProgramResponse {
    fn from(db: ProgramDBResponse) -> Self {
        Self {
            id: db.id,
            trainer_id: db.trainer_id,
            client_id: db.client_id,
            name: db.name,
            description: db.description,
            is_template: db.is_template,
            created_at: db.created_at,
            updated_at: db.updated_at,
            exercises: None,
        }
    }
}

impl ProgramResponse {
    pub fn with_exercises(mut self, exercises: Vec<ProgramExerciseDBResponse>) -> Self {
        self.exercises = Some(exercises.into_iter().map(Into::into).collect());
        self
    }
}
