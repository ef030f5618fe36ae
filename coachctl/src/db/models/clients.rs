//! Database models for client records and their notes.

use crate::api::models::clients::{ClientCreate, ClientUpdate, NoteCreate};
use crate::types::{ClientId, NoteId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

/// Database request for creating a client. The owning trainer comes from the caller's scope.
#[derive(Debug, Clone)]
pub struct ClientCreateDBRequest {
    /// Client-role account allowed to read this record
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goal: Option<String>,
    pub injuries: Option<String>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
}

impl From<ClientCreate> for ClientCreateDBRequest {
    fn from(api: ClientCreate) -> Self {
        Self {
            user_id: api.user_id,
            name: api.name,
            email: api.email,
            phone: api.phone,
            avatar_url: api.avatar_url,
            birth_date: api.birth_date,
            gender: api.gender,
            height_cm: api.height_cm,
            weight_kg: api.weight_kg,
            goal: api.goal,
            injuries: api.injuries,
            activity_level: api.activity_level,
            medical_conditions: api.medical_conditions,
        }
    }
}

/// Partial update; `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct ClientUpdateDBRequest {
    pub user_id: Option<UserId>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goal: Option<String>,
    pub injuries: Option<String>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
}

impl From<ClientUpdate> for ClientUpdateDBRequest {
    fn from(api: ClientUpdate) -> Self {
        Self {
            user_id: api.user_id,
            name: api.name,
            email: api.email,
            phone: api.phone,
            avatar_url: api.avatar_url,
            birth_date: api.birth_date,
            gender: api.gender,
            height_cm: api.height_cm,
            weight_kg: api.weight_kg,
            goal: api.goal,
            injuries: api.injuries,
            activity_level: api.activity_level,
            medical_conditions: api.medical_conditions,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ClientDBResponse {
    pub id: ClientId,
    pub trainer_id: UserId,
    pub user_id: Option<UserId>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub goal: Option<String>,
    pub injuries: Option<String>,
    pub activity_level: Option<String>,
    pub medical_conditions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating a note. `created_by` is the author's display name.
#[derive(Debug, Clone)]
pub struct NoteCreateDBRequest {
    pub content: String,
    pub note_type: String,
    pub created_by: String,
}

impl NoteCreateDBRequest {
    pub fn new(api: NoteCreate, created_by: String) -> Self {
        Self {
            content: api.content,
            note_type: api.note_type.unwrap_or_else(|| "general".to_string()),
            created_by,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NoteDBResponse {
    pub id: NoteId,
    pub client_id: ClientId,
    pub trainer_id: UserId,
    pub content: String,
    pub note_type: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}
