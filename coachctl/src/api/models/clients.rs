//! API request/response models for clients and client notes.

use crate::db::models::clients::{ClientDBResponse, NoteDBResponse};
use crate::types::{ClientId, NoteId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ClientCreate {
    pub name: String,
    /// Client-role account that may read this record and the rows assigned to it
    pub user_id: Option<UserId>,
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

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ClientUpdate {
    pub name: Option<String>,
    pub user_id: Option<UserId>,
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

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientResponse {
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

impl From<ClientDBResponse> for ClientResponse {
    fn from(db: ClientDBResponse) -> Self {
        Self {
            id: db.id,
            trainer_id: db.trainer_id,
            user_id: db.user_id,
            name: db.name,
            email: db.email,
            phone: db.phone,
            avatar_url: db.avatar_url,
            birth_date: db.birth_date,
            gender: db.gender,
            height_cm: db.height_cm,
            weight_kg: db.weight_kg,
            goal: db.goal,
            injuries: db.injuries,
            activity_level: db.activity_level,
            medical_conditions: db.medical_conditions,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteCreate {
    pub content: String,
    /// Free-form category, e.g. "general", "injury", "progress"
    #[serde(rename = "type")]
    pub note_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    pub id: NoteId,
    pub client_id: ClientId,
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl From<NoteDBResponse> for NoteResponse {
    fn from(db: NoteDBResponse) -> Self {
        Self {
            id: db.id,
            client_id: db.client_id,
            content: db.content,
            note_type: db.note_type,
            created_by: db.created_by,
            created_at: db.created_at,
        }
    }
}
