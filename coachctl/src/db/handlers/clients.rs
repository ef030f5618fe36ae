//! PostgreSQL implementation of the client and note stores.

use super::{ClientStore, PgStore};
use crate::{
    db::{
        errors::Result,
        models::clients::{ClientCreateDBRequest, ClientDBResponse, ClientUpdateDBRequest, NoteCreateDBRequest, NoteDBResponse},
        scope::{Scope, require_affected, require_row, scoped_delete, scoped_list, scoped_select},
    },
    types::{ClientId, UserId},
};
use tracing::instrument;

const CLIENT_COLUMNS: &str = "id, trainer_id, user_id, name, email, phone, avatar_url, birth_date, gender, height_cm, weight_kg, goal, \
                              injuries, activity_level, medical_conditions, created_at, updated_at";

const NOTE_COLUMNS: &str = "id, client_id, trainer_id, content, note_type, created_by, created_at";

const ENTITY: &str = "Client";

impl PgStore {
    /// A client record may only be linked to an existing client-role account.
    async fn ensure_client_account(&self, user_id: Option<UserId>) -> Result<()> {
        let Some(user_id) = user_id else {
            return Ok(());
        };
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1 AND role = 'client'")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?;
        require_row(found, "User").map(|_| ())
    }
}

#[async_trait::async_trait]
impl ClientStore for PgStore {
    #[instrument(skip(self), err)]
    async fn list_clients(&self, scope: &Scope) -> Result<Vec<ClientDBResponse>> {
        // A client account sees the records linked to it.
        let sql = scoped_list("clients", CLIENT_COLUMNS, &scope.client_record_filter(1), "name, id");
        let clients = sqlx::query_as::<_, ClientDBResponse>(&sql)
            .bind(scope.caller_id)
            .fetch_all(self.pool())
            .await?;
        Ok(clients)
    }

    #[instrument(skip(self), err)]
    async fn get_client(&self, scope: &Scope, id: ClientId) -> Result<ClientDBResponse> {
        let sql = scoped_select("clients", CLIENT_COLUMNS, &scope.client_record_filter(2));
        let client = sqlx::query_as::<_, ClientDBResponse>(&sql)
            .bind(id)
            .bind(scope.caller_id)
            .fetch_optional(self.pool())
            .await?;
        require_row(client, ENTITY)
    }

    #[instrument(skip(self, request), err)]
    async fn create_client(&self, scope: &Scope, request: &ClientCreateDBRequest) -> Result<ClientDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        self.ensure_client_account(request.user_id).await?;
        let client = sqlx::query_as::<_, ClientDBResponse>(&format!(
            "INSERT INTO clients (trainer_id, name, email, phone, avatar_url, birth_date, gender, height_cm, weight_kg, goal, \
             injuries, activity_level, medical_conditions, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(trainer_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.avatar_url)
        .bind(request.birth_date)
        .bind(&request.gender)
        .bind(request.height_cm)
        .bind(request.weight_kg)
        .bind(&request.goal)
        .bind(&request.injuries)
        .bind(&request.activity_level)
        .bind(&request.medical_conditions)
        .bind(request.user_id)
        .fetch_one(self.pool())
        .await?;
        Ok(client)
    }

    #[instrument(skip(self, request), err)]
    async fn update_client(&self, scope: &Scope, id: ClientId, request: &ClientUpdateDBRequest) -> Result<ClientDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        self.ensure_client_account(request.user_id).await?;
        let client = sqlx::query_as::<_, ClientDBResponse>(&format!(
            "UPDATE clients SET \
                name = COALESCE($3, name), \
                email = COALESCE($4, email), \
                phone = COALESCE($5, phone), \
                avatar_url = COALESCE($6, avatar_url), \
                birth_date = COALESCE($7, birth_date), \
                gender = COALESCE($8, gender), \
                height_cm = COALESCE($9, height_cm), \
                weight_kg = COALESCE($10, weight_kg), \
                goal = COALESCE($11, goal), \
                injuries = COALESCE($12, injuries), \
                activity_level = COALESCE($13, activity_level), \
                medical_conditions = COALESCE($14, medical_conditions), \
                user_id = COALESCE($15, user_id), \
                updated_at = NOW() \
             WHERE id = $1 AND trainer_id = $2 RETURNING {CLIENT_COLUMNS}"
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.avatar_url)
        .bind(request.birth_date)
        .bind(&request.gender)
        .bind(request.height_cm)
        .bind(request.weight_kg)
        .bind(&request.goal)
        .bind(&request.injuries)
        .bind(&request.activity_level)
        .bind(&request.medical_conditions)
        .bind(request.user_id)
        .fetch_optional(self.pool())
        .await?;
        require_row(client, ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn delete_client(&self, scope: &Scope, id: ClientId) -> Result<()> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let result = sqlx::query(&scoped_delete("clients"))
            .bind(id)
            .bind(trainer_id)
            .execute(self.pool())
            .await?;
        require_affected(result.rows_affected(), ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn list_client_notes(&self, scope: &Scope, client_id: ClientId) -> Result<Vec<NoteDBResponse>> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        // A foreign client must be rejected, not reported as having no notes.
        self.get_client(scope, client_id).await?;
        let notes = sqlx::query_as::<_, NoteDBResponse>(&format!(
            "SELECT {NOTE_COLUMNS} FROM client_notes WHERE client_id = $1 AND trainer_id = $2 ORDER BY created_at DESC, id DESC"
        ))
        .bind(client_id)
        .bind(trainer_id)
        .fetch_all(self.pool())
        .await?;
        Ok(notes)
    }

    #[instrument(skip(self, request), err)]
    async fn create_client_note(&self, scope: &Scope, client_id: ClientId, request: &NoteCreateDBRequest) -> Result<NoteDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let note = sqlx::query_as::<_, NoteDBResponse>(&format!(
            "INSERT INTO client_notes (client_id, trainer_id, content, note_type, created_by) \
             SELECT $1, $2, $3, $4, $5 \
             WHERE EXISTS (SELECT 1 FROM clients WHERE id = $1 AND trainer_id = $2) \
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(client_id)
        .bind(trainer_id)
        .bind(&request.content)
        .bind(&request.note_type)
        .bind(&request.created_by)
        .fetch_optional(self.pool())
        .await?;
        require_row(note, ENTITY)
    }
}
