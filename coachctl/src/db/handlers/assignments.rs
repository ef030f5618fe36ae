//! PostgreSQL implementation of the assignment store.

use super::{AssignmentStore, PgStore};
use crate::{
    db::{
        errors::Result,
        models::assignments::{AssignmentCreateDBRequest, AssignmentDBResponse, AssignmentUpdateDBRequest},
        scope::{Scope, require_affected, require_row, scoped_delete, scoped_list},
    },
    types::AssignmentId,
};
use tracing::instrument;

const ASSIGNMENT_COLUMNS: &str = "id, trainer_id, client_id, title, description, due_date, status, created_at, updated_at";

const ENTITY: &str = "Assignment";

#[async_trait::async_trait]
impl AssignmentStore for PgStore {
    #[instrument(skip(self), err)]
    async fn list_assignments(&self, scope: &Scope) -> Result<Vec<AssignmentDBResponse>> {
        let sql = scoped_list(
            "assignments",
            ASSIGNMENT_COLUMNS,
            &scope.read_filter(1),
            "due_date ASC NULLS LAST, id",
        );
        let assignments = sqlx::query_as::<_, AssignmentDBResponse>(&sql)
            .bind(scope.caller_id)
            .fetch_all(self.pool())
            .await?;
        Ok(assignments)
    }

    #[instrument(skip(self, request), err)]
    async fn create_assignment(&self, scope: &Scope, request: &AssignmentCreateDBRequest) -> Result<AssignmentDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let assignment = sqlx::query_as::<_, AssignmentDBResponse>(&format!(
            "INSERT INTO assignments (trainer_id, client_id, title, description, due_date, status) \
             SELECT $1, $2, $3, $4, $5, $6 \
             WHERE EXISTS (SELECT 1 FROM clients WHERE id = $2 AND trainer_id = $1) \
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(trainer_id)
        .bind(request.client_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(&request.status)
        .fetch_optional(self.pool())
        .await?;
        require_row(assignment, "Client")
    }

    #[instrument(skip(self, request), err)]
    async fn update_assignment(
        &self,
        scope: &Scope,
        id: AssignmentId,
        request: &AssignmentUpdateDBRequest,
    ) -> Result<AssignmentDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let assignment = sqlx::query_as::<_, AssignmentDBResponse>(&format!(
            "UPDATE assignments SET \
                title = COALESCE($3, title), \
                description = COALESCE($4, description), \
                due_date = COALESCE($5, due_date), \
                status = COALESCE($6, status), \
                updated_at = NOW() \
             WHERE id = $1 AND trainer_id = $2 RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.due_date)
        .bind(&request.status)
        .fetch_optional(self.pool())
        .await?;
        require_row(assignment, ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn delete_assignment(&self, scope: &Scope, id: AssignmentId) -> Result<()> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let result = sqlx::query(&scoped_delete("assignments"))
            .bind(id)
            .bind(trainer_id)
            .execute(self.pool())
            .await?;
        require_affected(result.rows_affected(), ENTITY)
    }
}
