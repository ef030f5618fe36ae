//! PostgreSQL implementation of the program store.

use super::{PgStore, ProgramStore};
use crate::{
    db::{
        errors::Result,
        models::programs::{
            ProgramCreateDBRequest, ProgramDBResponse, ProgramExerciseCreateDBRequest, ProgramExerciseDBResponse, ProgramUpdateDBRequest,
        },
        scope::{Scope, require_affected, require_row, scoped_delete, scoped_list, scoped_select},
    },
    types::{ProgramExerciseId, ProgramId},
};
use tracing::instrument;

const PROGRAM_COLUMNS: &str = "id, trainer_id, client_id, name, description, is_template, created_at, updated_at";

const EXERCISE_COLUMNS: &str = "id, program_id, exercise_id, sets, reps, duration_seconds, rest_seconds, notes, position";

const ENTITY: &str = "Program";

#[async_trait::async_trait]
impl ProgramStore for PgStore {
    #[instrument(skip(self), err)]
    async fn list_programs(&self, scope: &Scope) -> Result<Vec<ProgramDBResponse>> {
        let sql = scoped_list("programs", PROGRAM_COLUMNS, &scope.read_filter(1), "created_at DESC, id DESC");
        let programs = sqlx::query_as::<_, ProgramDBResponse>(&sql)
            .bind(scope.caller_id)
            .fetch_all(self.pool())
            .await?;
        Ok(programs)
    }

    #[instrument(skip(self), err)]
    async fn get_program(&self, scope: &Scope, id: ProgramId) -> Result<ProgramDBResponse> {
        let sql = scoped_select("programs", PROGRAM_COLUMNS, &scope.read_filter(2));
        let program = sqlx::query_as::<_, ProgramDBResponse>(&sql)
            .bind(id)
            .bind(scope.caller_id)
            .fetch_optional(self.pool())
            .await?;
        require_row(program, ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn list_program_exercises(&self, scope: &Scope, program_id: ProgramId) -> Result<Vec<ProgramExerciseDBResponse>> {
        let sql = format!(
            "SELECT {columns} FROM program_exercises pe \
             WHERE pe.program_id = $1 \
               AND EXISTS (SELECT 1 FROM programs p WHERE p.id = $1 AND {filter}) \
             ORDER BY pe.position, pe.id",
            columns = EXERCISE_COLUMNS
                .split(", ")
                .map(|c| format!("pe.{c}"))
                .collect::<Vec<_>>()
                .join(", "),
            filter = scope.read_filter(2),
        );
        let exercises = sqlx::query_as::<_, ProgramExerciseDBResponse>(&sql)
            .bind(program_id)
            .bind(scope.caller_id)
            .fetch_all(self.pool())
            .await?;
        Ok(exercises)
    }

    #[instrument(skip(self, request), err)]
    async fn create_program(&self, scope: &Scope, request: &ProgramCreateDBRequest) -> Result<ProgramDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        // The target client, when given, must belong to the same trainer.
        let program = sqlx::query_as::<_, ProgramDBResponse>(&format!(
            "INSERT INTO programs (trainer_id, client_id, name, description, is_template) \
             SELECT $1, $2, $3, $4, $5 \
             WHERE $2::BIGINT IS NULL OR EXISTS (SELECT 1 FROM clients WHERE id = $2 AND trainer_id = $1) \
             RETURNING {PROGRAM_COLUMNS}"
        ))
        .bind(trainer_id)
        .bind(request.client_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.is_template)
        .fetch_optional(self.pool())
        .await?;
        require_row(program, "Client")
    }

    #[instrument(skip(self, request), err)]
    async fn update_program(&self, scope: &Scope, id: ProgramId, request: &ProgramUpdateDBRequest) -> Result<ProgramDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let program = sqlx::query_as::<_, ProgramDBResponse>(&format!(
            "UPDATE programs SET \
                name = COALESCE($3, name), \
                description = COALESCE($4, description), \
                is_template = COALESCE($5, is_template), \
                updated_at = NOW() \
             WHERE id = $1 AND trainer_id = $2 RETURNING {PROGRAM_COLUMNS}"
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.is_template)
        .fetch_optional(self.pool())
        .await?;
        require_row(program, ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn delete_program(&self, scope: &Scope, id: ProgramId) -> Result<()> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let result = sqlx::query(&scoped_delete("programs"))
            .bind(id)
            .bind(trainer_id)
            .execute(self.pool())
            .await?;
        require_affected(result.rows_affected(), ENTITY)
    }

    #[instrument(skip(self, request), err)]
    async fn add_program_exercise(
        &self,
        scope: &Scope,
        program_id: ProgramId,
        request: &ProgramExerciseCreateDBRequest,
    ) -> Result<ProgramExerciseDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let exercise = sqlx::query_as::<_, ProgramExerciseDBResponse>(&format!(
            "INSERT INTO program_exercises (program_id, exercise_id, sets, reps, duration_seconds, rest_seconds, notes, position) \
             SELECT $1, $3, $4, $5, $6, $7, $8, $9 \
             WHERE EXISTS (SELECT 1 FROM programs WHERE id = $1 AND trainer_id = $2) \
             RETURNING {EXERCISE_COLUMNS}"
        ))
        .bind(program_id)
        .bind(trainer_id)
        .bind(request.exercise_id)
        .bind(request.sets)
        .bind(request.reps)
        .bind(request.duration_seconds)
        .bind(request.rest_seconds)
        .bind(&request.notes)
        .bind(request.position)
        .fetch_optional(self.pool())
        .await?;
        require_row(exercise, ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn remove_program_exercise(&self, scope: &Scope, program_id: ProgramId, id: ProgramExerciseId) -> Result<()> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let result = sqlx::query(
            "DELETE FROM program_exercises pe USING programs p \
             WHERE pe.id = $1 AND pe.program_id = $2 AND p.id = pe.program_id AND p.trainer_id = $3",
        )
        .bind(id)
        .bind(program_id)
        .bind(trainer_id)
        .execute(self.pool())
        .await?;
        require_affected(result.rows_affected(), "Program exercise")
    }
}
