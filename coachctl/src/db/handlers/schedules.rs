//! PostgreSQL implementation of the schedule store.

use super::{PgStore, ScheduleStore};
use crate::{
    db::{
        errors::Result,
        models::schedules::{ScheduleCreateDBRequest, ScheduleDBResponse, ScheduleUpdateDBRequest},
        scope::{Scope, require_affected, require_row, scoped_delete, scoped_list},
    },
    types::ScheduleId,
};
use tracing::instrument;

pub(super) const SCHEDULE_COLUMNS: &str = "id, trainer_id, client_id, title, start_time, end_time, status, created_at, updated_at";

const ENTITY: &str = "Schedule";

#[async_trait::async_trait]
impl ScheduleStore for PgStore {
    #[instrument(skip(self), err)]
    async fn list_schedules(&self, scope: &Scope) -> Result<Vec<ScheduleDBResponse>> {
        let sql = scoped_list("schedules", SCHEDULE_COLUMNS, &scope.read_filter(1), "start_time, id");
        let schedules = sqlx::query_as::<_, ScheduleDBResponse>(&sql)
            .bind(scope.caller_id)
            .fetch_all(self.pool())
            .await?;
        Ok(schedules)
    }

    #[instrument(skip(self, request), err)]
    async fn create_schedule(&self, scope: &Scope, request: &ScheduleCreateDBRequest) -> Result<ScheduleDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let schedule = sqlx::query_as::<_, ScheduleDBResponse>(&format!(
            "INSERT INTO schedules (trainer_id, client_id, title, start_time, end_time, status) \
             SELECT $1, $2, $3, $4, $5, $6 \
             WHERE EXISTS (SELECT 1 FROM clients WHERE id = $2 AND trainer_id = $1) \
             RETURNING {SCHEDULE_COLUMNS}"
        ))
        .bind(trainer_id)
        .bind(request.client_id)
        .bind(&request.title)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(&request.status)
        .fetch_optional(self.pool())
        .await?;
        require_row(schedule, "Client")
    }

    #[instrument(skip(self, request), err)]
    async fn update_schedule(&self, scope: &Scope, id: ScheduleId, request: &ScheduleUpdateDBRequest) -> Result<ScheduleDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let schedule = sqlx::query_as::<_, ScheduleDBResponse>(&format!(
            "UPDATE schedules SET \
                title = COALESCE($3, title), \
                start_time = COALESCE($4, start_time), \
                end_time = COALESCE($5, end_time), \
                status = COALESCE($6, status), \
                updated_at = NOW() \
             WHERE id = $1 AND trainer_id = $2 RETURNING {SCHEDULE_COLUMNS}"
        ))
        .bind(id)
        .bind(trainer_id)
        .bind(&request.title)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(&request.status)
        .fetch_optional(self.pool())
        .await?;
        require_row(schedule, ENTITY)
    }

    #[instrument(skip(self), err)]
    async fn delete_schedule(&self, scope: &Scope, id: ScheduleId) -> Result<()> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let result = sqlx::query(&scoped_delete("schedules"))
            .bind(id)
            .bind(trainer_id)
            .execute(self.pool())
            .await?;
        require_affected(result.rows_affected(), ENTITY)
    }
}
