//! PostgreSQL implementation of the session store.

use std::collections::HashMap;

use super::{ClientStore, PgStore, SessionStore, schedules::SCHEDULE_COLUMNS};
use crate::{
    db::{
        errors::Result,
        models::{
            schedules::ScheduleDBResponse,
            sessions::{SessionLogCreateDBRequest, SessionLogDBResponse, SessionLogSetDBResponse},
        },
        scope::{Scope, require_row, scoped_select},
    },
    types::{ClientId, ScheduleId, SessionLogId},
};
use tracing::instrument;

const LOG_COLUMNS: &str = "id, schedule_id, trainer_id, exercise_id, notes, created_at";

const SET_COLUMNS: &str = "id, session_log_id, set_number, weight_kg, reps, rpe";

const ENTITY: &str = "Schedule";

#[async_trait::async_trait]
impl SessionStore for PgStore {
    #[instrument(skip(self), err)]
    async fn list_client_sessions(&self, scope: &Scope, client_id: ClientId) -> Result<Vec<ScheduleDBResponse>> {
        // An unreadable client is rejected rather than reported as having no sessions.
        self.get_client(scope, client_id).await?;
        let sessions = sqlx::query_as::<_, ScheduleDBResponse>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE client_id = $1 AND {} ORDER BY start_time, id",
            scope.read_filter(2)
        ))
        .bind(client_id)
        .bind(scope.caller_id)
        .fetch_all(self.pool())
        .await?;
        Ok(sessions)
    }

    #[instrument(skip(self), err)]
    async fn list_session_logs(&self, scope: &Scope, schedule_id: ScheduleId) -> Result<Vec<SessionLogDBResponse>> {
        let visible = sqlx::query_scalar::<_, i64>(&scoped_select("schedules", "id", &scope.read_filter(2)))
            .bind(schedule_id)
            .bind(scope.caller_id)
            .fetch_optional(self.pool())
            .await?;
        require_row(visible, ENTITY)?;

        let mut logs = sqlx::query_as::<_, SessionLogDBResponse>(&format!(
            "SELECT {LOG_COLUMNS} FROM session_logs WHERE schedule_id = $1 ORDER BY created_at, id"
        ))
        .bind(schedule_id)
        .fetch_all(self.pool())
        .await?;

        let ids: Vec<SessionLogId> = logs.iter().map(|log| log.id).collect();
        let sets = sqlx::query_as::<_, SessionLogSetDBResponse>(&format!(
            "SELECT {SET_COLUMNS} FROM session_log_sets WHERE session_log_id = ANY($1) ORDER BY set_number, id"
        ))
        .bind(&ids)
        .fetch_all(self.pool())
        .await?;

        let mut by_log: HashMap<SessionLogId, Vec<SessionLogSetDBResponse>> = HashMap::new();
        for set in sets {
            by_log.entry(set.session_log_id).or_default().push(set);
        }
        for log in &mut logs {
            log.sets = by_log.remove(&log.id).unwrap_or_default();
        }
        Ok(logs)
    }

    #[instrument(skip(self, request), err)]
    async fn create_session_log(
        &self,
        scope: &Scope,
        schedule_id: ScheduleId,
        request: &SessionLogCreateDBRequest,
    ) -> Result<SessionLogDBResponse> {
        let trainer_id = scope.trainer_id(ENTITY)?;
        let mut tx = self.pool().begin().await?;

        let log = sqlx::query_as::<_, SessionLogDBResponse>(&format!(
            "INSERT INTO session_logs (schedule_id, trainer_id, exercise_id, notes) \
             SELECT $1, $2, $3, $4 \
             WHERE EXISTS (SELECT 1 FROM schedules WHERE id = $1 AND trainer_id = $2) \
             RETURNING {LOG_COLUMNS}"
        ))
        .bind(schedule_id)
        .bind(trainer_id)
        .bind(request.exercise_id)
        .bind(&request.notes)
        .fetch_optional(&mut *tx)
        .await?;
        let mut log = require_row(log, ENTITY)?;

        for set in &request.sets {
            let row = sqlx::query_as::<_, SessionLogSetDBResponse>(&format!(
                "INSERT INTO session_log_sets (session_log_id, set_number, weight_kg, reps, rpe) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING {SET_COLUMNS}"
            ))
            .bind(log.id)
            .bind(set.set_number)
            .bind(set.weight_kg)
            .bind(set.reps)
            .bind(set.rpe)
            .fetch_one(&mut *tx)
            .await?;
            log.sets.push(row);
        }

        tx.commit().await?;
        log.sets.sort_by_key(|set| (set.set_number, set.id));
        Ok(log)
    }
}
