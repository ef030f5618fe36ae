//! PostgreSQL implementation of the dashboard counts.

use super::{DashboardStore, PgStore};
use crate::{
    api::models::users::Role,
    db::{errors::Result, models::dashboard::DashboardStatsDBResponse, scope::Scope},
};
use tracing::instrument;

const TRAINER_STATS: &str = "SELECT \
    (SELECT COUNT(*) FROM clients WHERE trainer_id = $1) AS total_clients, \
    (SELECT COUNT(*) FROM programs WHERE trainer_id = $1 AND NOT is_template) AS active_programs, \
    (SELECT COUNT(*) FROM schedules WHERE trainer_id = $1 AND status = 'scheduled' AND start_time > NOW()) AS upcoming_sessions";

// Client accounts reach rows through the client records linked to them.
const CLIENT_STATS: &str = "SELECT \
    0::BIGINT AS total_clients, \
    (SELECT COUNT(*) FROM programs \
        WHERE client_id IN (SELECT id FROM clients WHERE user_id = $1) AND NOT is_template) AS active_programs, \
    (SELECT COUNT(*) FROM schedules \
        WHERE client_id IN (SELECT id FROM clients WHERE user_id = $1) AND status = 'scheduled' AND start_time > NOW()) \
        AS upcoming_sessions";

#[async_trait::async_trait]
impl DashboardStore for PgStore {
    #[instrument(skip(self), err)]
    async fn dashboard_stats(&self, scope: &Scope) -> Result<DashboardStatsDBResponse> {
        let sql = match scope.role {
            Role::Trainer => TRAINER_STATS,
            Role::Client => CLIENT_STATS,
        };
        let stats = sqlx::query_as::<_, DashboardStatsDBResponse>(sql)
            .bind(scope.caller_id)
            .fetch_one(self.pool())
            .await?;
        Ok(stats)
    }
}
