//! API response model for dashboard statistics.

use crate::db::models::dashboard::DashboardStatsDBResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_clients: i64,
    pub active_programs: i64,
    pub upcoming_sessions: i64,
}

impl From<DashboardStatsDBResponse> for DashboardStats {
    fn from(db: DashboardStatsDBResponse) -> Self {
        Self {
            total_clients: db.total_clients,
            active_programs: db.active_programs,
            upcoming_sessions: db.upcoming_sessions,
        }
    }
}
