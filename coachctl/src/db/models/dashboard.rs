//! Aggregate counts for the dashboard.

use sqlx::FromRow;

/// Counts over the caller's ownership scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, FromRow)]
pub struct DashboardStatsDBResponse {
    pub total_clients: i64,
    pub active_programs: i64,
    pub upcoming_sessions: i64,
}
