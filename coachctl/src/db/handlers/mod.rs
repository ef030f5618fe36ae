//! Store implementations.
//!
//! [`store`] defines the traits; this module's siblings implement them for [`PgStore`] one
//! entity per file. The in-process implementation lives in [`crate::db::memory`].

pub mod assignments;
pub mod clients;
pub mod dashboard;
pub mod programs;
pub mod schedules;
pub mod sessions;
pub mod store;
pub mod users;

pub use store::{
    AssignmentStore, ClientStore, DashboardStore, ProgramStore, ScheduleStore, SessionStore, Store, UserFilter, UserStore,
};

use crate::db::errors::Result;
use sqlx::PgPool;

/// PostgreSQL-backed store. Every scoped operation is a single statement, except session logs,
/// which insert a log and its sets in one transaction.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
