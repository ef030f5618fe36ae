//! Store traits: the persistence interface the API layer depends on.
//!
//! Each entity has its own trait so collaborators can ask for exactly what they need: the
//! identity resolver holds an `Arc<dyn UserStore>`, while request handlers hold the combined
//! [`Store`]. Every method on an owned entity takes the caller's [`Scope`]; there is no unscoped
//! access path for owned rows.

use crate::{
    db::{
        errors::Result,
        models::{
            assignments::{AssignmentCreateDBRequest, AssignmentDBResponse, AssignmentUpdateDBRequest},
            clients::{ClientCreateDBRequest, ClientDBResponse, ClientUpdateDBRequest, NoteCreateDBRequest, NoteDBResponse},
            dashboard::DashboardStatsDBResponse,
            programs::{
                ProgramCreateDBRequest, ProgramDBResponse, ProgramExerciseCreateDBRequest, ProgramExerciseDBResponse,
                ProgramUpdateDBRequest,
            },
            schedules::{ScheduleCreateDBRequest, ScheduleDBResponse, ScheduleUpdateDBRequest},
            sessions::{SessionLogCreateDBRequest, SessionLogDBResponse},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
        scope::Scope,
    },
    types::{AssignmentId, ClientId, ProgramExerciseId, ProgramId, ScheduleId, UserId},
};

/// Filter for listing users
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub skip: i64,
    pub limit: i64,
}

impl UserFilter {
    pub fn new(skip: i64, limit: i64) -> Self {
        Self { skip, limit }
    }
}

/// Credential store
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>>;

    async fn get_user_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>>;

    /// Fails with `UniqueViolation` when the email is taken
    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse>;

    /// Fails with `NotFound` when no user has this id
    async fn update_user(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<UserDBResponse>;

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserDBResponse>>;

    async fn count_users(&self) -> Result<i64>;

    async fn delete_user(&self, id: UserId) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait ClientStore: Send + Sync {
    async fn list_clients(&self, scope: &Scope) -> Result<Vec<ClientDBResponse>>;

    async fn get_client(&self, scope: &Scope, id: ClientId) -> Result<ClientDBResponse>;

    async fn create_client(&self, scope: &Scope, request: &ClientCreateDBRequest) -> Result<ClientDBResponse>;

    async fn update_client(&self, scope: &Scope, id: ClientId, request: &ClientUpdateDBRequest) -> Result<ClientDBResponse>;

    async fn delete_client(&self, scope: &Scope, id: ClientId) -> Result<()>;

    async fn list_client_notes(&self, scope: &Scope, client_id: ClientId) -> Result<Vec<NoteDBResponse>>;

    async fn create_client_note(&self, scope: &Scope, client_id: ClientId, request: &NoteCreateDBRequest) -> Result<NoteDBResponse>;
}

#[async_trait::async_trait]
pub trait ProgramStore: Send + Sync {
    async fn list_programs(&self, scope: &Scope) -> Result<Vec<ProgramDBResponse>>;

    async fn get_program(&self, scope: &Scope, id: ProgramId) -> Result<ProgramDBResponse>;

    /// Exercises of a program the caller can read, in position order
    async fn list_program_exercises(&self, scope: &Scope, program_id: ProgramId) -> Result<Vec<ProgramExerciseDBResponse>>;

    /// When `client_id` is set, the client must belong to the caller
    async fn create_program(&self, scope: &Scope, request: &ProgramCreateDBRequest) -> Result<ProgramDBResponse>;

    async fn update_program(&self, scope: &Scope, id: ProgramId, request: &ProgramUpdateDBRequest) -> Result<ProgramDBResponse>;

    async fn delete_program(&self, scope: &Scope, id: ProgramId) -> Result<()>;

    async fn add_program_exercise(
        &self,
        scope: &Scope,
        program_id: ProgramId,
        request: &ProgramExerciseCreateDBRequest,
    ) -> Result<ProgramExerciseDBResponse>;

    async fn remove_program_exercise(&self, scope: &Scope, program_id: ProgramId, id: ProgramExerciseId) -> Result<()>;
}

#[async_trait::async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn list_schedules(&self, scope: &Scope) -> Result<Vec<ScheduleDBResponse>>;

    async fn create_schedule(&self, scope: &Scope, request: &ScheduleCreateDBRequest) -> Result<ScheduleDBResponse>;

    async fn update_schedule(&self, scope: &Scope, id: ScheduleId, request: &ScheduleUpdateDBRequest) -> Result<ScheduleDBResponse>;

    async fn delete_schedule(&self, scope: &Scope, id: ScheduleId) -> Result<()>;
}

/// Sessions are schedule rows seen from one client record; logs hang off a session.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Sessions of a client record the caller can read, earliest first
    async fn list_client_sessions(&self, scope: &Scope, client_id: ClientId) -> Result<Vec<ScheduleDBResponse>>;

    /// Logs of a readable session, oldest first, each carrying its sets
    async fn list_session_logs(&self, scope: &Scope, schedule_id: ScheduleId) -> Result<Vec<SessionLogDBResponse>>;

    /// Only the trainer owning the session may log against it
    async fn create_session_log(
        &self,
        scope: &Scope,
        schedule_id: ScheduleId,
        request: &SessionLogCreateDBRequest,
    ) -> Result<SessionLogDBResponse>;
}

#[async_trait::async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn list_assignments(&self, scope: &Scope) -> Result<Vec<AssignmentDBResponse>>;

    async fn create_assignment(&self, scope: &Scope, request: &AssignmentCreateDBRequest) -> Result<AssignmentDBResponse>;

    async fn update_assignment(
        &self,
        scope: &Scope,
        id: AssignmentId,
        request: &AssignmentUpdateDBRequest,
    ) -> Result<AssignmentDBResponse>;

    async fn delete_assignment(&self, scope: &Scope, id: AssignmentId) -> Result<()>;
}

#[async_trait::async_trait]
pub trait DashboardStore: Send + Sync {
    async fn dashboard_stats(&self, scope: &Scope) -> Result<DashboardStatsDBResponse>;
}

/// Everything the HTTP layer needs from persistence
#[async_trait::async_trait]
pub trait Store:
    UserStore + ClientStore + ProgramStore + ScheduleStore + SessionStore + AssignmentStore + DashboardStore
{
    /// Cheap liveness check used by the health endpoint
    async fn ping(&self) -> Result<()>;
}
