//! In-process store.
//!
//! Backs the test suite and `database.type: memory`. Tables are `DashMap`s keyed by id; scoped
//! mutations check ownership and apply the change while holding the row's shard lock, so the
//! check and the write cannot interleave with another request. Inserts under a parent row hold
//! the parent's guard across the insert. Email uniqueness is enforced through the `emails` index
//! entry API. Check constraints of the relational schema are mirrored as `CheckViolation`.

use std::{
    collections::HashSet,
    sync::atomic::{AtomicI64, Ordering},
};

use chrono::{DateTime, Utc};
use dashmap::{
    DashMap,
    mapref::{entry::Entry, one::Ref},
};

use crate::{
    api::models::users::Role,
    db::{
        errors::{DbError, Result},
        handlers::{
            AssignmentStore, ClientStore, DashboardStore, ProgramStore, ScheduleStore, SessionStore, Store, UserFilter, UserStore,
        },
        models::{
            assignments::{AssignmentCreateDBRequest, AssignmentDBResponse, AssignmentUpdateDBRequest},
            clients::{ClientCreateDBRequest, ClientDBResponse, ClientUpdateDBRequest, NoteCreateDBRequest, NoteDBResponse},
            dashboard::DashboardStatsDBResponse,
            programs::{
                ProgramCreateDBRequest, ProgramDBResponse, ProgramExerciseCreateDBRequest, ProgramExerciseDBResponse,
                ProgramUpdateDBRequest,
            },
            schedules::{ScheduleCreateDBRequest, ScheduleDBResponse, ScheduleUpdateDBRequest},
            sessions::{SessionLogCreateDBRequest, SessionLogDBResponse, SessionLogSetCreateDBRequest, SessionLogSetDBResponse},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
        scope::{Scope, require_row},
    },
    types::{AssignmentId, ClientId, NoteId, ProgramExerciseId, ProgramId, ScheduleId, SessionLogId, UserId},
};

#[derive(Debug)]
pub struct MemoryStore {
    next_id: AtomicI64,
    users: DashMap<UserId, UserDBResponse>,
    emails: DashMap<String, UserId>,
    clients: DashMap<ClientId, ClientDBResponse>,
    notes: DashMap<NoteId, NoteDBResponse>,
    programs: DashMap<ProgramId, ProgramDBResponse>,
    exercises: DashMap<ProgramExerciseId, ProgramExerciseDBResponse>,
    schedules: DashMap<ScheduleId, ScheduleDBResponse>,
    assignments: DashMap<AssignmentId, AssignmentDBResponse>,
    session_logs: DashMap<SessionLogId, SessionLogDBResponse>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            users: DashMap::new(),
            emails: DashMap::new(),
            clients: DashMap::new(),
            notes: DashMap::new(),
            programs: DashMap::new(),
            exercises: DashMap::new(),
            schedules: DashMap::new(),
            assignments: DashMap::new(),
            session_logs: DashMap::new(),
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Guard on a client record owned by `trainer_id`. Holding it blocks a concurrent delete.
    fn owned_client(&self, trainer_id: UserId, client_id: ClientId) -> Result<Ref<'_, ClientId, ClientDBResponse>> {
        require_row(self.clients.get(&client_id).filter(|c| c.trainer_id == trainer_id), CLIENT)
    }

    /// Client records linked to the caller's account. Collected before any other table is
    /// iterated so no two shard locks are held at once.
    fn linked_clients(&self, scope: &Scope) -> HashSet<ClientId> {
        match scope.role {
            Role::Trainer => HashSet::new(),
            Role::Client => self
                .clients
                .iter()
                .filter(|c| c.user_id == Some(scope.caller_id))
                .map(|c| c.id)
                .collect(),
        }
    }

    fn can_read_program(&self, scope: &Scope, program_id: ProgramId) -> bool {
        let linked = self.linked_clients(scope);
        self.programs
            .get(&program_id)
            .is_some_and(|p| scope.can_read(p.trainer_id, p.client_id, &linked))
    }

    fn can_read_schedule(&self, scope: &Scope, schedule_id: ScheduleId) -> bool {
        let linked = self.linked_clients(scope);
        self.schedules
            .get(&schedule_id)
            .is_some_and(|s| scope.can_read(s.trainer_id, Some(s.client_id), &linked))
    }

    /// A client record may only be linked to an existing client-role account
    fn ensure_client_account(&self, user_id: Option<UserId>) -> Result<()> {
        let Some(id) = user_id else {
            return Ok(());
        };
        let linkable = self.users.get(&id).is_some_and(|u| u.role == Role::Client);
        if linkable { Ok(()) } else { Err(DbError::OutOfScope { entity: "User" }) }
    }
}

fn check_violation(constraint: &str, table: &str) -> DbError {
    DbError::CheckViolation {
        constraint: Some(constraint.to_string()),
        table: Some(table.to_string()),
        message: format!("new row for relation \"{table}\" violates check constraint \"{constraint}\""),
    }
}

fn check_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if end > start {
        Ok(())
    } else {
        Err(check_violation("schedules_time_range_check", "schedules"))
    }
}

fn check_set(set: &SessionLogSetCreateDBRequest) -> Result<()> {
    if set.set_number <= 0 || set.reps < 0 || set.weight_kg < 0.0 {
        return Err(check_violation("session_log_sets_values_check", "session_log_sets"));
    }
    if set.rpe.is_some_and(|rpe| !(1..=10).contains(&rpe)) {
        return Err(check_violation("session_log_sets_rpe_check", "session_log_sets"));
    }
    Ok(())
}

fn sorted<T: Clone, K: Ord>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> K) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by_key(|row| key(row));
    rows
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<UserDBResponse>> {
        let id = self.emails.get(email).map(|id| *id);
        Ok(id.and_then(|id| self.users.get(&id).map(|u| u.clone())))
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<Option<UserDBResponse>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn create_user(&self, request: &UserCreateDBRequest) -> Result<UserDBResponse> {
        match self.emails.entry(request.email.clone()) {
            Entry::Occupied(_) => Err(DbError::UniqueViolation {
                constraint: Some("users_email_key".to_string()),
                table: Some("users".to_string()),
                message: format!("duplicate key value violates unique constraint \"users_email_key\" ({})", request.email),
            }),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let user = UserDBResponse {
                    id: self.next_id(),
                    name: request.name.clone(),
                    email: request.email.clone(),
                    password_hash: request.password_hash.clone(),
                    role: request.role,
                    avatar_url: None,
                    created_at: now,
                    updated_at: now,
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn update_user(&self, id: UserId, request: &UserUpdateDBRequest) -> Result<UserDBResponse> {
        let mut user = self.users.get_mut(&id).ok_or(DbError::NotFound)?;
        if let Some(name) = &request.name {
            user.name = name.clone();
        }
        if let Some(avatar_url) = &request.avatar_url {
            user.avatar_url = Some(avatar_url.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_users(&self, filter: &UserFilter) -> Result<Vec<UserDBResponse>> {
        let users = sorted(self.users.iter().map(|u| u.clone()), |u| u.id);
        Ok(users
            .into_iter()
            .skip(filter.skip.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    async fn count_users(&self) -> Result<i64> {
        Ok(self.users.len() as i64)
    }

    async fn delete_user(&self, id: UserId) -> Result<bool> {
        match self.users.remove(&id) {
            Some((_, user)) => {
                self.emails.remove(&user.email);
                for mut client in self.clients.iter_mut() {
                    if client.user_id == Some(id) {
                        client.user_id = None;
                    }
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

const CLIENT: &str = "Client";
const PROGRAM: &str = "Program";
const SCHEDULE: &str = "Schedule";
const ASSIGNMENT: &str = "Assignment";

#[async_trait::async_trait]
impl ClientStore for MemoryStore {
    async fn list_clients(&self, scope: &Scope) -> Result<Vec<ClientDBResponse>> {
        Ok(sorted(
            self.clients
                .iter()
                .filter(|c| scope.can_read_client(c.trainer_id, c.user_id))
                .map(|c| c.clone()),
            |c| (c.name.clone(), c.id),
        ))
    }

    async fn get_client(&self, scope: &Scope, id: ClientId) -> Result<ClientDBResponse> {
        let client = self
            .clients
            .get(&id)
            .filter(|c| scope.can_read_client(c.trainer_id, c.user_id))
            .map(|c| c.clone());
        require_row(client, CLIENT)
    }

    async fn create_client(&self, scope: &Scope, request: &ClientCreateDBRequest) -> Result<ClientDBResponse> {
        let trainer_id = scope.trainer_id(CLIENT)?;
        self.ensure_client_account(request.user_id)?;
        let now = Utc::now();
        let client = ClientDBResponse {
            id: self.next_id(),
            trainer_id,
            user_id: request.user_id,
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            avatar_url: request.avatar_url.clone(),
            birth_date: request.birth_date,
            gender: request.gender.clone(),
            height_cm: request.height_cm,
            weight_kg: request.weight_kg,
            goal: request.goal.clone(),
            injuries: request.injuries.clone(),
            activity_level: request.activity_level.clone(),
            medical_conditions: request.medical_conditions.clone(),
            created_at: now,
            updated_at: now,
        };
        self.clients.insert(client.id, client.clone());
        Ok(client)
    }

    async fn update_client(&self, scope: &Scope, id: ClientId, request: &ClientUpdateDBRequest) -> Result<ClientDBResponse> {
        let trainer_id = scope.trainer_id(CLIENT)?;
        self.ensure_client_account(request.user_id)?;
        let mut client = require_row(self.clients.get_mut(&id).filter(|c| c.trainer_id == trainer_id), CLIENT)?;

        fn apply<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                target.clone_from(value);
            }
        }

        if let Some(name) = &request.name {
            client.name = name.clone();
        }
        apply(&mut client.user_id, &request.user_id);
        apply(&mut client.email, &request.email);
        apply(&mut client.phone, &request.phone);
        apply(&mut client.avatar_url, &request.avatar_url);
        apply(&mut client.birth_date, &request.birth_date);
        apply(&mut client.gender, &request.gender);
        apply(&mut client.height_cm, &request.height_cm);
        apply(&mut client.weight_kg, &request.weight_kg);
        apply(&mut client.goal, &request.goal);
        apply(&mut client.injuries, &request.injuries);
        apply(&mut client.activity_level, &request.activity_level);
        apply(&mut client.medical_conditions, &request.medical_conditions);
        client.updated_at = Utc::now();
        Ok(client.clone())
    }

    async fn delete_client(&self, scope: &Scope, id: ClientId) -> Result<()> {
        let trainer_id = scope.trainer_id(CLIENT)?;
        require_row(self.clients.remove_if(&id, |_, c| c.trainer_id == trainer_id), CLIENT)?;
        // Mirror the ON DELETE behaviour of the relational schema.
        self.notes.retain(|_, n| n.client_id != id);
        let mut removed = HashSet::new();
        self.schedules.retain(|schedule_id, s| {
            if s.client_id == id {
                removed.insert(*schedule_id);
                false
            } else {
                true
            }
        });
        self.session_logs.retain(|_, l| !removed.contains(&l.schedule_id));
        self.assignments.retain(|_, a| a.client_id != id);
        for mut program in self.programs.iter_mut() {
            if program.client_id == Some(id) {
                program.client_id = None;
            }
        }
        Ok(())
    }

    async fn list_client_notes(&self, scope: &Scope, client_id: ClientId) -> Result<Vec<NoteDBResponse>> {
        let trainer_id = scope.trainer_id(CLIENT)?;
        self.owned_client(trainer_id, client_id)?;
        let mut notes = sorted(
            self.notes
                .iter()
                .filter(|n| n.client_id == client_id && n.trainer_id == trainer_id)
                .map(|n| n.clone()),
            |n| (n.created_at, n.id),
        );
        notes.reverse();
        Ok(notes)
    }

    async fn create_client_note(&self, scope: &Scope, client_id: ClientId, request: &NoteCreateDBRequest) -> Result<NoteDBResponse> {
        let trainer_id = scope.trainer_id(CLIENT)?;
        let _client = self.owned_client(trainer_id, client_id)?;
        let note = NoteDBResponse {
            id: self.next_id(),
            client_id,
            trainer_id,
            content: request.content.clone(),
            note_type: request.note_type.clone(),
            created_by: request.created_by.clone(),
            created_at: Utc::now(),
        };
        self.notes.insert(note.id, note.clone());
        Ok(note)
    }
}

#[async_trait::async_trait]
impl ProgramStore for MemoryStore {
    async fn list_programs(&self, scope: &Scope) -> Result<Vec<ProgramDBResponse>> {
        let linked = self.linked_clients(scope);
        let mut programs = sorted(
            self.programs
                .iter()
                .filter(|p| scope.can_read(p.trainer_id, p.client_id, &linked))
                .map(|p| p.clone()),
            |p| (p.created_at, p.id),
        );
        programs.reverse();
        Ok(programs)
    }

    async fn get_program(&self, scope: &Scope, id: ProgramId) -> Result<ProgramDBResponse> {
        let linked = self.linked_clients(scope);
        let program = self
            .programs
            .get(&id)
            .filter(|p| scope.can_read(p.trainer_id, p.client_id, &linked))
            .map(|p| p.clone());
        require_row(program, PROGRAM)
    }

    async fn list_program_exercises(&self, scope: &Scope, program_id: ProgramId) -> Result<Vec<ProgramExerciseDBResponse>> {
        if !self.can_read_program(scope, program_id) {
            return Ok(Vec::new());
        }
        Ok(sorted(
            self.exercises.iter().filter(|e| e.program_id == program_id).map(|e| e.clone()),
            |e| (e.position, e.id),
        ))
    }

    async fn create_program(&self, scope: &Scope, request: &ProgramCreateDBRequest) -> Result<ProgramDBResponse> {
        let trainer_id = scope.trainer_id(PROGRAM)?;
        let _client = request
            .client_id
            .map(|client_id| self.owned_client(trainer_id, client_id))
            .transpose()?;
        let now = Utc::now();
        let program = ProgramDBResponse {
            id: self.next_id(),
            trainer_id,
            client_id: request.client_id,
            name: request.name.clone(),
            description: request.description.clone(),
            is_template: request.is_template,
            created_at: now,
            updated_at: now,
        };
        self.programs.insert(program.id, program.clone());
        Ok(program)
    }

    async fn update_program(&self, scope: &Scope, id: ProgramId, request: &ProgramUpdateDBRequest) -> Result<ProgramDBResponse> {
        let trainer_id = scope.trainer_id(PROGRAM)?;
        let mut program = require_row(self.programs.get_mut(&id).filter(|p| p.trainer_id == trainer_id), PROGRAM)?;
        if let Some(name) = &request.name {
            program.name = name.clone();
        }
        if let Some(description) = &request.description {
            program.description = description.clone();
        }
        if let Some(is_template) = request.is_template {
            program.is_template = is_template;
        }
        program.updated_at = Utc::now();
        Ok(program.clone())
    }

    async fn delete_program(&self, scope: &Scope, id: ProgramId) -> Result<()> {
        let trainer_id = scope.trainer_id(PROGRAM)?;
        require_row(self.programs.remove_if(&id, |_, p| p.trainer_id == trainer_id), PROGRAM)?;
        self.exercises.retain(|_, e| e.program_id != id);
        Ok(())
    }

    async fn add_program_exercise(
        &self,
        scope: &Scope,
        program_id: ProgramId,
        request: &ProgramExerciseCreateDBRequest,
    ) -> Result<ProgramExerciseDBResponse> {
        let trainer_id = scope.trainer_id(PROGRAM)?;
        // Hold the program row while inserting so a concurrent delete cannot orphan the exercise.
        let _program = require_row(self.programs.get(&program_id).filter(|p| p.trainer_id == trainer_id), PROGRAM)?;
        let exercise = ProgramExerciseDBResponse {
            id: self.next_id(),
            program_id,
            exercise_id: request.exercise_id,
            sets: request.sets,
            reps: request.reps,
            duration_seconds: request.duration_seconds,
            rest_seconds: request.rest_seconds,
            notes: request.notes.clone(),
            position: request.position,
        };
        self.exercises.insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    async fn remove_program_exercise(&self, scope: &Scope, program_id: ProgramId, id: ProgramExerciseId) -> Result<()> {
        let trainer_id = scope.trainer_id(PROGRAM)?;
        let _program = require_row(self.programs.get(&program_id).filter(|p| p.trainer_id == trainer_id), PROGRAM)?;
        require_row(self.exercises.remove_if(&id, |_, e| e.program_id == program_id), "Program exercise")?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ScheduleStore for MemoryStore {
    async fn list_schedules(&self, scope: &Scope) -> Result<Vec<ScheduleDBResponse>> {
        let linked = self.linked_clients(scope);
        Ok(sorted(
            self.schedules
                .iter()
                .filter(|s| scope.can_read(s.trainer_id, Some(s.client_id), &linked))
                .map(|s| s.clone()),
            |s| (s.start_time, s.id),
        ))
    }

    async fn create_schedule(&self, scope: &Scope, request: &ScheduleCreateDBRequest) -> Result<ScheduleDBResponse> {
        let trainer_id = scope.trainer_id(SCHEDULE)?;
        let _client = self.owned_client(trainer_id, request.client_id)?;
        check_time_range(request.start_time, request.end_time)?;
        let now = Utc::now();
        let schedule = ScheduleDBResponse {
            id: self.next_id(),
            trainer_id,
            client_id: request.client_id,
            title: request.title.clone(),
            start_time: request.start_time,
            end_time: request.end_time,
            status: request.status.clone(),
            created_at: now,
            updated_at: now,
        };
        self.schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn update_schedule(&self, scope: &Scope, id: ScheduleId, request: &ScheduleUpdateDBRequest) -> Result<ScheduleDBResponse> {
        let trainer_id = scope.trainer_id(SCHEDULE)?;
        let mut schedule = require_row(self.schedules.get_mut(&id).filter(|s| s.trainer_id == trainer_id), SCHEDULE)?;
        let start_time = request.start_time.unwrap_or(schedule.start_time);
        let end_time = request.end_time.unwrap_or(schedule.end_time);
        check_time_range(start_time, end_time)?;

        if let Some(title) = &request.title {
            schedule.title = title.clone();
        }
        schedule.start_time = start_time;
        schedule.end_time = end_time;
        if let Some(status) = &request.status {
            schedule.status = status.clone();
        }
        schedule.updated_at = Utc::now();
        Ok(schedule.clone())
    }

    async fn delete_schedule(&self, scope: &Scope, id: ScheduleId) -> Result<()> {
        let trainer_id = scope.trainer_id(SCHEDULE)?;
        require_row(self.schedules.remove_if(&id, |_, s| s.trainer_id == trainer_id), SCHEDULE)?;
        self.session_logs.retain(|_, l| l.schedule_id != id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn list_client_sessions(&self, scope: &Scope, client_id: ClientId) -> Result<Vec<ScheduleDBResponse>> {
        self.get_client(scope, client_id).await?;
        let linked = self.linked_clients(scope);
        Ok(sorted(
            self.schedules
                .iter()
                .filter(|s| s.client_id == client_id && scope.can_read(s.trainer_id, Some(s.client_id), &linked))
                .map(|s| s.clone()),
            |s| (s.start_time, s.id),
        ))
    }

    async fn list_session_logs(&self, scope: &Scope, schedule_id: ScheduleId) -> Result<Vec<SessionLogDBResponse>> {
        if !self.can_read_schedule(scope, schedule_id) {
            return Err(DbError::OutOfScope { entity: SCHEDULE });
        }
        Ok(sorted(
            self.session_logs
                .iter()
                .filter(|l| l.schedule_id == schedule_id)
                .map(|l| l.clone()),
            |l| (l.created_at, l.id),
        ))
    }

    async fn create_session_log(
        &self,
        scope: &Scope,
        schedule_id: ScheduleId,
        request: &SessionLogCreateDBRequest,
    ) -> Result<SessionLogDBResponse> {
        let trainer_id = scope.trainer_id(SCHEDULE)?;
        let _schedule = require_row(
            self.schedules.get(&schedule_id).filter(|s| s.trainer_id == trainer_id),
            SCHEDULE,
        )?;
        request.sets.iter().try_for_each(check_set)?;

        let id = self.next_id();
        let mut sets: Vec<SessionLogSetDBResponse> = request
            .sets
            .iter()
            .map(|set| SessionLogSetDBResponse {
                id: self.next_id(),
                session_log_id: id,
                set_number: set.set_number,
                weight_kg: set.weight_kg,
                reps: set.reps,
                rpe: set.rpe,
            })
            .collect();
        sets.sort_by_key(|set| (set.set_number, set.id));

        let log = SessionLogDBResponse {
            id,
            schedule_id,
            trainer_id,
            exercise_id: request.exercise_id,
            notes: request.notes.clone(),
            created_at: Utc::now(),
            sets,
        };
        self.session_logs.insert(log.id, log.clone());
        Ok(log)
    }
}

#[async_trait::async_trait]
impl AssignmentStore for MemoryStore {
    async fn list_assignments(&self, scope: &Scope) -> Result<Vec<AssignmentDBResponse>> {
        let linked = self.linked_clients(scope);
        Ok(sorted(
            self.assignments
                .iter()
                .filter(|a| scope.can_read(a.trainer_id, Some(a.client_id), &linked))
                .map(|a| a.clone()),
            |a| (a.due_date.is_none(), a.due_date, a.id),
        ))
    }

    async fn create_assignment(&self, scope: &Scope, request: &AssignmentCreateDBRequest) -> Result<AssignmentDBResponse> {
        let trainer_id = scope.trainer_id(ASSIGNMENT)?;
        let _client = self.owned_client(trainer_id, request.client_id)?;
        let now = Utc::now();
        let assignment = AssignmentDBResponse {
            id: self.next_id(),
            trainer_id,
            client_id: request.client_id,
            title: request.title.clone(),
            description: request.description.clone(),
            due_date: request.due_date,
            status: request.status.clone(),
            created_at: now,
            updated_at: now,
        };
        self.assignments.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn update_assignment(
        &self,
        scope: &Scope,
        id: AssignmentId,
        request: &AssignmentUpdateDBRequest,
    ) -> Result<AssignmentDBResponse> {
        let trainer_id = scope.trainer_id(ASSIGNMENT)?;
        let mut assignment = require_row(self.assignments.get_mut(&id).filter(|a| a.trainer_id == trainer_id), ASSIGNMENT)?;
        if let Some(title) = &request.title {
            assignment.title = title.clone();
        }
        if let Some(description) = &request.description {
            assignment.description = description.clone();
        }
        if request.due_date.is_some() {
            assignment.due_date = request.due_date;
        }
        if let Some(status) = &request.status {
            assignment.status = status.clone();
        }
        assignment.updated_at = Utc::now();
        Ok(assignment.clone())
    }

    async fn delete_assignment(&self, scope: &Scope, id: AssignmentId) -> Result<()> {
        let trainer_id = scope.trainer_id(ASSIGNMENT)?;
        require_row(self.assignments.remove_if(&id, |_, a| a.trainer_id == trainer_id), ASSIGNMENT)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DashboardStore for MemoryStore {
    async fn dashboard_stats(&self, scope: &Scope) -> Result<DashboardStatsDBResponse> {
        let now = Utc::now();
        let linked = self.linked_clients(scope);
        let total_clients = match scope.role {
            Role::Trainer => self.clients.iter().filter(|c| c.trainer_id == scope.caller_id).count(),
            Role::Client => 0,
        };
        let active_programs = self
            .programs
            .iter()
            .filter(|p| !p.is_template && scope.can_read(p.trainer_id, p.client_id, &linked))
            .count();
        let upcoming_sessions = self
            .schedules
            .iter()
            .filter(|s| s.status == "scheduled" && s.start_time > now)
            .filter(|s| scope.can_read(s.trainer_id, Some(s.client_id), &linked))
            .count();

        Ok(DashboardStatsDBResponse {
            total_clients: total_clients as i64,
            active_programs: active_programs as i64,
            upcoming_sessions: upcoming_sessions as i64,
        })
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
