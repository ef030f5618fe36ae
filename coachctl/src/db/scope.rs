//! Ownership scoping for persistence operations.
//!
//! Every read or write of an owned row carries a [`Scope`] built from the authenticated caller.
//! The row id and the caller id are checked together: in SQL they share one `WHERE` clause, in
//! the memory store they are compared under the row's lock. A row that is missing and a row that
//! belongs to someone else both come back as [`DbError::OutOfScope`], so callers cannot probe
//! for the existence of other trainers' data.
//!
//! Trainers own rows through `trainer_id`. A client record may be linked to a client-role
//! account through `clients.user_id`; that account reads the rows whose `client_id` points at a
//! record linked to it. Writes are always trainer-scoped.

use std::collections::HashSet;

use crate::{
    api::models::users::{CurrentUser, Role},
    db::errors::{DbError, Result},
    types::{ClientId, UserId},
};

/// The caller on whose behalf a persistence operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub caller_id: UserId,
    pub role: Role,
}

impl Scope {
    pub fn new(caller_id: UserId, role: Role) -> Self {
        Self { caller_id, role }
    }

    /// SQL predicate restricting a table with `trainer_id` and `client_id` columns to the rows
    /// this scope may read. The caller id is bound as `$param`.
    pub(crate) fn read_filter(&self, param: usize) -> String {
        match self.role {
            Role::Trainer => format!("trainer_id = ${param}"),
            Role::Client => format!("client_id IN (SELECT id FROM clients WHERE user_id = ${param})"),
        }
    }

    /// SQL predicate restricting the `clients` table itself, caller bound as `$param`
    pub(crate) fn client_record_filter(&self, param: usize) -> String {
        match self.role {
            Role::Trainer => format!("trainer_id = ${param}"),
            Role::Client => format!("user_id = ${param}"),
        }
    }

    /// The trainer id to write under. Client-role callers own nothing and get `OutOfScope`.
    pub fn trainer_id(&self, entity: &'static str) -> Result<UserId> {
        match self.role {
            Role::Trainer => Ok(self.caller_id),
            Role::Client => Err(DbError::OutOfScope { entity }),
        }
    }

    /// Role-keyed read predicate for stores that filter rows in memory. `linked` holds the
    /// client records whose account is the caller; it is empty for trainers.
    pub fn can_read(&self, trainer_id: UserId, client_id: Option<ClientId>, linked: &HashSet<ClientId>) -> bool {
        match self.role {
            Role::Trainer => trainer_id == self.caller_id,
            Role::Client => client_id.is_some_and(|id| linked.contains(&id)),
        }
    }

    /// Whether this scope may read a client record owned by `trainer_id` and linked to `user_id`
    pub fn can_read_client(&self, trainer_id: UserId, user_id: Option<UserId>) -> bool {
        match self.role {
            Role::Trainer => trainer_id == self.caller_id,
            Role::Client => user_id == Some(self.caller_id),
        }
    }

    /// Write predicate: only the owning trainer may modify a row
    pub fn can_write(&self, trainer_id: UserId) -> bool {
        self.role == Role::Trainer && trainer_id == self.caller_id
    }
}

impl From<&CurrentUser> for Scope {
    fn from(user: &CurrentUser) -> Self {
        Self::new(user.id, user.role)
    }
}

/// Translate an absent row from a scoped query into `OutOfScope`
pub fn require_row<T>(row: Option<T>, entity: &'static str) -> Result<T> {
    row.ok_or(DbError::OutOfScope { entity })
}

/// Translate a zero-row scoped mutation into `OutOfScope`
pub fn require_affected(rows_affected: u64, entity: &'static str) -> Result<()> {
    if rows_affected == 0 {
        Err(DbError::OutOfScope { entity })
    } else {
        Ok(())
    }
}

/// `SELECT` of one row by id bound as `$1`, restricted by `filter`
pub(crate) fn scoped_select(table: &str, columns: &str, filter: &str) -> String {
    format!("SELECT {columns} FROM {table} WHERE id = $1 AND {filter}")
}

/// `SELECT` of every row matching `filter`
pub(crate) fn scoped_list(table: &str, columns: &str, filter: &str, order_by: &str) -> String {
    format!("SELECT {columns} FROM {table} WHERE {filter} ORDER BY {order_by}")
}

/// `DELETE` of one trainer-owned row by id
pub(crate) fn scoped_delete(table: &str) -> String {
    format!("DELETE FROM {table} WHERE id = $1 AND trainer_id = $2")
}
