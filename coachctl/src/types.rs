//! Common type definitions.
//!
//! All entity IDs are `BIGSERIAL` keys wrapped in type aliases so signatures say which table an
//! ID belongs to:
//!
//! - [`UserId`]: User account identifier (trainers and client accounts)
//! - [`ClientId`]: Client record identifier
//! - [`ProgramId`]: Training program identifier
//! - [`ScheduleId`]: Scheduled session identifier
//! - [`AssignmentId`]: Assignment identifier
//! - [`SessionLogId`]: Logged exercise within a session

// Type aliases for IDs
pub type UserId = i64;
pub type ClientId = i64;
pub type NoteId = i64;
pub type ProgramId = i64;
pub type ProgramExerciseId = i64;
pub type ExerciseId = i64;
pub type ScheduleId = i64;
pub type AssignmentId = i64;
pub type SessionLogId = i64;
pub type SessionLogSetId = i64;
