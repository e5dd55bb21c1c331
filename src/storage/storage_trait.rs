//! Storage Trait
//!
//! This module defines the `Storage` trait, which provides an interface for
//! session directory backends.
//!
//! Implementors of this trait are responsible for:
//! - Persisting new session records under a unique key
//! - Point lookup and filtered enumeration of records
//! - Applying record mutations atomically with respect to concurrent
//!   writers of the same record
//! - Unconditional bulk removal
//!
//! All methods return a `Result` to handle potential storage errors.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error_handling::types::StorageError;
use crate::session_management::session::{Session, SessionUpdate};
use crate::session_management::session_id::SessionId;
use crate::storage::types::SessionFilter;

/// The `Storage` trait defines the interface for session directory backends.
///
/// Mutating methods must be atomic per record: two concurrent writers to
/// the same session id may interleave, but neither write may be silently
/// lost, and a status guard must be checked in the same atomic step as the
/// write it guards. Mutations of different records must not serialize
/// behind a process-wide lock.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persists a new session record.
    ///
    /// Fails with `DuplicateId` if the key already exists; practically
    /// unreachable given generator uniqueness, but enforced regardless.
    async fn insert_session(&self, session: &Session) -> Result<(), StorageError>;

    /// Retrieves one record, or fails with `NotFound`.
    async fn get_session(&self, id: SessionId) -> Result<Session, StorageError>;

    /// Retrieves records, optionally filtered. An empty directory (or a
    /// filter matching nothing) yields an empty vector, not an error.
    async fn get_sessions(&self, filter: Option<SessionFilter>) -> Result<Vec<Session>, StorageError>;

    /// Marks a record finished-by-user and refreshes its access timestamp,
    /// in one atomic step. Returns the updated record, or `NotFound`.
    async fn terminate_session(
        &self,
        id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<Session, StorageError>;

    /// Applies a partial update to a record, refreshing its access
    /// timestamp, in one atomic step. A requested status change is guarded
    /// by the permitted-transition rule inside that same step; a rejected
    /// transition leaves the record untouched and reports `NotFound` (the
    /// caller disambiguates against the current record).
    async fn apply_update(
        &self,
        id: SessionId,
        update: &SessionUpdate,
        at: DateTime<Utc>,
    ) -> Result<Session, StorageError>;

    /// Removes every record unconditionally. Returns the count removed.
    async fn delete_all_sessions(&self) -> Result<usize, StorageError>;
}
