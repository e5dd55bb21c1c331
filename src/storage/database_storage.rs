use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::error;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::error_handling::types::StorageError;
use crate::session_management::session::{Session, SessionUpdate};
use crate::session_management::session_id::SessionId;
use crate::session_management::SessionStatus;
use crate::storage::storage_trait::Storage;
use crate::storage::types::SessionFilter;

// Internal row mapping for sessions to avoid manual try_get
#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: String,
    email: String,
    nickname: String,
    client_addr: String,
    client_mac: String,
    host_addr: String,
    host_mac: String,
    created_at: String,
    last_accessed_at: String,
    duration_secs: i64,
    inactivity_secs: i64,
    status: String,
}

const SESSION_COLUMNS: &str = "id, email, nickname, client_addr, client_mac, host_addr, host_mac, \
     created_at, last_accessed_at, duration_secs, inactivity_secs, status";

impl SessionRow {
    fn into_session(self) -> Result<Session, StorageError> {
        let status = SessionStatus::parse(&self.status).ok_or_else(|| {
            error!("Unrecognized status in stored session {}: {}", self.id, self.status);
            StorageError::ReadFailed
        })?;
        Ok(Session {
            id: self.id.parse().map_err(|_| StorageError::ReadFailed)?,
            email: self.email,
            nickname: self.nickname,
            client_addr: self.client_addr,
            client_mac: self.client_mac,
            host_addr: self.host_addr,
            host_mac: self.host_mac,
            created_at: parse_ts(&self.created_at)?,
            last_accessed_at: parse_ts(&self.last_accessed_at)?,
            duration_secs: self.duration_secs,
            inactivity_secs: self.inactivity_secs,
            status,
        })
    }
}

fn parse_ts(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StorageError::ReadFailed)
}

pub struct DatabaseStorage {
    pool: Pool<Sqlite>,
}

impl DatabaseStorage {
    /// Create or open the session database at the given path.
    pub async fn new_file<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|_| StorageError::WriteFailed)?;
            }
        }
        let opts = SqliteConnectOptions::new()
            .filename(path_ref)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .map_err(|e| {
                error!("Failed to open session database {}: {}", path_ref.display(), e);
                StorageError::ConnectionFailed
            })?;
        // create schema
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                nickname TEXT NOT NULL,
                client_addr TEXT NOT NULL,
                client_mac TEXT NOT NULL,
                host_addr TEXT NOT NULL,
                host_mac TEXT NOT NULL,
                created_at TEXT NOT NULL,
                last_accessed_at TEXT NOT NULL,
                duration_secs INTEGER NOT NULL,
                inactivity_secs INTEGER NOT NULL,
                status TEXT NOT NULL
            );",
        )
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to create sessions schema: {}", e);
            StorageError::WriteFailed
        })?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn insert_session(&self, session: &Session) -> Result<(), StorageError> {
        let result = sqlx::query(
            "INSERT INTO sessions (id, email, nickname, client_addr, client_mac, host_addr, host_mac, \
             created_at, last_accessed_at, duration_secs, inactivity_secs, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        )
        .bind(session.id.to_string())
        .bind(&session.email)
        .bind(&session.nickname)
        .bind(&session.client_addr)
        .bind(&session.client_mac)
        .bind(&session.host_addr)
        .bind(&session.host_mac)
        .bind(session.created_at.to_rfc3339())
        .bind(session.last_accessed_at.to_rfc3339())
        .bind(session.duration_secs)
        .bind(session.inactivity_secs)
        .bind(session.status.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.as_database_error().map(|d| d.is_unique_violation()).unwrap_or(false) {
                    Err(StorageError::DuplicateId)
                } else {
                    error!("Failed to insert session {}: {}", session.id, e);
                    Err(StorageError::WriteFailed)
                }
            }
        }
    }

    async fn get_session(&self, id: SessionId) -> Result<Session, StorageError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM sessions WHERE id = ?1",
            SESSION_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to read session {}: {}", id, e);
            StorageError::ReadFailed
        })?;
        row.ok_or(StorageError::NotFound)?.into_session()
    }

    async fn get_sessions(&self, filter: Option<SessionFilter>) -> Result<Vec<Session>, StorageError> {
        let mut sql = format!("SELECT {} FROM sessions", SESSION_COLUMNS);
        let mut clauses: Vec<String> = Vec::new();
        let mut binds: Vec<String> = Vec::new();
        if let Some(f) = &filter {
            if let Some(status) = f.status {
                clauses.push("status = ?".into());
                binds.push(status.as_str().into());
            }
            if let Some(ref email) = f.email {
                clauses.push("email = ?".into());
                binds.push(email.clone());
            }
        }
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at ASC, id ASC");

        let mut q = sqlx::query_as::<_, SessionRow>(&sql);
        for b in &binds {
            q = q.bind(b);
        }
        let rows: Vec<SessionRow> = q.fetch_all(&self.pool).await.map_err(|e| {
            error!("Failed to enumerate sessions: {}", e);
            StorageError::ReadFailed
        })?;
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(row.into_session()?);
        }
        Ok(out)
    }

    async fn terminate_session(
        &self,
        id: SessionId,
        at: DateTime<Utc>,
    ) -> Result<Session, StorageError> {
        // Single statement: status write and timestamp refresh cannot be
        // torn apart by a concurrent writer. MAX keeps the access timestamp
        // monotone even against a stepped-back clock.
        let result = sqlx::query(
            "UPDATE sessions SET status = ?2, last_accessed_at = MAX(last_accessed_at, ?3)
             WHERE id = ?1",
        )
        .bind(id.to_string())
        .bind(SessionStatus::FinishedByUser.as_str())
        .bind(at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to terminate session {}: {}", id, e);
            StorageError::WriteFailed
        })?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        self.get_session(id).await
    }

    async fn apply_update(
        &self,
        id: SessionId,
        update: &SessionUpdate,
        at: DateTime<Utc>,
    ) -> Result<Session, StorageError> {
        // The WHERE guard mirrors SessionStatus::can_transition_to: a status
        // change is applied only as an identity transition or from Active.
        // Keeping the guard inside the statement makes check-and-set atomic.
        let result = sqlx::query(
            "UPDATE sessions SET
                email = COALESCE(?2, email),
                nickname = COALESCE(?3, nickname),
                status = COALESCE(?4, status),
                last_accessed_at = MAX(last_accessed_at, ?5)
             WHERE id = ?1 AND (?4 IS NULL OR status = ?4 OR status = 'Active')",
        )
        .bind(id.to_string())
        .bind(update.email.as_deref())
        .bind(update.nickname.as_deref())
        .bind(update.status.map(|s| s.as_str()))
        .bind(at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update session {}: {}", id, e);
            StorageError::WriteFailed
        })?;
        if result.rows_affected() == 0 {
            // Either the record does not exist or the guard rejected the
            // transition; the caller tells the two apart.
            return Err(StorageError::NotFound);
        }
        self.get_session(id).await
    }

    async fn delete_all_sessions(&self) -> Result<usize, StorageError> {
        // One statement, so the reported count is exactly the set removed;
        // a racing insert lands wholly before or wholly after it.
        let result = sqlx::query("DELETE FROM sessions")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Failed to purge sessions: {}", e);
                StorageError::WriteFailed
            })?;
        Ok(result.rows_affected() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    async fn temp_db() -> DatabaseStorage {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("test.sqlite3");
        // Keep TempDir alive by leaking it for the test duration
        Box::leak(Box::new(dir));
        DatabaseStorage::new_file(path).await.unwrap()
    }

    fn sample_session(email: &str, nickname: &str) -> Session {
        let now = Utc::now();
        Session {
            id: SessionId::generate(),
            email: email.into(),
            nickname: nickname.into(),
            client_addr: "203.0.113.9".into(),
            client_mac: "AA:BB:CC:DD:EE:FF".into(),
            host_addr: "192.0.2.1".into(),
            host_mac: "00:11:22:33:44:55".into(),
            created_at: now,
            last_accessed_at: now,
            duration_secs: 0,
            inactivity_secs: 0,
            status: SessionStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let storage = temp_db().await;
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();

        let fetched = storage.get_session(session.id).await.unwrap();
        assert_eq!(fetched.email, "a@x.com");
        assert_eq!(fetched.nickname, "a");
        assert_eq!(fetched.client_mac, "AA:BB:CC:DD:EE:FF");
        assert_eq!(fetched.status, SessionStatus::Active);
        assert_eq!(fetched.created_at, fetched.last_accessed_at);
        assert_eq!(fetched.duration_secs, 0);
        assert_eq!(fetched.inactivity_secs, 0);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let storage = temp_db().await;
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();
        let result = storage.insert_session(&session).await;
        assert!(matches!(result, Err(StorageError::DuplicateId)));
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let storage = temp_db().await;
        let result = storage.get_session(SessionId::generate()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_empty_directory_enumerates_empty() {
        let storage = temp_db().await;
        assert!(storage.get_sessions(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filter_by_status_and_email() {
        let storage = temp_db().await;
        let s1 = sample_session("a@x.com", "a");
        let s2 = sample_session("b@x.com", "b");
        storage.insert_session(&s1).await.unwrap();
        storage.insert_session(&s2).await.unwrap();
        storage.terminate_session(s2.id, Utc::now()).await.unwrap();

        let active = storage
            .get_sessions(Some(SessionFilter {
                status: Some(SessionStatus::Active),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, s1.id);

        let by_email = storage
            .get_sessions(Some(SessionFilter {
                email: Some("b@x.com".into()),
                ..Default::default()
            }))
            .await
            .unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].status, SessionStatus::FinishedByUser);
    }

    #[tokio::test]
    async fn test_terminate_unknown_is_not_found() {
        let storage = temp_db().await;
        let result = storage.terminate_session(SessionId::generate(), Utc::now()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));
    }

    #[tokio::test]
    async fn test_terminate_sets_status_and_advances_access() {
        let storage = temp_db().await;
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();

        let later = session.created_at + chrono::Duration::seconds(5);
        let terminated = storage.terminate_session(session.id, later).await.unwrap();
        assert_eq!(terminated.status, SessionStatus::FinishedByUser);
        assert!(terminated.last_accessed_at >= terminated.created_at);
        assert_eq!(terminated.last_accessed_at, later);
    }

    #[tokio::test]
    async fn test_access_timestamp_never_regresses() {
        let storage = temp_db().await;
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();

        let earlier = session.created_at - chrono::Duration::seconds(30);
        let terminated = storage.terminate_session(session.id, earlier).await.unwrap();
        assert_eq!(terminated.last_accessed_at, session.last_accessed_at);
    }

    #[tokio::test]
    async fn test_partial_update_leaves_absent_fields_alone() {
        let storage = temp_db().await;
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();

        let update = SessionUpdate { nickname: Some("a2".into()), ..Default::default() };
        let updated = storage
            .apply_update(session.id, &update, Utc::now() + chrono::Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(updated.nickname, "a2");
        assert_eq!(updated.email, "a@x.com");
        assert_eq!(updated.status, SessionStatus::Active);
        assert!(updated.last_accessed_at > updated.created_at);
    }

    #[tokio::test]
    async fn test_update_guard_blocks_resurrection() {
        let storage = temp_db().await;
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();
        storage.terminate_session(session.id, Utc::now()).await.unwrap();

        let update = SessionUpdate {
            status: Some(SessionStatus::Active),
            ..Default::default()
        };
        let result = storage.apply_update(session.id, &update, Utc::now()).await;
        assert!(matches!(result, Err(StorageError::NotFound)));

        // Guard rejection leaves the record untouched
        let current = storage.get_session(session.id).await.unwrap();
        assert_eq!(current.status, SessionStatus::FinishedByUser);
    }

    #[tokio::test]
    async fn test_concurrent_updates_do_not_lose_writes() {
        let storage = std::sync::Arc::new(temp_db().await);
        let session = sample_session("a@x.com", "a");
        storage.insert_session(&session).await.unwrap();

        let id = session.id;
        let s1 = storage.clone();
        let s2 = storage.clone();
        let email_write = tokio::spawn(async move {
            let update = SessionUpdate { email: Some("a2@x.com".into()), ..Default::default() };
            s1.apply_update(id, &update, Utc::now()).await
        });
        let nickname_write = tokio::spawn(async move {
            let update = SessionUpdate { nickname: Some("a2".into()), ..Default::default() };
            s2.apply_update(id, &update, Utc::now()).await
        });
        email_write.await.unwrap().unwrap();
        nickname_write.await.unwrap().unwrap();

        let current = storage.get_session(id).await.unwrap();
        assert_eq!(current.email, "a2@x.com");
        assert_eq!(current.nickname, "a2");
    }

    #[tokio::test]
    async fn test_delete_all_reports_count() {
        let storage = temp_db().await;
        for i in 0..3 {
            let session = sample_session(&format!("u{}@x.com", i), "u");
            storage.insert_session(&session).await.unwrap();
        }
        assert_eq!(storage.delete_all_sessions().await.unwrap(), 3);
        assert!(storage.get_sessions(None).await.unwrap().is_empty());
        assert_eq!(storage.delete_all_sessions().await.unwrap(), 0);
    }
}
