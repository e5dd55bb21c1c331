use crate::session_management::session_id::SessionId;
use crate::session_management::SessionStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single login session record, keyed by `id` in the directory.
///
/// The identity labels (`email`, `nickname`) are whatever the caller handed
/// us at login; nothing here is authenticated. `client_addr` is best-effort
/// provenance and must never feed an access-control decision.
///
/// `duration_secs` and `inactivity_secs` are persisted but never recomputed
/// after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub email: String,
    pub nickname: String,
    pub client_addr: String,
    pub client_mac: String,
    pub host_addr: String,
    pub host_mac: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub duration_secs: i64,
    pub inactivity_secs: i64,
    pub status: SessionStatus,
}

/// Partial update applied to an existing session record.
///
/// `None` fields are left untouched; `last_accessed_at` is refreshed
/// regardless of which fields are present.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub status: Option<SessionStatus>,
}
