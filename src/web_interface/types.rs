use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session_management::session::Session;
use crate::session_management::session_id::SessionId;
use crate::session_management::SessionStatus;

/// Body of `POST /login`. Every field is required; emptiness is reported
/// per-field by the lifecycle layer.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub mac_address: String,
}

/// Body of `POST /logout`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    #[serde(default)]
    pub session_id: String,
}

/// Body of `PUT /update`. Only `session_id` is required; the rest are
/// partial-update fields. The status enumeration is closed, so an
/// unrecognized `status` string fails deserialization outright.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    #[serde(default)]
    pub session_id: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub status: Option<SessionStatus>,
}

/// Query string of `GET /status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    #[serde(default)]
    pub session_id: String,
}

/// Successful login payload: the identifier plus the provenance captured
/// at creation.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: String,
    pub session_id: SessionId,
    pub client_addr: String,
    pub client_mac: String,
    pub host_addr: String,
    pub host_mac: String,
}

/// Full read-only projection of a session record.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: SessionId,
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

impl From<Session> for SessionView {
    fn from(session: Session) -> Self {
        Self {
            session_id: session.id,
            email: session.email,
            nickname: session.nickname,
            client_addr: session.client_addr,
            client_mac: session.client_mac,
            host_addr: session.host_addr,
            host_mac: session.host_mac,
            created_at: session.created_at,
            last_accessed_at: session.last_accessed_at,
            duration_secs: session.duration_secs,
            inactivity_secs: session.inactivity_secs,
            status: session.status,
        }
    }
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub message: String,
    pub session: SessionView,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub message: String,
    pub sessions: Vec<SessionView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeResponse {
    pub message: String,
    pub removed: usize,
}
