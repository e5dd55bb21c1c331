use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};

use crate::error_handling::types::{SessionError, StorageError};
use crate::network::host_discovery::discover_host_identity;
use crate::network::provenance::resolve_client_addr;
use crate::network::types::{ConnectionContext, HostIdentity, SessionRequest};
use crate::session_management::session::{Session, SessionUpdate};
use crate::session_management::session_id::SessionId;
use crate::session_management::SessionStatus;
use crate::storage::session_filter;
use crate::storage::storage_trait::Storage;

/// The structure related to session lifecycle management
///
/// This structure owns the operation surface through which session records
/// are created, transitioned, queried and removed. The directory behind
/// `storage` is the single source of truth; no session state is cached in
/// the process.
///
/// # Fields Overview
///
/// - `storage`: the session directory backend
/// - `host_interface`: optional interface name pinned by configuration;
///   keeps the reported host identity stable on multi-homed machines
pub struct SessionManager {
    storage: Arc<dyn Storage>,
    host_interface: Option<String>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn Storage>, host_interface: Option<String>) -> Self {
        Self {
            storage,
            host_interface,
        }
    }

    /// Creates a session record for a login.
    ///
    /// Nothing is authenticated here: the email/nickname pair is recorded
    /// as handed to us. Every call mints a fresh identifier, so repeating a
    /// login for the same email yields a second, independent record.
    pub async fn create_session(
        &self,
        request: SessionRequest,
        ctx: &ConnectionContext,
    ) -> Result<Session, SessionError> {
        if request.email.is_empty() {
            return Err(SessionError::MissingField("email"));
        }
        if request.nickname.is_empty() {
            return Err(SessionError::MissingField("nickname"));
        }
        if request.client_mac.is_empty() {
            return Err(SessionError::MissingField("macAddress"));
        }

        let id = SessionId::generate();
        let provenance = resolve_client_addr(ctx);
        debug!(
            "Resolved client address {} for session {} via {}",
            provenance.addr, id, provenance.source
        );
        let host = match discover_host_identity(self.host_interface.as_deref()) {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Host discovery failed, recording placeholder identity: {}", e);
                HostIdentity::unknown()
            }
        };

        let now = Utc::now();
        let session = Session {
            id,
            email: request.email,
            nickname: request.nickname,
            client_addr: provenance.addr,
            client_mac: request.client_mac,
            host_addr: host.addr,
            host_mac: host.mac,
            created_at: now,
            last_accessed_at: now,
            duration_secs: 0,
            inactivity_secs: 0,
            status: SessionStatus::Active,
        };
        self.storage.insert_session(&session).await?;
        info!(
            "Created session {} for {} from {}",
            session.id, session.nickname, session.client_addr
        );
        Ok(session)
    }

    /// Marks a session finished-by-user and refreshes its access timestamp.
    ///
    /// Terminating an already-terminated session is an identity transition
    /// and succeeds; only the access timestamp moves.
    pub async fn terminate_session(&self, session_id: &str) -> Result<Session, SessionError> {
        let id = self.parse_id(session_id)?;
        let session = self.storage.terminate_session(id, Utc::now()).await?;
        info!("Terminated session {}", session.id);
        Ok(session)
    }

    /// Applies a partial update to a session. Absent fields stay untouched;
    /// the access timestamp is refreshed either way. A status change must
    /// be a permitted transition or the whole update is rejected.
    pub async fn update_session(
        &self,
        session_id: &str,
        update: SessionUpdate,
    ) -> Result<Session, SessionError> {
        let id = self.parse_id(session_id)?;
        match self.storage.apply_update(id, &update, Utc::now()).await {
            Ok(session) => Ok(session),
            Err(e) => {
                // An atomically rejected update needs disambiguation: a
                // still-present record means the status guard fired.
                if let (StorageError::NotFound, Some(requested)) = (&e, update.status) {
                    if let Ok(current) = self.storage.get_session(id).await {
                        if !current.status.can_transition_to(requested) {
                            return Err(SessionError::InvalidTransition {
                                from: current.status,
                                to: requested,
                            });
                        }
                    }
                }
                Err(e.into())
            }
        }
    }

    /// Returns the full record without mutating it; a status probe must not
    /// count as access.
    pub async fn query_session(&self, session_id: &str) -> Result<Session, SessionError> {
        let id = self.parse_id(session_id)?;
        Ok(self.storage.get_session(id).await?)
    }

    /// Returns every record in the directory. An empty directory is a
    /// successful empty listing, not an error.
    pub async fn list_sessions(&self) -> Result<Vec<Session>, SessionError> {
        Ok(self.storage.get_sessions(None).await?)
    }

    /// Returns the records still marked `Active`; same emptiness policy as
    /// `list_sessions`.
    pub async fn list_active_sessions(&self) -> Result<Vec<Session>, SessionError> {
        let filter = session_filter::by_status(SessionStatus::Active);
        Ok(self.storage.get_sessions(Some(filter)).await?)
    }

    /// Removes every record unconditionally and reports how many went.
    pub async fn purge_sessions(&self) -> Result<usize, SessionError> {
        let removed = self.storage.delete_all_sessions().await?;
        info!("Purged {} session(s)", removed);
        Ok(removed)
    }

    fn parse_id(&self, session_id: &str) -> Result<SessionId, SessionError> {
        if session_id.is_empty() {
            return Err(SessionError::MissingField("sessionId"));
        }
        // A malformed id can match no stored record
        session_id.parse().map_err(|_| SessionError::NotFound)
    }
}
