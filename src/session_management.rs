//! Session management core module.
//!
//! This module provides the types and submodules for tracking login
//! sessions: the session record itself, identifier generation, the status
//! enumeration and its transition rules, and the lifecycle manager.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Submodule for session data structures.
pub mod session;
/// Submodule for session identifier generation.
pub mod session_id;
/// Submodule for the session lifecycle manager.
pub mod session_manager;

/// Represents the current status of a session.
///
/// Variants:
/// - `Active`: The session is currently live.
/// - `FinishedByUser`: The user terminated the session; terminal under the
///   normal lifecycle operations.
///
/// The enumeration is closed: unrecognized status strings are rejected at
/// the deserialization boundary rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    FinishedByUser,
}

impl SessionStatus {
    /// Whether the public lifecycle surface may move a record from `self`
    /// to `to`. Identity transitions are permitted so that re-applying an
    /// update stays idempotent; the only real transition is
    /// `Active -> FinishedByUser`.
    pub fn can_transition_to(self, to: SessionStatus) -> bool {
        self == to || matches!((self, to), (SessionStatus::Active, SessionStatus::FinishedByUser))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Active => "Active",
            SessionStatus::FinishedByUser => "FinishedByUser",
        }
    }

    pub fn parse(s: &str) -> Option<SessionStatus> {
        match s {
            "Active" => Some(SessionStatus::Active),
            "FinishedByUser" => Some(SessionStatus::FinishedByUser),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
