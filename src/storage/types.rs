use serde::{Deserialize, Serialize};

use crate::session_management::SessionStatus;

/// Criteria for narrowing a session enumeration. All fields are optional
/// and combined with AND; a default filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionFilter {
    pub status: Option<SessionStatus>,
    pub email: Option<String>,
}
