//! Helpers for building `SessionFilter` values.

pub use crate::storage::types::SessionFilter;

use crate::session_management::SessionStatus;

/// Build a `SessionFilter` that matches only records with the given status.
pub fn by_status(status: SessionStatus) -> SessionFilter {
    SessionFilter { status: Some(status), ..Default::default() }
}
