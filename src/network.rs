//! Network provenance module.
//!
//! Everything here is best-effort: the caller address comes from a priority
//! chain that starts with a client-controlled proxy header, and the host
//! identity is whatever interface enumeration reports at the moment of the
//! call. These values are recorded for audit, never trusted for access
//! control.

pub mod host_discovery;
pub mod provenance;
pub mod types;
