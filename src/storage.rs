//! Storage subsystem
//!
//! This module provides the session directory: the authoritative keyed
//! store of session records.
//!
//! Components:
//! - `storage_trait`: the Storage trait defining a uniform API.
//! - `types`: shared data types used by storage backends.
//! - `database_storage`: SQLite implementation using sqlx.
//! - `session_filter`: helpers to build session queries.

pub mod database_storage;
pub mod session_filter;
pub mod storage_trait;
pub mod types;
