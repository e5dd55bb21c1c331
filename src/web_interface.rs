//! Web interface
//!
//! JSON HTTP surface over the session lifecycle, one route per operation,
//! plus a small embedded dashboard at the root path.

use serde::Serialize;

pub mod routes;
pub mod types;
pub mod web_server;

/// API error payload
#[derive(Serialize)]
pub struct ApiError {
    pub message: String,
}
