//! Controller module.
//!
//! Wires configuration, storage, the session manager and the web server
//! together and owns the startup sequence.

pub mod controller_handler;
