//! Error handling module.
//!
//! One plain enum per subsystem with a manual `Display` impl; conversions
//! between layers live next to the type they produce.

pub mod types;
