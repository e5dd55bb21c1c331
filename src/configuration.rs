//! Configuration module.
//!
//! Runtime parameters come either from a TOML file or from command-line
//! flags; both paths funnel through the same validation.

pub mod config;
