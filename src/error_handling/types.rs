use std::fmt;

use crate::session_management::SessionStatus;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadIPFormatting(String),
    BadPortsRange(String),
    DirectoryDoesNotExist(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadIPFormatting(e) => write!(f, "IP formatting error: {}", e),
            ConfigError::BadPortsRange(e) => write!(f, "Port range error: {}", e),
            ConfigError::DirectoryDoesNotExist(e) => write!(f, "Directory error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

/// Errors surfaced by the session lifecycle operations.
///
/// `MissingField` carries the name of the offending input field so the web
/// layer can report it without reconstructing context. Host-discovery
/// failures never show up here: session creation records a placeholder
/// host identity instead of failing on one.
#[derive(Debug)]
pub enum SessionError {
    MissingField(&'static str),
    NotFound,
    InvalidTransition {
        from: SessionStatus,
        to: SessionStatus,
    },
    StorageError(StorageError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::MissingField(field) => write!(f, "Missing required field: {}", field),
            SessionError::NotFound => write!(f, "Session not found"),
            SessionError::InvalidTransition { from, to } => {
                write!(f, "Invalid status transition: {} -> {}", from, to)
            }
            SessionError::StorageError(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        // A directory miss is a lifecycle condition, not a storage fault
        match err {
            StorageError::NotFound => SessionError::NotFound,
            other => SessionError::StorageError(other),
        }
    }
}

#[derive(Debug)]
pub enum NetworkError {
    EnumerationFailed(String),
    NoUsableInterface,
    InterfaceNotFound(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::EnumerationFailed(e) => {
                write!(f, "Interface enumeration failed: {}", e)
            }
            NetworkError::NoUsableInterface => {
                write!(f, "No non-loopback IPv4 interface available")
            }
            NetworkError::InterfaceNotFound(name) => {
                write!(f, "Configured interface not found: {}", name)
            }
        }
    }
}

impl std::error::Error for NetworkError {}

#[derive(Debug)]
pub enum StorageError {
    ConnectionFailed,
    WriteFailed,
    ReadFailed,
    DuplicateId,
    NotFound,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::ConnectionFailed => write!(f, "Storage connection failed"),
            StorageError::WriteFailed => write!(f, "Storage write failed"),
            StorageError::ReadFailed => write!(f, "Storage read failed"),
            StorageError::DuplicateId => write!(f, "Duplicate session id"),
            StorageError::NotFound => write!(f, "Record not found"),
        }
    }
}

impl std::error::Error for StorageError {}

#[derive(Debug)]
pub enum WebError {
    BindFailed(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::BindFailed(e) => write!(f, "Web server bind failed: {}", e),
        }
    }
}

impl std::error::Error for WebError {}

#[derive(Debug)]
pub enum ControllerError {
    StorageError(StorageError),
    WebError(WebError),
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::StorageError(e) => write!(f, "Storage error: {}", e),
            ControllerError::WebError(e) => write!(f, "Web error: {}", e),
        }
    }
}

impl std::error::Error for ControllerError {}
