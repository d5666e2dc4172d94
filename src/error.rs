//! Centralized error handling for caste
//!
//! The classification engine itself is total; these errors only come from
//! the ambient layers (config loading, probe helpers, logging setup).

use std::fmt;
use std::io;

/// Custom error type for caste operations
#[derive(Debug)]
pub enum CasteError {
    /// I/O errors (file reading, command execution)
    Io(io::Error),
    /// Parsing errors (invalid data format)
    Parse(String),
    /// Configuration errors
    Config(String),
    /// Hardware detection errors
    Detection(String),
}

impl fmt::Display for CasteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CasteError::Io(err) => write!(f, "I/O error: {}", err),
            CasteError::Parse(msg) => write!(f, "Parse error: {}", msg),
            CasteError::Config(msg) => write!(f, "Config error: {}", msg),
            CasteError::Detection(msg) => write!(f, "Detection error: {}", msg),
        }
    }
}

impl std::error::Error for CasteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CasteError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CasteError {
    fn from(error: io::Error) -> Self {
        CasteError::Io(error)
    }
}

impl From<toml::de::Error> for CasteError {
    fn from(error: toml::de::Error) -> Self {
        CasteError::Config(error.to_string())
    }
}

/// Type alias for Results in caste
pub type Result<T> = std::result::Result<T, CasteError>;
