//! Keypad errors.

use thiserror::Error;

/// Errors raised while building a keypad or applying mode changes.
#[derive(Debug, Error, PartialEq)]
pub enum KeypadError {
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Unknown key: {0}")]
    UnknownKey(String),
    #[error("Unknown mode group: {0}")]
    UnknownGroup(String),
    #[error("Key {key} is not a member of mode group {group}")]
    NotInGroup { group: String, key: String },
    #[error("Invalid geometry for key {key}: {reason}")]
    InvalidGeometry { key: String, reason: String },
}

/// Result type for keypad operations.
pub type KeypadResult<T> = Result<T, KeypadError>;
