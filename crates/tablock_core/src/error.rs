//! Error types for tablock_core operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tablock_core operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The persistent store could not be opened, read, or written.
    #[error("store error: {0}")]
    Store(String),

    /// Serialization error while encoding persisted state or messages.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Deserialization error while decoding persisted state or messages.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The directory does not contain a tablock profile.
    #[error("not a tablock profile: {}", .0.display())]
    NotAProfile(PathBuf),

    /// A profile already exists where a new one was requested.
    #[error("tablock profile already exists at {}", .0.display())]
    ProfileExists(PathBuf),

    /// Another coordinator holds the profile lock.
    #[error("profile locked by another coordinator (PID: {pid})")]
    ProfileLocked {
        /// Process ID holding the lock
        pid: u32,
    },

    /// The profile lock file exists but its owner cannot be determined.
    #[error("profile lock at {} could not be acquired", .0.display())]
    LockUnavailable(PathBuf),

    /// The host tab facility rejected a call.
    #[error("host error: {0}")]
    Host(#[from] crate::host::HostError),

    /// A message could not be handled as sent.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A URL could not be parsed.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl {
        /// The offending input
        url: String,
        /// Parser message
        reason: String,
    },
}

impl LockError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotAProfile(_) => Some("Create a profile first with 'tablock init'."),
            Self::ProfileExists(_) => {
                Some("Use the existing profile, or remove .tablock/ to start over.")
            }
            Self::ProfileLocked { .. } => Some(
                "Another coordinator is running against this profile. Stop it, or remove .tablock/LOCK if the process is dead.",
            ),
            Self::LockUnavailable(_) => Some("Remove .tablock/LOCK if no coordinator is running."),
            Self::Store(_) | Self::Deserialization(_) => Some(
                "The state file may be corrupted. Remove .tablock/state.redb to start with no locks.",
            ),
            Self::Config(_) => Some("Check .tablock/config.toml for syntax errors."),
            _ => None,
        }
    }
}

/// Convenience Result type for tablock_core operations.
pub type Result<T> = std::result::Result<T, LockError>;
