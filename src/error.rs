//! Error types for pylayer
//!
//! All modules use `PylayerResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pylayer operations
pub type PylayerResult<T> = Result<T, PylayerError>;

/// All errors that can occur in pylayer
#[derive(Error, Debug)]
pub enum PylayerError {
    // Requirements errors
    #[error("Requirements file not found: {0}")]
    RequirementsNotFound(PathBuf),

    #[error("Missing python_version declaration in {path}: first entry must be python_version==<version>")]
    MissingRuntimeVersion { path: PathBuf },

    #[error("Invalid python_version in {path}: {reason}")]
    InvalidRuntimeVersion { path: PathBuf, reason: String },

    // Builder environment errors
    #[error("Container engine not found: {0}")]
    EngineNotFound(String),

    #[error("Image build failed: {tag}\n{reason}")]
    ImageBuild { tag: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Order cache errors
    #[error("No stored order for python {0}")]
    OrderNotFound(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl PylayerError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingRuntimeVersion { .. } => {
                Some("Add a first line such as: python_version==3.12")
            }
            Self::EngineNotFound(_) => {
                Some("Install podman or docker, or set builder.engine in the config")
            }
            Self::OrderNotFound(_) => Some("Run: pylayer cache list"),
            _ => None,
        }
    }
}
