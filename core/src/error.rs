//! Error types for command registration, resolution and execution.
//!
//! Structural mistakes (registering a command under itself, registering a
//! command twice, creating a cycle) are programming errors and panic instead.

use std::fmt;

use cmdtree_flags::FlagError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Boxed error returned by command run behaviours.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Kind of object a [`CommandError::NotFound`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    Command,
    Flag,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Command => f.write_str("Command"),
            ObjectKind::Flag => f.write_str("Flag"),
        }
    }
}

/// Errors that can occur while resolving or executing a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A token did not match the expected command name.
    #[error("{kind} not found: {name}")]
    NotFound { kind: ObjectKind, name: String },

    /// Resolution was attempted on an empty argument vector.
    #[error("no arguments to resolve")]
    EmptyArguments,

    /// Flag parsing or lookup failure.
    #[error(transparent)]
    Flag(#[from] FlagError),

    /// A usage template referenced an unknown placeholder.
    #[error("usage template error: {0}")]
    Template(String),

    /// The matched command's run behaviour failed.
    #[error("command `{command}` failed: {source}")]
    Run { command: String, source: BoxError },

    /// Writing usage or notices failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CommandError {
    pub(crate) fn command_not_found(name: &str) -> Self {
        CommandError::NotFound {
            kind: ObjectKind::Command,
            name: name.to_string(),
        }
    }

    /// Returns `true` if this wraps the `-h`/`--help` flag signal.
    pub fn is_help(&self) -> bool {
        matches!(self, CommandError::Flag(err) if err.is_help())
    }
}

/// Convenience alias for results with [`CommandError`].
pub type Result<T> = std::result::Result<T, CommandError>;
