//! Shell error taxonomy
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use flownet_core::{EdgeId, NetworkError, VertexId};

/// Errors surfaced by the command loop
///
/// Everything except I/O failures is reported to the user and the loop keeps
/// reading commands.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Invalid command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Invalid argument for {name}: '{value}'")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Edge {from} ---> {to} already exists with index {id}")]
    DuplicateEdge { from: VertexId, to: VertexId, id: EdgeId },

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Invalid configuration {key}: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// Whether the command loop must stop after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShellError::Io(_) | ShellError::Config { .. })
    }
}
