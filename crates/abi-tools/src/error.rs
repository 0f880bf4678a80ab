//! Error types for abi-tools

use thiserror::Error;

/// Tool error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A tool with this name is already registered
    #[error("tool already registered: {0}")]
    DuplicateTool(String),

    /// No tool with this name is registered
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The caller may not use this tool (or this subject)
    #[error("tool '{tool}' is forbidden for the {role} role: {reason}")]
    ForbiddenTool {
        /// Tool name
        tool: String,
        /// Active role
        role: String,
        /// Why access was refused
        reason: String,
    },

    /// Arguments do not match the parameter schema
    #[error("invalid arguments for '{tool}': {reason}")]
    InvalidArguments {
        /// Tool name
        tool: String,
        /// What was wrong
        reason: String,
    },

    /// The handler failed, panicked or timed out
    #[error("tool '{tool}' failed: {reason}")]
    HandlerExecution {
        /// Tool name
        tool: String,
        /// Failure description
        reason: String,
    },
}

impl Error {
    /// Shorthand for a handler failure
    #[must_use]
    pub fn handler(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::HandlerExecution {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
