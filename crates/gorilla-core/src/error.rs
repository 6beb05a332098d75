//! Unified error types for the Gorilla core.
//!
//! Framework-level errors (like `RegistryError`) are defined in gorilla-framework.

use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Errors produced when a raw line does not fit the IRC line grammar.
///
/// Callers in the routing path treat every variant as "drop the line"; the
/// variants exist so tests and logs can tell the cases apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line was empty (after stripping the line terminator).
    #[error("empty line")]
    Empty,

    /// A leading `:` was not followed by a prefix token.
    #[error("empty prefix in line: {line}")]
    EmptyPrefix {
        /// The offending line.
        line: String,
    },

    /// No command token could be found.
    #[error("missing command in line: {line}")]
    MissingCommand {
        /// The offending line.
        line: String,
    },
}

impl ParseError {
    pub(crate) fn empty_prefix(line: &str) -> Self {
        Self::EmptyPrefix {
            line: line.to_string(),
        }
    }

    pub(crate) fn missing_command(line: &str) -> Self {
        Self::MissingCommand {
            line: line.to_string(),
        }
    }
}

// =============================================================================
// Connection Errors
// =============================================================================

/// Errors reported by a [`Connection`](crate::Connection) side effect.
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    /// The connection is not (or no longer) established.
    #[error("connection is not established")]
    NotConnected,

    /// Writing a protocol line failed.
    #[error("failed to send line: {0}")]
    SendFailed(String),

    /// No credential is configured for NickServ identification.
    #[error("no NickServ credential configured")]
    MissingCredential,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ConnectionError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for line parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for connection side effects.
pub type ConnectionResult<T> = Result<T, ConnectionError>;
