//! Error types for the Gorilla framework.

use thiserror::Error;

/// Errors that can occur while building the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two modules registered the same command under [`CollisionPolicy::Reject`].
    ///
    /// [`CollisionPolicy::Reject`]: crate::registry::CollisionPolicy::Reject
    #[error("command '{name}' registered by both '{first}' and '{second}'")]
    DuplicateCommand {
        /// The contested command name.
        name: String,
        /// Module that registered it first.
        first: String,
        /// Module that tried to register it again.
        second: String,
    },

    /// A command name is empty or contains whitespace.
    #[error("module '{module}' registered an invalid command name: {name:?}")]
    InvalidName {
        /// Offending module.
        module: String,
        /// Offending name.
        name: String,
    },
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
