//! Runtime error types.

use gorilla_framework::RegistryError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while setting up or running the bot.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The command registry could not be built.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Reading from the line source failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
