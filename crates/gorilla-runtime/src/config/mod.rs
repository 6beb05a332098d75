//! Configuration module for the Gorilla runtime.
//!
//! This module provides figment-based configuration loading and validation
//! for the bot identity, command registry and logging.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile};
pub use schema::{
    BotSettings, CommandSettings, GorillaConfig, LogFormat, LogLevel, LogOutput, LogRotation,
    LoggingConfig, SpanEventConfig,
};
pub use validation::validate_config;
