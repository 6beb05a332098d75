//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use gorilla_framework::CollisionPolicy;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
///
/// ```toml
/// [bot]
/// nick = "GorillaBot"
/// nickserv_nick = "NickServ"
///
/// [commands]
/// collision_policy = "reject"
///
/// [logging]
/// level = "debug"
/// format = "pretty"
///
/// [logging.filters]
/// gorilla_framework = "trace"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GorillaConfig {
    /// Bot identity.
    #[serde(default)]
    pub bot: BotSettings,

    /// Command registry settings.
    #[serde(default)]
    pub commands: CommandSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot identity settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSettings {
    /// Nickname the bot answers to.
    #[serde(default = "default_nick")]
    pub nick: String,

    /// Nickname of the identity service whose notices drive the handshake.
    #[serde(default = "default_nickserv_nick")]
    pub nickserv_nick: String,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            nick: default_nick(),
            nickserv_nick: default_nickserv_nick(),
        }
    }
}

fn default_nick() -> String {
    "GorillaBot".to_string()
}

fn default_nickserv_nick() -> String {
    "NickServ".to_string()
}

/// Command registry settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandSettings {
    /// What to do when two modules register the same name.
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    #[cfg(feature = "json-log")]
    Json,
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    /// Write to [`LoggingConfig::file_path`].
    File,
}

/// When the log file rolls over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Global level; `RUST_LOG` takes precedence when set.
    #[serde(default)]
    pub level: LogLevel,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub output: LogOutput,

    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include source file and line.
    #[serde(default)]
    pub file_location: bool,

    /// Log file, required when `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    #[serde(default)]
    pub rotation: LogRotation,

    /// Per-target levels, e.g. `gorilla_framework = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GorillaConfig::default();
        assert_eq!(config.bot.nick, "GorillaBot");
        assert_eq!(config.bot.nickserv_nick, "NickServ");
        assert_eq!(config.commands.collision_policy, CollisionPolicy::Overwrite);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.output, LogOutput::Stdout);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GorillaConfig = serde_json::from_str(
            r#"{
                "bot": { "nick": "banana" },
                "commands": { "collision_policy": "keep-first" },
                "logging": { "level": "debug", "filters": { "gorilla_core": "trace" } }
            }"#,
        )
        .unwrap();

        assert_eq!(config.bot.nick, "banana");
        assert_eq!(config.bot.nickserv_nick, "NickServ");
        assert_eq!(config.commands.collision_policy, CollisionPolicy::KeepFirst);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.filters["gorilla_core"], LogLevel::Trace);
    }

    #[test]
    fn test_level_conversion() {
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Trace.to_string(), "trace");
    }
}
