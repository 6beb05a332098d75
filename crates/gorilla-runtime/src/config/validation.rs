//! Configuration validation utilities.

use super::error::{ConfigError, ConfigResult};
use super::schema::{BotSettings, GorillaConfig, LogOutput, LoggingConfig};

/// Characters allowed in a nickname besides ASCII letters and digits.
const NICK_SPECIALS: &str = "[]\\`_^{|}-";

/// Validates the entire configuration.
pub fn validate_config(config: &GorillaConfig) -> ConfigResult<()> {
    validate_bot_settings(&config.bot)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_bot_settings(bot: &BotSettings) -> ConfigResult<()> {
    validate_nick(&bot.nick)?;

    if bot.nickserv_nick.trim().is_empty() {
        return Err(ConfigError::missing_field("bot.nickserv_nick"));
    }

    Ok(())
}

/// Validates a nickname against the RFC 2812 character set.
fn validate_nick(nick: &str) -> ConfigResult<()> {
    let Some(first) = nick.chars().next() else {
        return Err(ConfigError::missing_field("bot.nick"));
    };

    if first.is_ascii_digit() || first == '-' {
        return Err(ConfigError::invalid_nick(
            nick,
            "must not start with a digit or '-'",
        ));
    }

    if let Some(bad) = nick
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !NICK_SPECIALS.contains(*c))
    {
        return Err(ConfigError::invalid_nick(
            nick,
            format!("character {bad:?} is not allowed"),
        ));
    }

    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::missing_field("logging.file_path"));
    }

    if let Some(target) = logging
        .filters
        .keys()
        .find(|t| t.is_empty() || t.contains(char::is_whitespace))
    {
        return Err(ConfigError::validation(format!(
            "Invalid log filter target: {target:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&GorillaConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_nick() {
        for nick in ["bot", "Gorilla_Bot", "[away]", "a-1"] {
            assert!(validate_nick(nick).is_ok(), "{nick}");
        }

        assert!(matches!(
            validate_nick(""),
            Err(ConfigError::MissingField { .. })
        ));
        for nick in ["1bot", "-bot", "bad nick", "bot!"] {
            assert!(
                matches!(validate_nick(nick), Err(ConfigError::InvalidNick { .. })),
                "{nick}"
            );
        }
    }

    #[test]
    fn test_validate_empty_nickserv_nick() {
        let mut config = GorillaConfig::default();
        config.bot.nickserv_nick = " ".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_file_output_needs_path() {
        let mut config = GorillaConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("gorilla.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_filter_target() {
        let mut config = GorillaConfig::default();
        config
            .logging
            .filters
            .insert(String::new(), LogLevel::Debug);
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
