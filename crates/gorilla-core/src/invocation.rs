//! Recognized command invocations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a command was addressed to the bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressingMode {
    /// Sent straight to the bot rather than to a channel.
    Private,
    /// Channel message starting with the bot's nickname (`bot: !ping`).
    Direct,
    /// `!`-prefixed token somewhere after the start of a channel message.
    Exclamation,
    /// `!`-prefixed token at the very start of a channel message.
    ExclamationFirst,
}

impl AddressingMode {
    /// Returns the wire name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Direct => "direct",
            Self::Exclamation => "exclamation",
            Self::ExclamationFirst => "exclamation_first",
        }
    }

    /// Returns `true` for the two `!`-token modes.
    pub fn is_exclamation(self) -> bool {
        matches!(self, Self::Exclamation | Self::ExclamationFirst)
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for unknown addressing mode names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown addressing mode: {0}")]
pub struct UnknownAddressingMode(pub String);

impl FromStr for AddressingMode {
    type Err = UnknownAddressingMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "direct" => Ok(Self::Direct),
            "exclamation" => Ok(Self::Exclamation),
            "exclamation_first" => Ok(Self::ExclamationFirst),
            other => Err(UnknownAddressingMode(other.to_string())),
        }
    }
}

/// A command recognized in one inbound line.
///
/// Handlers receive this alongside the connection. `trailing` is the full
/// message text, unparsed beyond command recognition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Command name, without any leading `!`.
    pub name: String,
    /// Raw sender prefix (`nick!user@host`).
    pub sender_prefix: Option<String>,
    /// Sender nickname extracted from the prefix.
    pub sender: Option<String>,
    /// Target parameter block (a channel, or the bot's own nickname).
    pub target: Option<String>,
    /// How the command was addressed.
    pub addressing_mode: AddressingMode,
    /// Full trailing text of the line.
    pub trailing: String,
    /// Text following the command token, leading whitespace removed.
    pub args: String,
}

impl CommandInvocation {
    /// Whitespace-separated words of the full message.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.trailing.split_whitespace()
    }

    /// Whitespace-separated words following the command token.
    pub fn arg_list(&self) -> Vec<&str> {
        self.args.split_whitespace().collect()
    }

    /// Returns where a reply should go: the channel for channel messages,
    /// the sender for private ones.
    pub fn reply_target(&self) -> Option<&str> {
        match self.addressing_mode {
            AddressingMode::Private => self.sender.as_deref(),
            _ => self.target.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invocation(mode: AddressingMode) -> CommandInvocation {
        CommandInvocation {
            name: "ping".into(),
            sender_prefix: Some("alice!a@host".into()),
            sender: Some("alice".into()),
            target: Some("#chan".into()),
            addressing_mode: mode,
            trailing: "hey !ping  one two".into(),
            args: "one two".into(),
        }
    }

    #[test]
    fn test_mode_names() {
        for mode in [
            AddressingMode::Private,
            AddressingMode::Direct,
            AddressingMode::Exclamation,
            AddressingMode::ExclamationFirst,
        ] {
            assert_eq!(mode.as_str().parse::<AddressingMode>().unwrap(), mode);
        }
        assert!("channel".parse::<AddressingMode>().is_err());
    }

    #[test]
    fn test_mode_serde_uses_wire_names() {
        let json = serde_json::to_string(&AddressingMode::ExclamationFirst).unwrap();
        assert_eq!(json, "\"exclamation_first\"");
    }

    #[test]
    fn test_words_and_args() {
        let inv = invocation(AddressingMode::Exclamation);
        assert_eq!(inv.words().collect::<Vec<_>>(), vec!["hey", "!ping", "one", "two"]);
        assert_eq!(inv.arg_list(), vec!["one", "two"]);
    }

    #[test]
    fn test_reply_target() {
        assert_eq!(
            invocation(AddressingMode::Direct).reply_target(),
            Some("#chan")
        );
        assert_eq!(
            invocation(AddressingMode::Private).reply_target(),
            Some("alice")
        );
    }
}
