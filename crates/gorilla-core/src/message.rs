//! Line parsing.
//!
//! A raw protocol line is decomposed into [`ParsedMessage`] following the
//! grammar
//!
//! ```text
//! [":" prefix " "] command [" " params] [" :" trailing]
//! ```
//!
//! - `prefix` is the token after a leading `:`, up to the first space.
//! - `command` is the first token after the optional prefix.
//! - `params` is the middle block up to (excluding) the first `" :"`.
//! - `trailing` is everything after the first `" :"`, taken verbatim.
//!
//! # Example
//!
//! ```rust
//! use gorilla_core::ParsedMessage;
//!
//! let msg = ParsedMessage::parse(":nick!user@host PRIVMSG #chan :hello there").unwrap();
//! assert_eq!(msg.prefix.as_deref(), Some("nick!user@host"));
//! assert_eq!(msg.command, "PRIVMSG");
//! assert_eq!(msg.params.as_deref(), Some("#chan"));
//! assert_eq!(msg.trailing.as_deref(), Some("hello there"));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseResult};
use crate::prefix::Prefix;

/// A protocol line split into its grammar fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMessage {
    /// Sender identity, without the leading `:`.
    pub prefix: Option<String>,
    /// Command or three-digit numeric reply code.
    pub command: String,
    /// Middle parameter block.
    pub params: Option<String>,
    /// Free text after the `" :"` separator. No command can be present without it.
    pub trailing: Option<String>,
}

impl ParsedMessage {
    /// Parses one raw line. A trailing `\r\n` or `\n` is ignored.
    pub fn parse(raw: &str) -> ParseResult<Self> {
        let line = raw.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (prefix, rest) = match line.strip_prefix(':') {
            Some(stripped) => {
                let (prefix, rest) = stripped
                    .split_once(' ')
                    .ok_or_else(|| ParseError::missing_command(line))?;
                if prefix.is_empty() {
                    return Err(ParseError::empty_prefix(line));
                }
                (Some(prefix), rest)
            }
            None => (None, line),
        };

        if rest.starts_with(':') {
            return Err(ParseError::missing_command(line));
        }

        let (head, trailing) = match rest.split_once(" :") {
            Some((head, trailing)) => (head, Some(trailing)),
            None => (rest, None),
        };

        let (command, params) = match head.split_once(' ') {
            Some((command, params)) => (command, Some(params)),
            None => (head, None),
        };

        if command.is_empty() {
            return Err(ParseError::missing_command(line));
        }

        Ok(Self {
            prefix: prefix.map(str::to_string),
            command: command.to_string(),
            params: params.filter(|p| !p.is_empty()).map(str::to_string),
            trailing: trailing.map(str::to_string),
        })
    }

    /// Returns the decomposed prefix, if any.
    pub fn sender(&self) -> Option<Prefix> {
        self.prefix.as_deref().map(Prefix::new_from_str)
    }

    /// Returns the nickname of the sender, or the whole prefix when it is not
    /// a user mask.
    pub fn sender_nick(&self) -> Option<String> {
        self.sender().map(|p| p.name().to_string())
    }

    /// Whitespace-separated middle parameters.
    pub fn param_list(&self) -> Vec<&str> {
        self.params
            .as_deref()
            .map(|p| p.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Returns the numeric reply code if the command is a three-digit number.
    pub fn numeric_code(&self) -> Option<&str> {
        let code = self.command.as_str();
        (code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit())).then_some(code)
    }

    /// Returns `true` if the command equals `name`, ignoring ASCII case.
    pub fn is_command(&self, name: &str) -> bool {
        self.command.eq_ignore_ascii_case(name)
    }
}

impl FromStr for ParsedMessage {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
