//! Command recognition.
//!
//! [`classify`] decides whether a parsed line carries a bot command and how it
//! was addressed. Rules are tried in priority order:
//!
//! 1. **Private**: the target is exactly the bot's nickname. The first
//!    `!`-token names the command; without one, the first word does.
//! 2. **Direct**: the text starts with the bot's nickname, an optional `:`
//!    or `,`, and whitespace. The next word names the command (`!` stripped).
//! 3. **Exclamation**: the first `!`-token names the command;
//!    [`AddressingMode::ExclamationFirst`] when it opens the text.
//!
//! All scans run strictly left to right and stop at the first hit.
//!
//! ```rust
//! use gorilla_core::{AddressingMode, ParsedMessage};
//! use gorilla_framework::classify;
//!
//! let msg = ParsedMessage::parse(":nick!user@host PRIVMSG #chan :hey !ping there").unwrap();
//! let inv = classify(&msg, "bot").unwrap();
//! assert_eq!(inv.name, "ping");
//! assert_eq!(inv.addressing_mode, AddressingMode::Exclamation);
//! ```

use gorilla_core::{AddressingMode, CommandInvocation, ParsedMessage};
use tracing::{debug, trace};

/// Marker that introduces a command token.
pub const COMMAND_MARKER: char = '!';

/// Iterator over whitespace-separated tokens with their byte offsets.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// Tokenizes `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let start = self.pos + rest.find(|c: char| !c.is_whitespace())?;
        let len = self.text[start..]
            .find(char::is_whitespace)
            .unwrap_or(self.text.len() - start);
        self.pos = start + len;
        Some((start, &self.text[start..self.pos]))
    }
}

/// Returns the command name of a `!`-token. A bare `!` names nothing.
fn marked_name(token: &str) -> Option<&str> {
    token
        .strip_prefix(COMMAND_MARKER)
        .filter(|name| !name.is_empty())
}

/// A command token located inside the trailing text.
struct Hit<'a> {
    name: &'a str,
    start: usize,
    end: usize,
}

fn first_marked(text: &str) -> Option<Hit<'_>> {
    Tokens::new(text).find_map(|(start, token)| {
        marked_name(token).map(|name| Hit {
            name,
            start,
            end: start + token.len(),
        })
    })
}

fn private_command(text: &str) -> Option<Hit<'_>> {
    first_marked(text).or_else(|| {
        Tokens::new(text).next().map(|(start, token)| Hit {
            name: token,
            start,
            end: start + token.len(),
        })
    })
}

fn direct_command<'a>(text: &'a str, bot_nick: &str) -> Option<Hit<'a>> {
    let after_nick = text.strip_prefix(bot_nick)?;
    let after_sep = after_nick
        .strip_prefix([':', ','])
        .unwrap_or(after_nick);
    if !after_sep.starts_with(char::is_whitespace) {
        return None;
    }

    let offset = text.len() - after_sep.len();
    let (start, token) = Tokens::new(after_sep).next()?;
    let name = token.strip_prefix(COMMAND_MARKER).unwrap_or(token);
    if name.is_empty() {
        return None;
    }

    let start = offset + start;
    Some(Hit {
        name,
        start,
        end: start + token.len(),
    })
}

/// Recognizes a command in `msg`, addressed to a bot whose nickname is `bot_nick`.
///
/// Returns `None` when the line has no trailing text or no rule matches.
pub fn classify(msg: &ParsedMessage, bot_nick: &str) -> Option<CommandInvocation> {
    let Some(text) = msg.trailing.as_deref() else {
        trace!(command = %msg.command, "No trailing text, nothing to classify");
        return None;
    };

    let (hit, mode) = if msg.params.as_deref() == Some(bot_nick) {
        (private_command(text)?, AddressingMode::Private)
    } else if let Some(hit) = direct_command(text, bot_nick) {
        (hit, AddressingMode::Direct)
    } else {
        let hit = first_marked(text)?;
        let mode = if hit.start == 0 {
            AddressingMode::ExclamationFirst
        } else {
            AddressingMode::Exclamation
        };
        (hit, mode)
    };

    debug!(command = hit.name, mode = %mode, "Recognized command");

    Some(CommandInvocation {
        name: hit.name.to_string(),
        sender_prefix: msg.prefix.clone(),
        sender: msg.sender_nick(),
        target: msg.params.clone(),
        addressing_mode: mode,
        trailing: text.to_string(),
        args: text[hit.end..].trim_start().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(line: &str) -> Option<CommandInvocation> {
        classify(&ParsedMessage::parse(line).unwrap(), "bot")
    }

    fn name_and_mode(line: &str) -> Option<(String, AddressingMode)> {
        run(line).map(|inv| (inv.name, inv.addressing_mode))
    }

    #[test]
    fn test_tokens_offsets() {
        let tokens: Vec<_> = Tokens::new("  a bb\tccc ").collect();
        assert_eq!(tokens, vec![(2, "a"), (4, "bb"), (7, "ccc")]);
        assert_eq!(Tokens::new("   ").next(), None);
    }

    #[test]
    fn test_private_exclamation() {
        assert_eq!(
            name_and_mode(":nick!user@host PRIVMSG bot :!hello world"),
            Some(("hello".into(), AddressingMode::Private))
        );
    }

    #[test]
    fn test_private_first_marked_token_wins() {
        assert_eq!(
            name_and_mode(":nick!user@host PRIVMSG bot :please !first then !second"),
            Some(("first".into(), AddressingMode::Private))
        );
    }

    #[test]
    fn test_private_falls_back_to_first_word() {
        let inv = run(":nick!user@host PRIVMSG bot :help me out").unwrap();
        assert_eq!(inv.name, "help");
        assert_eq!(inv.addressing_mode, AddressingMode::Private);
        assert_eq!(inv.args, "me out");
        assert_eq!(inv.sender.as_deref(), Some("nick"));
    }

    #[test]
    fn test_private_first_word_is_verbatim() {
        assert_eq!(
            name_and_mode(":nick!user@host PRIVMSG bot :bot: ping"),
            Some(("bot:".into(), AddressingMode::Private))
        );
    }

    #[test]
    fn test_direct_with_colon() {
        let inv = run(":nick!user@host PRIVMSG #chan :bot: !ping").unwrap();
        assert_eq!(inv.name, "ping");
        assert_eq!(inv.addressing_mode, AddressingMode::Direct);
        assert_eq!(inv.target.as_deref(), Some("#chan"));
    }

    #[test]
    fn test_direct_variants() {
        for line in [
            ":n!u@h PRIVMSG #chan :bot, ping",
            ":n!u@h PRIVMSG #chan :bot ping",
            ":n!u@h PRIVMSG #chan :bot:   !ping",
        ] {
            assert_eq!(
                name_and_mode(line),
                Some(("ping".into(), AddressingMode::Direct)),
                "{line}"
            );
        }
    }

    #[test]
    fn test_direct_needs_whitespace_after_nick() {
        assert_eq!(name_and_mode(":n!u@h PRIVMSG #chan :botany is fun"), None);
        assert_eq!(name_and_mode(":n!u@h PRIVMSG #chan :bot:ping"), None);
    }

    #[test]
    fn test_direct_args() {
        let inv = run(":n!u@h PRIVMSG #chan :bot: weather  in Paris").unwrap();
        assert_eq!(inv.name, "weather");
        assert_eq!(inv.args, "in Paris");
        assert_eq!(inv.trailing, "bot: weather  in Paris");
    }

    #[test]
    fn test_exclamation_first() {
        assert_eq!(
            name_and_mode(":nick!user@host PRIVMSG #chan :!ping there"),
            Some(("ping".into(), AddressingMode::ExclamationFirst))
        );
    }

    #[test]
    fn test_exclamation_mid_text() {
        let inv = run(":nick!user@host PRIVMSG #chan :hey !ping there").unwrap();
        assert_eq!(inv.name, "ping");
        assert_eq!(inv.addressing_mode, AddressingMode::Exclamation);
        assert_eq!(inv.args, "there");
    }

    #[test]
    fn test_exclamation_leading_space_is_not_first() {
        assert_eq!(
            name_and_mode(":n!u@h PRIVMSG #chan : !ping"),
            Some(("ping".into(), AddressingMode::Exclamation))
        );
    }

    #[test]
    fn test_exclamation_first_marked_token_wins() {
        assert_eq!(
            name_and_mode(":n!u@h PRIVMSG #chan :a !one b !two"),
            Some(("one".into(), AddressingMode::Exclamation))
        );
    }

    #[test]
    fn test_bare_marker_is_skipped() {
        assert_eq!(
            name_and_mode(":n!u@h PRIVMSG #chan :wow ! !ping"),
            Some(("ping".into(), AddressingMode::Exclamation))
        );
        assert_eq!(name_and_mode(":n!u@h PRIVMSG #chan :wow !"), None);
    }

    #[test]
    fn test_plain_chat_is_not_a_command() {
        assert_eq!(name_and_mode(":n!u@h PRIVMSG #chan :just chatting"), None);
    }

    #[test]
    fn test_no_trailing_no_command() {
        assert_eq!(name_and_mode(":n!u@h PRIVMSG bot"), None);
        assert_eq!(name_and_mode(":n!u@h JOIN #chan"), None);
    }

    #[test]
    fn test_empty_trailing_no_command() {
        assert_eq!(name_and_mode(":n!u@h PRIVMSG bot :"), None);
        assert_eq!(name_and_mode(":n!u@h PRIVMSG #chan :   "), None);
    }

    #[test]
    fn test_private_requires_exact_target() {
        assert_eq!(
            name_and_mode(":n!u@h PRIVMSG bots :hello"),
            None
        );
    }
}
