//! Numeric reply reactions.
//!
//! A fixed table of server reply codes the bot reacts to. The handler gets
//! the code and the whitespace tokens of the raw line, so `line[3]` is the
//! first parameter after the bot's own nickname:
//!
//! ```text
//! :irc.example.net 470 bot #foo ##foo :Forwarding to another channel
//!  [0]             [1] [2] [3]  [4]
//! ```

use std::fmt;

use gorilla_core::{Connection, ConnectionResult};
use tracing::{error, info, trace, warn};

/// Reply codes with a defined reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericReply {
    /// `RPL_HOSTHIDDEN` (396): a cloak was set.
    HostHidden,
    /// `ERR_NOSUCHCHANNEL` (403).
    NoSuchChannel,
    /// `ERR_NICKNAMEINUSE` (433). Fatal.
    NicknameInUse,
    /// `ERR_NOTONCHANNEL` (442).
    NotOnChannel,
    /// `ERR_LINKCHANNEL` (470): the join was forwarded to another channel.
    ChannelForward,
}

impl NumericReply {
    /// Looks up a three-digit code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "396" => Some(Self::HostHidden),
            "403" => Some(Self::NoSuchChannel),
            "433" => Some(Self::NicknameInUse),
            "442" => Some(Self::NotOnChannel),
            "470" => Some(Self::ChannelForward),
            _ => None,
        }
    }

    /// The numeric code.
    pub fn code(self) -> u16 {
        match self {
            Self::HostHidden => 396,
            Self::NoSuchChannel => 403,
            Self::NicknameInUse => 433,
            Self::NotOnChannel => 442,
            Self::ChannelForward => 470,
        }
    }

    /// Returns `true` if the reply ends the connection.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::NicknameInUse)
    }
}

impl fmt::Display for NumericReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// What a numeric reply caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOutcome {
    /// A known reply was logged and its side effects issued.
    Handled(NumericReply),
    /// `quit` and `shut_down` were issued; stop processing lines.
    Fatal,
    /// The code has no reaction.
    Unhandled,
}

/// Reacts to numeric replies.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericReplies;

impl NumericReplies {
    /// Creates a handler.
    pub fn new() -> Self {
        Self
    }

    /// Handles the reply `code` carried by the tokenized `line`.
    ///
    /// Code 433 always issues exactly one `quit` followed by exactly one
    /// `shut_down`, whatever else the line holds and even if `quit` fails.
    pub fn handle(
        &self,
        conn: &mut dyn Connection,
        code: &str,
        line: &[&str],
    ) -> ConnectionResult<NumericOutcome> {
        let Some(reply) = NumericReply::from_code(code) else {
            trace!(code, "No reaction for numeric reply");
            return Ok(NumericOutcome::Unhandled);
        };
        let field = |i: usize| line.get(i).copied();

        match reply {
            NumericReply::HostHidden => {
                info!("Cloak set as {}", field(3).unwrap_or("?"));
            }
            NumericReply::NoSuchChannel => {
                warn!(channel = field(3).unwrap_or("?"), "No such channel exists");
            }
            NumericReply::NicknameInUse => {
                error!("Nickname is already in use, closing connection");
                if let Err(e) = conn.quit() {
                    warn!("Failed to send QUIT: {e}");
                }
                if let Err(e) = conn.shut_down() {
                    error!("Failed to shut down connection: {e}");
                }
                return Ok(NumericOutcome::Fatal);
            }
            NumericReply::NotOnChannel => {
                info!(
                    "Tried to part from {}, but not in that channel",
                    field(3).unwrap_or("?")
                );
            }
            NumericReply::ChannelForward => {
                error!("Unable to join channel {}", field(3).unwrap_or("?"));
                match field(4) {
                    Some(forwarded) => {
                        info!("Forwarded to {forwarded}, parting from this channel");
                        conn.part(forwarded)?;
                    }
                    None => warn!("Forward notice without a target channel"),
                }
            }
        }

        Ok(NumericOutcome::Handled(reply))
    }
}
