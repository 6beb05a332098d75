//! Per-line routing.
//!
//! [`LineRouter`] takes one raw line from the server and sends it to the
//! component that owns it:
//!
//! 1. lines that do not parse are dropped
//! 2. `PING` is answered with `PONG`
//! 3. three-digit numerics go to [`NumericReplies`]
//! 4. `NOTICE`s from the identity service go to [`NickServHandler`]
//! 5. `PRIVMSG`s are classified and dispatched
//! 6. everything else is ignored
//!
//! Routing never fails. Connection errors raised along the way are logged and
//! reported as [`RouteOutcome::ConnectionFailed`].

use std::sync::Arc;

use gorilla_core::{Connection, ConnectionError, ParsedMessage};
use gorilla_framework::{
    CommandRegistry, DispatchOutcome, Dispatcher, NickServHandler, NickServReaction,
    NumericOutcome, NumericReplies, classify,
};
use tracing::{Level, debug, error, span, trace};

use crate::config::BotSettings;

/// Default nickname of the identity service.
pub const DEFAULT_NICKSERV_NICK: &str = "NickServ";

/// What happened to one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The line did not match the message grammar.
    Dropped,
    /// A `PING` was answered.
    Pong,
    /// A numeric reply was handled.
    Numeric(NumericOutcome),
    /// A NickServ notice was handled.
    NickServ(NickServReaction),
    /// A command was recognized and dispatched.
    Command(DispatchOutcome),
    /// A `PRIVMSG` that carries no command.
    NoCommand,
    /// A message nothing reacts to.
    Ignored,
    /// A side effect on the connection failed.
    ConnectionFailed,
}

impl RouteOutcome {
    /// Returns `true` if no further lines should be processed.
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Numeric(NumericOutcome::Fatal))
    }
}

/// Sends each raw line to the handler that owns it.
#[derive(Debug)]
pub struct LineRouter {
    nickserv_nick: String,
    dispatcher: Dispatcher,
    nickserv: NickServHandler,
    numerics: NumericReplies,
}

impl LineRouter {
    /// Creates a router over `registry`.
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            nickserv_nick: DEFAULT_NICKSERV_NICK.to_string(),
            dispatcher: Dispatcher::new(registry),
            nickserv: NickServHandler::new(),
            numerics: NumericReplies::new(),
        }
    }

    /// Creates a router using the identity settings in `bot`.
    pub fn from_settings(bot: &BotSettings, registry: Arc<CommandRegistry>) -> Self {
        Self::new(registry).with_nickserv_nick(bot.nickserv_nick.clone())
    }

    /// Sets the nickname whose notices drive the NickServ handshake.
    pub fn with_nickserv_nick(mut self, nick: impl Into<String>) -> Self {
        self.nickserv_nick = nick.into();
        self
    }

    /// Nickname of the identity service.
    pub fn nickserv_nick(&self) -> &str {
        &self.nickserv_nick
    }

    /// The dispatcher commands are sent to.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Swaps in a rebuilt registry; takes effect from the next line.
    pub fn replace_registry(&self, registry: Arc<CommandRegistry>) -> Arc<CommandRegistry> {
        self.dispatcher.replace_registry(registry)
    }

    /// Routes one raw line.
    pub fn route(&self, conn: &mut dyn Connection, raw: &str) -> RouteOutcome {
        let span = span!(Level::DEBUG, "route");
        let _enter = span.enter();

        let msg = match ParsedMessage::parse(raw) {
            Ok(msg) => msg,
            Err(e) => {
                trace!(line = raw, "Dropping line: {e}");
                return RouteOutcome::Dropped;
            }
        };

        if msg.is_command("PING") {
            let token = msg
                .trailing
                .as_deref()
                .or(msg.params.as_deref())
                .unwrap_or_default();
            return settle(conn.pong(token), RouteOutcome::Pong);
        }

        if let Some(code) = msg.numeric_code() {
            let line: Vec<&str> = raw.split_whitespace().collect();
            return match self.numerics.handle(conn, code, &line) {
                Ok(outcome) => RouteOutcome::Numeric(outcome),
                Err(e) => connection_failed(&e),
            };
        }

        if msg.is_command("NOTICE") && self.is_from_nickserv(&msg) {
            return match self.nickserv.handle(conn, raw) {
                Ok(reaction) => RouteOutcome::NickServ(reaction),
                Err(e) => connection_failed(&e),
            };
        }

        if msg.is_command("PRIVMSG") {
            let invocation = classify(&msg, conn.nick());
            return match invocation {
                Some(invocation) => {
                    RouteOutcome::Command(self.dispatcher.dispatch(conn, &invocation))
                }
                None => {
                    trace!("No command in message");
                    RouteOutcome::NoCommand
                }
            };
        }

        trace!(command = %msg.command, "Ignoring message");
        RouteOutcome::Ignored
    }

    fn is_from_nickserv(&self, msg: &ParsedMessage) -> bool {
        msg.sender()
            .and_then(|p| p.nick().map(|n| n.eq_ignore_ascii_case(&self.nickserv_nick)))
            .unwrap_or(false)
    }
}

fn settle(result: Result<(), ConnectionError>, outcome: RouteOutcome) -> RouteOutcome {
    match result {
        Ok(()) => {
            debug!(?outcome, "Line routed");
            outcome
        }
        Err(e) => connection_failed(&e),
    }
}

fn connection_failed(e: &ConnectionError) -> RouteOutcome {
    error!("Connection side effect failed: {e}");
    RouteOutcome::ConnectionFailed
}
