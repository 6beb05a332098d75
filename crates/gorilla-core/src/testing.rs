//! A [`Connection`] that records every side effect, for test suites.

use std::sync::Arc;

use crate::connection::{CommandTable, Connection};
use crate::error::{ConnectionError, ConnectionResult};

/// One recorded side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionCall {
    Identify,
    CommitCredential,
    Quit,
    ShutDown,
    Part(String),
    Pong(String),
    InstallCommands(Vec<String>),
}

/// Records calls in order. Optionally fails every fallible call.
#[derive(Debug, Default)]
pub struct RecordingConnection {
    nick: String,
    calls: Vec<ConnectionCall>,
    failing: bool,
    closed: bool,
}

impl RecordingConnection {
    /// Creates a connection whose own nickname is `nick`.
    pub fn new(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ..Default::default()
        }
    }

    /// Makes every fallible side effect return [`ConnectionError::NotConnected`]
    /// (the call is still recorded).
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> &[ConnectionCall] {
        &self.calls
    }

    /// Number of recorded calls equal to `call`.
    pub fn count(&self, call: &ConnectionCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }

    fn record(&mut self, call: ConnectionCall) -> ConnectionResult<()> {
        self.calls.push(call);
        if self.failing {
            Err(ConnectionError::NotConnected)
        } else {
            Ok(())
        }
    }
}

impl Connection for RecordingConnection {
    fn nick(&self) -> &str {
        &self.nick
    }

    fn identify(&mut self) -> ConnectionResult<()> {
        self.record(ConnectionCall::Identify)
    }

    fn commit_pending_credential(&mut self) {
        self.calls.push(ConnectionCall::CommitCredential);
    }

    fn quit(&mut self) -> ConnectionResult<()> {
        self.record(ConnectionCall::Quit)
    }

    fn shut_down(&mut self) -> ConnectionResult<()> {
        self.record(ConnectionCall::ShutDown)?;
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn part(&mut self, channel: &str) -> ConnectionResult<()> {
        self.record(ConnectionCall::Part(channel.to_string()))
    }

    fn pong(&mut self, token: &str) -> ConnectionResult<()> {
        self.record(ConnectionCall::Pong(token.to_string()))
    }

    fn install_commands(&mut self, commands: Arc<dyn CommandTable>) {
        let names = commands
            .command_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        self.calls.push(ConnectionCall::InstallCommands(names));
    }
}
