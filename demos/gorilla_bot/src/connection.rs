//! A [`Connection`] that writes raw protocol lines to any writer.

use std::io::Write;
use std::sync::Arc;

use gorilla::core::{CommandTable, Connection, ConnectionError, ConnectionResult};
use tracing::debug;

/// Writes each side effect as one IRC command line.
pub struct LineConnection<W: Write> {
    nick: String,
    out: W,
    pending_password: Option<String>,
    password: Option<String>,
    commands: Option<Arc<dyn CommandTable>>,
    closed: bool,
}

impl<W: Write> LineConnection<W> {
    pub fn new(nick: impl Into<String>, out: W) -> Self {
        Self {
            nick: nick.into(),
            out,
            pending_password: None,
            password: None,
            commands: None,
            closed: false,
        }
    }

    /// Sets the password to try on the next NickServ request.
    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.pending_password = password;
        self
    }

    /// Names of the installed commands, sorted.
    pub fn command_names(&self) -> Vec<String> {
        self.commands
            .as_ref()
            .map(|t| t.command_names().into_iter().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn send(&mut self, line: &str) -> ConnectionResult<()> {
        if self.closed {
            return Err(ConnectionError::NotConnected);
        }
        debug!(line, "Sending");
        writeln!(self.out, "{line}\r")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Connection for LineConnection<W> {
    fn nick(&self) -> &str {
        &self.nick
    }

    fn identify(&mut self) -> ConnectionResult<()> {
        let password = self
            .pending_password
            .as_ref()
            .or(self.password.as_ref())
            .ok_or(ConnectionError::MissingCredential)?
            .clone();
        self.send(&format!("PRIVMSG NickServ :IDENTIFY {password}"))
    }

    fn commit_pending_credential(&mut self) {
        if let Some(password) = self.pending_password.take() {
            self.password = Some(password);
        }
    }

    fn quit(&mut self) -> ConnectionResult<()> {
        self.send("QUIT :Shutting down")
    }

    fn shut_down(&mut self) -> ConnectionResult<()> {
        self.out.flush()?;
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn part(&mut self, channel: &str) -> ConnectionResult<()> {
        if channel.is_empty() {
            return Err(ConnectionError::SendFailed("PART needs a channel".to_string()));
        }
        self.send(&format!("PART {channel}"))
    }

    fn pong(&mut self, token: &str) -> ConnectionResult<()> {
        self.send(&format!("PONG :{token}"))
    }

    fn install_commands(&mut self, commands: Arc<dyn CommandTable>) {
        self.commands = Some(commands);
    }
}
