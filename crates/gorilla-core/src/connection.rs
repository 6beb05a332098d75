//! Connection contract.
//!
//! The routing core never performs I/O. Every protocol side effect it needs
//! goes through a [`Connection`], which the transport layer implements.

use std::sync::Arc;

use crate::error::ConnectionResult;

/// Read-only view of a built command table.
///
/// Implemented by the framework's command registry and handed to the
/// connection through [`Connection::install_commands`] so that other
/// consumers (a help command, an admin console) can list what is available.
pub trait CommandTable: Send + Sync {
    /// All registered command names, sorted.
    fn command_names(&self) -> Vec<&str>;

    /// Name of the module that registered `command`.
    fn module_of(&self, command: &str) -> Option<&str>;
}

/// Side effects and state the routing core needs from the live connection.
pub trait Connection {
    /// The bot's own nickname.
    fn nick(&self) -> &str;

    /// Sends a NickServ identification using the pending credential.
    fn identify(&mut self) -> ConnectionResult<()>;

    /// Promotes the pending NickServ credential to the active one.
    fn commit_pending_credential(&mut self);

    /// Sends `QUIT`.
    fn quit(&mut self) -> ConnectionResult<()>;

    /// Closes the transport. No further lines should be processed.
    fn shut_down(&mut self) -> ConnectionResult<()>;

    /// Returns `true` once the connection has been shut down.
    ///
    /// The line loop checks this after every line and stops when it is set.
    fn is_closed(&self) -> bool {
        false
    }

    /// Leaves `channel`.
    fn part(&mut self, channel: &str) -> ConnectionResult<()>;

    /// Answers a server `PING`.
    fn pong(&mut self, token: &str) -> ConnectionResult<()> {
        let _ = token;
        Ok(())
    }

    /// Receives the command table once it has been built.
    fn install_commands(&mut self, commands: Arc<dyn CommandTable>) {
        let _ = commands;
    }
}

impl<C: Connection + ?Sized> Connection for &mut C {
    fn nick(&self) -> &str {
        (**self).nick()
    }

    fn identify(&mut self) -> ConnectionResult<()> {
        (**self).identify()
    }

    fn commit_pending_credential(&mut self) {
        (**self).commit_pending_credential();
    }

    fn quit(&mut self) -> ConnectionResult<()> {
        (**self).quit()
    }

    fn shut_down(&mut self) -> ConnectionResult<()> {
        (**self).shut_down()
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn part(&mut self, channel: &str) -> ConnectionResult<()> {
        (**self).part(channel)
    }

    fn pong(&mut self, token: &str) -> ConnectionResult<()> {
        (**self).pong(token)
    }

    fn install_commands(&mut self, commands: Arc<dyn CommandTable>) {
        (**self).install_commands(commands);
    }
}
