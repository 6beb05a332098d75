//! NickServ handshake reactions.
//!
//! Each notice from the identity service is handled on its own, keyed by a
//! substring of the raw line:
//!
//! | Contains       | Reaction                                        |
//! |----------------|-------------------------------------------------|
//! | `identify`     | identify                                        |
//! | `identified`   | commit the pending credential                   |
//! | `:Invalid`     | identify again                                  |
//!
//! Nothing is remembered between notices apart from the credential commit,
//! which lives on the connection.

use gorilla_core::{Connection, ConnectionResult};
use tracing::{info, trace, warn};

/// What a NickServ notice caused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NickServReaction {
    /// NickServ asked for identification; `identify` was sent.
    IdentifyRequested,
    /// Identification succeeded; the pending credential is now active.
    Identified,
    /// The password was rejected; `identify` was sent again.
    InvalidPassword,
    /// The notice matched no rule.
    Ignored,
}

/// Reacts to NickServ notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NickServHandler;

impl NickServHandler {
    /// Creates a handler.
    pub fn new() -> Self {
        Self
    }

    /// Handles one raw notice line from NickServ.
    pub fn handle(
        &self,
        conn: &mut dyn Connection,
        line: &str,
    ) -> ConnectionResult<NickServReaction> {
        if line.contains("identify") {
            info!("NickServ has requested identification");
            conn.identify()?;
            Ok(NickServReaction::IdentifyRequested)
        } else if line.contains("identified") {
            conn.commit_pending_credential();
            let nick = line
                .split_whitespace()
                .nth(2)
                .unwrap_or_else(|| conn.nick())
                .to_string();
            info!(nick = %nick, "Successfully identified as {nick}");
            Ok(NickServReaction::Identified)
        } else if line.contains(":Invalid") {
            warn!("NickServ rejected the password, identifying again");
            conn.identify()?;
            Ok(NickServReaction::InvalidPassword)
        } else {
            trace!(line, "Unrecognized NickServ notice");
            Ok(NickServReaction::Ignored)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gorilla_core::testing::{ConnectionCall, RecordingConnection};

    const PREFIX: &str = ":NickServ!NickServ@services.";

    fn notice(text: &str) -> String {
        format!("{PREFIX} NOTICE bot :{text}")
    }

    #[test]
    fn test_identify_request() {
        let mut conn = RecordingConnection::new("bot");
        let reaction = NickServHandler::new()
            .handle(
                &mut conn,
                &notice("This nickname is registered. Please identify via /msg NickServ identify <password>."),
            )
            .unwrap();

        assert_eq!(reaction, NickServReaction::IdentifyRequested);
        assert_eq!(conn.calls(), &[ConnectionCall::Identify]);
    }

    #[test]
    fn test_identified_commits_credential() {
        let mut conn = RecordingConnection::new("bot");
        let reaction = NickServHandler::new()
            .handle(&mut conn, &notice("You are now identified for bot."))
            .unwrap();

        assert_eq!(reaction, NickServReaction::Identified);
        assert_eq!(conn.calls(), &[ConnectionCall::CommitCredential]);
    }

    #[test]
    fn test_invalid_password_retries() {
        let mut conn = RecordingConnection::new("bot");
        let handler = NickServHandler::new();

        let reaction = handler
            .handle(&mut conn, &notice("Invalid password for bot."))
            .unwrap();

        assert_eq!(reaction, NickServReaction::InvalidPassword);
        assert_eq!(conn.count(&ConnectionCall::Identify), 1);
    }

    #[test]
    fn test_each_notice_handled_independently() {
        let mut conn = RecordingConnection::new("bot");
        let handler = NickServHandler::new();

        handler
            .handle(&mut conn, &notice("Invalid password for bot."))
            .unwrap();
        handler
            .handle(&mut conn, &notice("Invalid password for bot."))
            .unwrap();

        assert_eq!(conn.count(&ConnectionCall::Identify), 2);
    }

    #[test]
    fn test_unrelated_notice_ignored() {
        let mut conn = RecordingConnection::new("bot");
        let reaction = NickServHandler::new()
            .handle(&mut conn, &notice("Last login from: bot@host"))
            .unwrap();

        assert_eq!(reaction, NickServReaction::Ignored);
        assert!(conn.calls().is_empty());
    }

    #[test]
    fn test_connection_failure_propagates() {
        let mut conn = RecordingConnection::new("bot").failing();
        let result = NickServHandler::new().handle(&mut conn, &notice("please identify"));
        assert!(result.is_err());
    }
}
