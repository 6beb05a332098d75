//! Message prefix (sender identity) parsing.
//!
//! A prefix is either a server name or a `nick!user@host` mask. Parsing is
//! lenient: components are split but never validated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Origin of an IRC line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prefix {
    /// Server name (e.g., `irc.example.net`).
    ServerName(String),
    /// User mask. `user` and `host` are absent for a bare nickname.
    User {
        /// Nickname.
        nick: String,
        /// Username (the part after `!`).
        user: Option<String>,
        /// Hostname (the part after `@`).
        host: Option<String>,
    },
}

impl Prefix {
    /// Splits a raw prefix string (without the leading `:`).
    pub fn new_from_str(s: &str) -> Self {
        let (name_user, host) = match s.split_once('@') {
            Some((left, host)) => (left, Some(host.to_string())),
            None => (s, None),
        };
        let (name, user) = match name_user.split_once('!') {
            Some((name, user)) => (name, Some(user.to_string())),
            None => (name_user, None),
        };

        // A dot in a bare name means a server
        if user.is_none() && host.is_none() && name.contains('.') {
            return Self::ServerName(name.to_string());
        }

        Self::User {
            nick: name.to_string(),
            user,
            host,
        }
    }

    /// Returns the nickname for user prefixes.
    pub fn nick(&self) -> Option<&str> {
        match self {
            Self::ServerName(_) => None,
            Self::User { nick, .. } => Some(nick),
        }
    }

    /// Returns the nickname, or the server name for server prefixes.
    pub fn name(&self) -> &str {
        match self {
            Self::ServerName(name) => name,
            Self::User { nick, .. } => nick,
        }
    }
}

impl FromStr for Prefix {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new_from_str(s))
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerName(name) => f.write_str(name),
            Self::User { nick, user, host } => {
                f.write_str(nick)?;
                if let Some(user) = user {
                    write!(f, "!{user}")?;
                }
                if let Some(host) = host {
                    write!(f, "@{host}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_user_mask() {
        let prefix = Prefix::new_from_str("nick!user@host.example");
        assert_eq!(
            prefix,
            Prefix::User {
                nick: "nick".into(),
                user: Some("user".into()),
                host: Some("host.example".into()),
            }
        );
        assert_eq!(prefix.nick(), Some("nick"));
    }

    #[test]
    fn test_server_name() {
        let prefix = Prefix::new_from_str("irc.example.net");
        assert_eq!(prefix, Prefix::ServerName("irc.example.net".into()));
        assert_eq!(prefix.nick(), None);
        assert_eq!(prefix.name(), "irc.example.net");
    }

    #[test]
    fn test_bare_nick() {
        let prefix = Prefix::new_from_str("NickServ");
        assert_eq!(prefix.nick(), Some("NickServ"));
    }

    #[test]
    fn test_display_keeps_mask() {
        let prefix = Prefix::new_from_str("nick!~user@10.0.0.1");
        assert_eq!(prefix.to_string(), "nick!~user@10.0.0.1");
    }
}
