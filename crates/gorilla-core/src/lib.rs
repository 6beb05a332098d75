//! # Gorilla Core
//!
//! Wire-level building blocks for the Gorilla IRC bot.
//!
//! This crate provides:
//! - **Line parsing**: one raw protocol line into a [`ParsedMessage`]
//! - **Prefixes**: sender identities as [`Prefix`]
//! - **Invocations**: recognized commands as [`CommandInvocation`] with an [`AddressingMode`]
//! - **Connection contract**: the [`Connection`] side-effect trait implemented by the transport
//!
//! Nothing in this crate performs I/O.
//!
//! ```text
//! raw line ──▶ ParsedMessage ──▶ (framework) classifier ──▶ CommandInvocation ──▶ handler
//!                                                                  │
//!                                                   Connection ◀───┘ side effects
//! ```

pub mod connection;
pub mod error;
pub mod invocation;
pub mod message;
pub mod prefix;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use connection::{CommandTable, Connection};
pub use error::{ConnectionError, ConnectionResult, ParseError, ParseResult};
pub use invocation::{AddressingMode, CommandInvocation, UnknownAddressingMode};
pub use message::ParsedMessage;
pub use prefix::Prefix;

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        AddressingMode, CommandInvocation, Connection, ConnectionResult, ParsedMessage, Prefix,
    };
}
