//! # Gorilla Framework
//!
//! Command routing for the Gorilla IRC bot.
//!
//! This layer provides:
//! - [`classify`]: recognizes a command in a parsed line and its addressing mode
//! - [`CommandRegistry`]: name-to-handler table built from [`CommandModule`]s
//! - [`Dispatcher`]: runs the handler for a recognized command, containing failures
//! - [`NickServHandler`]: reacts to identity-service notices
//! - [`NumericReplies`]: reacts to a fixed set of numeric server replies
//!
//! All handlers are synchronous and act on the bot through
//! [`gorilla_core::Connection`].

pub mod classifier;
pub mod dispatcher;
pub mod error;
mod macros;
pub mod nickserv;
pub mod numeric;
pub mod registry;

pub use classifier::{COMMAND_MARKER, classify};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use error::{RegistryError, RegistryResult};
pub use nickserv::{NickServHandler, NickServReaction};
pub use numeric::{NumericOutcome, NumericReplies, NumericReply};
pub use registry::{
    CollisionPolicy, CommandHandler, CommandModule, CommandRegistry, CommandSet, PRIVATE_MARKER,
    RegisteredCommand,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::{
        CollisionPolicy, CommandModule, CommandRegistry, CommandSet, DispatchOutcome, Dispatcher,
        classify, command_module,
    };
}
