//! Command dispatcher.
//!
//! The [`Dispatcher`] looks up a classified command in the registry and runs
//! its handler synchronously.
//!
//! # Failure policy
//!
//! A handler that returns an error or panics is logged and reported as
//! [`DispatchOutcome::Failed`]. Failures never propagate to the caller, so one
//! broken command cannot take down the line loop.
//!
//! # Swapping registries
//!
//! The registry is held behind a lock so a rebuilt registry can be swapped in
//! with [`Dispatcher::replace_registry`]. Each dispatch works on a snapshot
//! taken at lookup time; a swap never affects a handler already running.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use gorilla_core::{CommandInvocation, Connection};
use parking_lot::RwLock;
use tracing::{Level, debug, error, span};

use crate::registry::CommandRegistry;

/// Result of dispatching one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Handled,
    /// No command with that name is registered.
    Unknown,
    /// The handler returned an error or panicked.
    Failed,
}

/// Routes invocations to registered handlers.
pub struct Dispatcher {
    registry: RwLock<Arc<CommandRegistry>>,
}

impl Dispatcher {
    /// Creates a dispatcher over `registry`.
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry: RwLock::new(registry),
        }
    }

    /// Returns a snapshot of the current registry.
    pub fn registry(&self) -> Arc<CommandRegistry> {
        Arc::clone(&self.registry.read())
    }

    /// Installs a rebuilt registry and returns the previous one.
    pub fn replace_registry(&self, registry: Arc<CommandRegistry>) -> Arc<CommandRegistry> {
        std::mem::replace(&mut *self.registry.write(), registry)
    }

    /// Dispatches `invocation` to its handler, if one is registered.
    pub fn dispatch(
        &self,
        conn: &mut dyn Connection,
        invocation: &CommandInvocation,
    ) -> DispatchOutcome {
        let span = span!(
            Level::DEBUG,
            "dispatch",
            command = %invocation.name,
            mode = %invocation.addressing_mode
        );
        let _enter = span.enter();

        let registry = self.registry();
        let Some(command) = registry.get(&invocation.name) else {
            debug!("Unknown command, ignoring");
            return DispatchOutcome::Unknown;
        };

        let handler = Arc::clone(&command.handler);
        match catch_unwind(AssertUnwindSafe(|| handler(conn, invocation))) {
            Ok(Ok(())) => {
                debug!(module = %command.module, "Command handled");
                DispatchOutcome::Handled
            }
            Ok(Err(e)) => {
                error!(
                    module = %command.module,
                    sender = invocation.sender.as_deref().unwrap_or("?"),
                    "Command handler failed: {e:#}"
                );
                DispatchOutcome::Failed
            }
            Err(payload) => {
                error!(
                    module = %command.module,
                    sender = invocation.sender.as_deref().unwrap_or("?"),
                    "Command handler panicked: {}",
                    panic_message(payload.as_ref())
                );
                DispatchOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("command_count", &self.registry.read().len())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}
