//! Command registry.
//!
//! The registry maps command names to handlers. It is built once, from an
//! explicit list of [`CommandModule`]s, and is read-only afterwards.
//!
//! Modules register their commands explicitly through a [`CommandSet`]:
//!
//! ```rust
//! use gorilla_core::{CommandInvocation, Connection};
//! use gorilla_framework::registry::{CollisionPolicy, CommandModule, CommandRegistry, CommandSet};
//!
//! struct Admin;
//!
//! impl CommandModule for Admin {
//!     fn name(&self) -> &str {
//!         "admin"
//!     }
//!
//!     fn register(&self, commands: &mut CommandSet) {
//!         commands.command("part", |conn: &mut dyn Connection, inv: &CommandInvocation| {
//!             conn.part(inv.args.trim())?;
//!             Ok(())
//!         });
//!     }
//! }
//!
//! let registry = CommandRegistry::build(&[&Admin], CollisionPolicy::Reject).unwrap();
//! assert!(registry.contains("part"));
//! ```
//!
//! # Private commands
//!
//! Names starting with [`PRIVATE_MARKER`] are never registrable; modules can
//! keep helpers under such names without exposing them to IRC.
//!
//! # Collisions
//!
//! When two modules register the same name, [`CollisionPolicy`] decides:
//! reject the build, keep the first registration, or let the last one win.
//! Every collision is logged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use gorilla_core::{CommandInvocation, CommandTable, Connection};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RegistryError, RegistryResult};

/// Names starting with this character are never registered.
pub const PRIVATE_MARKER: char = '_';

/// A type-erased command handler.
///
/// Handlers receive the live connection and the invocation (sender prefix,
/// target, addressing mode and raw trailing text). Failures are reported to
/// the dispatcher, which logs them and carries on.
pub type CommandHandler =
    Arc<dyn Fn(&mut dyn Connection, &CommandInvocation) -> anyhow::Result<()> + Send + Sync>;

/// A unit that contributes commands to the registry.
pub trait CommandModule: Send + Sync {
    /// Module name, used in logs and collision reports.
    fn name(&self) -> &str;

    /// Registers this module's commands.
    fn register(&self, commands: &mut CommandSet);
}

/// What to do when two modules register the same command name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    /// Fail the build with [`RegistryError::DuplicateCommand`].
    Reject,
    /// Keep the earlier registration and ignore the later one.
    KeepFirst,
    /// Replace the earlier registration with the later one.
    #[default]
    Overwrite,
}

/// Collects one module's commands during registration.
pub struct CommandSet {
    module: String,
    entries: Vec<(String, CommandHandler)>,
}

impl CommandSet {
    fn new(module: &str) -> Self {
        Self {
            module: module.to_string(),
            entries: Vec::new(),
        }
    }

    /// Registers `handler` under `name`.
    pub fn command<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&mut dyn Connection, &CommandInvocation) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        self.entries.push((name.into(), Arc::new(handler)));
        self
    }

    /// Registers a pre-built handler.
    pub fn command_boxed(&mut self, name: impl Into<String>, handler: CommandHandler) -> &mut Self {
        self.entries.push((name.into(), handler));
        self
    }

    /// Name of the module being registered.
    pub fn module(&self) -> &str {
        &self.module
    }
}

/// A command as stored in the registry.
#[derive(Clone)]
pub struct RegisteredCommand {
    /// Module that registered the command.
    pub module: String,
    /// Command name.
    pub name: String,
    /// The handler.
    pub handler: CommandHandler,
}

impl fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("module", &self.module)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Case-sensitive mapping from command name to handler.
#[derive(Default, Clone)]
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
    modules: Vec<String>,
}

impl CommandRegistry {
    /// Creates a registry with no commands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the registry from `modules`, in order.
    pub fn build(
        modules: &[&dyn CommandModule],
        policy: CollisionPolicy,
    ) -> RegistryResult<Self> {
        let mut registry = Self::empty();

        for module in modules {
            let mut set = CommandSet::new(module.name());
            module.register(&mut set);
            registry.absorb(set, policy)?;
        }

        info!(
            commands = registry.len(),
            modules = registry.modules.len(),
            "Command registry built"
        );

        Ok(registry)
    }

    fn absorb(&mut self, set: CommandSet, policy: CollisionPolicy) -> RegistryResult<()> {
        let CommandSet { module, entries } = set;

        for (name, handler) in entries {
            if name.starts_with(PRIVATE_MARKER) {
                debug!(module = %module, command = %name, "Skipping private command");
                continue;
            }
            if name.is_empty() || name.contains(char::is_whitespace) {
                return Err(RegistryError::InvalidName { module, name });
            }

            if let Some(existing) = self.commands.get(&name) {
                let first = existing.module.clone();
                match policy {
                    CollisionPolicy::Reject => {
                        return Err(RegistryError::DuplicateCommand {
                            name,
                            first,
                            second: module,
                        });
                    }
                    CollisionPolicy::KeepFirst => {
                        warn!(
                            command = %name,
                            kept = %first,
                            ignored = %module,
                            "Duplicate command, keeping first registration"
                        );
                        continue;
                    }
                    CollisionPolicy::Overwrite => {
                        warn!(
                            command = %name,
                            replaced = %first,
                            winner = %module,
                            "Duplicate command, last registration wins"
                        );
                    }
                }
            }

            debug!(module = %module, command = %name, "Registered command");
            self.commands.insert(
                name.clone(),
                RegisteredCommand {
                    module: module.clone(),
                    name,
                    handler,
                },
            );
        }

        self.modules.push(module);
        Ok(())
    }

    /// Looks up a command.
    pub fn get(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(name)
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// All command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Modules that took part in the build, in registration order.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Freezes the registry and hands it to `conn`.
    pub fn publish(self, conn: &mut dyn Connection) -> Arc<Self> {
        let registry = Arc::new(self);
        conn.install_commands(Arc::clone(&registry) as Arc<dyn CommandTable>);
        registry
    }
}

impl CommandTable for CommandRegistry {
    fn command_names(&self) -> Vec<&str> {
        self.names()
    }

    fn module_of(&self, command: &str) -> Option<&str> {
        self.get(command).map(|c| c.module.as_str())
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.names())
            .field("modules", &self.modules)
            .finish()
    }
}
