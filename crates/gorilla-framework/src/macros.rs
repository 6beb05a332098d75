// ─── command_module! ─────────────────────────────────────────────────────────

/// Declares a unit struct implementing [`CommandModule`].
///
/// Each entry maps a command name to a handler path. Handlers are plain
/// functions (or anything `Fn`) taking the connection and the invocation.
///
/// # Syntax
///
/// ```rust
/// use gorilla_core::{CommandInvocation, Connection};
/// use gorilla_framework::command_module;
/// use gorilla_framework::registry::{CollisionPolicy, CommandRegistry};
///
/// fn part(conn: &mut dyn Connection, inv: &CommandInvocation) -> anyhow::Result<()> {
///     conn.part(inv.args.trim())?;
///     Ok(())
/// }
///
/// fn audit(_: &mut dyn Connection, _: &CommandInvocation) -> anyhow::Result<()> {
///     Ok(())
/// }
///
/// command_module! {
///     /// Channel management.
///     pub struct Admin: "admin" {
///         "part" => part,
///         "_audit" => audit,
///     }
/// }
///
/// let registry = CommandRegistry::build(&[&Admin], CollisionPolicy::Reject).unwrap();
/// assert!(registry.contains("part"));
/// assert!(!registry.contains("_audit"));
/// ```
///
/// Names starting with `_` are passed to the registry like any other and
/// skipped there.
///
/// [`CommandModule`]: crate::registry::CommandModule
#[macro_export]
macro_rules! command_module {
    (
        $(#[$attr:meta])*
        $vis:vis struct $ty:ident : $module:literal {
            $( $command:literal => $handler:path ),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $ty;

        impl $crate::registry::CommandModule for $ty {
            fn name(&self) -> &str {
                $module
            }

            fn register(&self, commands: &mut $crate::registry::CommandSet) {
                $( commands.command($command, $handler); )*
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::registry::{CollisionPolicy, CommandModule, CommandRegistry};
    use gorilla_core::{CommandInvocation, Connection};

    fn noop(_: &mut dyn Connection, _: &CommandInvocation) -> anyhow::Result<()> {
        Ok(())
    }

    command_module! {
        struct Sample: "sample" {
            "one" => noop,
            "two" => noop,
            "_hidden" => noop,
        }
    }

    command_module! {
        struct Nothing: "nothing" {}
    }

    #[test]
    fn test_generated_module() {
        assert_eq!(Sample.name(), "sample");

        let registry = CommandRegistry::build(&[&Sample, &Nothing], CollisionPolicy::Reject).unwrap();
        assert_eq!(registry.names(), vec!["one", "two"]);
        assert_eq!(registry.modules(), &["sample", "nothing"]);
    }
}
