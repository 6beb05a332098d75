//! The line loop.
//!
//! [`GorillaRuntime`] owns the [`LineRouter`] and feeds it one line at a time
//! from any `AsyncBufRead`. It stops on end of input, on a fatal numeric reply,
//! when the connection reports itself closed, or on a shutdown signal.
//!
//! Lines are decoded lossily: bytes that are not UTF-8 become U+FFFD and the
//! line is still routed.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gorilla_runtime::GorillaRuntime;
//!
//! let runtime = GorillaRuntime::builder()
//!     .config_file("gorilla.toml")
//!     .module(Admin)
//!     .module(Greetings)
//!     .build()?;
//!
//! let summary = runtime.run(&mut conn, tokio::io::BufReader::new(tokio::io::stdin())).await?;
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use gorilla_core::{CommandTable, Connection};
use gorilla_framework::{CommandModule, CommandRegistry};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::signal;
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigLoader, GorillaConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;
use crate::router::LineRouter;

/// Why the line loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The line source was exhausted.
    EndOfInput,
    /// A fatal numeric reply closed the connection.
    Fatal,
    /// A handler shut the connection down.
    Closed,
    /// A shutdown signal was received.
    Interrupted,
}

/// Summary of one run of the line loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    /// Lines handed to the router.
    pub lines: u64,
}

/// Drives a [`LineRouter`] from a stream of lines.
#[derive(Debug)]
pub struct GorillaRuntime {
    config: GorillaConfig,
    router: LineRouter,
}

impl GorillaRuntime {
    /// Creates a runtime builder for custom configuration.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration.
    ///
    /// Validates `config`, initializes logging from it and builds the command
    /// registry from `modules` under the configured collision policy.
    pub fn from_config(
        config: &GorillaConfig,
        modules: &[&dyn CommandModule],
    ) -> RuntimeResult<Self> {
        validate_config(config)?;
        logging::init_from_config(&config.logging);

        let registry = CommandRegistry::build(modules, config.commands.collision_policy)?;
        let router = LineRouter::from_settings(&config.bot, Arc::new(registry));

        info!(
            nick = %config.bot.nick,
            log_level = %config.logging.level,
            "Runtime initialized from configuration"
        );

        Ok(Self {
            config: config.clone(),
            router,
        })
    }

    /// Creates a runtime around a prepared router.
    pub fn with_router(config: GorillaConfig, router: LineRouter) -> Self {
        Self { config, router }
    }

    /// The configuration this runtime was built from.
    pub fn config(&self) -> &GorillaConfig {
        &self.config
    }

    /// The router each line is handed to.
    pub fn router(&self) -> &LineRouter {
        &self.router
    }

    /// Runs until end of input, a fatal reply, a closed connection, Ctrl+C or
    /// SIGTERM.
    pub async fn run<C, R>(&self, conn: &mut C, reader: R) -> RuntimeResult<RunSummary>
    where
        C: Connection,
        R: AsyncBufRead + Unpin,
    {
        info!("Gorilla is now running. Press Ctrl+C to stop.");
        self.run_until(conn, reader, shutdown_signal()).await
    }

    /// Runs until end of input, a fatal reply, a closed connection, or
    /// `shutdown` completes.
    pub async fn run_until<C, R, F>(
        &self,
        conn: &mut C,
        mut reader: R,
        shutdown: F,
    ) -> RuntimeResult<RunSummary>
    where
        C: Connection,
        R: AsyncBufRead + Unpin,
        F: Future<Output = ()>,
    {
        conn.install_commands(self.router.dispatcher().registry() as Arc<dyn CommandTable>);

        let mut buf = Vec::new();
        let mut routed = 0u64;
        tokio::pin!(shutdown);

        let reason = loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!("Received shutdown signal, stopping");
                    break StopReason::Interrupted;
                }
                read = reader.read_until(b'\n', &mut buf) => {
                    if read? == 0 {
                        info!("End of input");
                        break StopReason::EndOfInput;
                    }
                    routed += 1;
                    let outcome = {
                        let line = String::from_utf8_lossy(&buf);
                        if matches!(line, Cow::Owned(_)) {
                            trace!("Replaced invalid UTF-8 in line");
                        }
                        self.router.route(conn, line.trim_end_matches(['\r', '\n']))
                    };
                    buf.clear();

                    if outcome.is_fatal() {
                        warn!("Connection closed by fatal reply");
                        break StopReason::Fatal;
                    }
                    if conn.is_closed() {
                        info!("Connection shut down, stopping");
                        break StopReason::Closed;
                    }
                }
            }
        };

        debug!(lines = routed, ?reason, "Line loop stopped");
        Ok(RunSummary {
            reason,
            lines: routed,
        })
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix. Never resolves if no handler
/// could be installed.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    () = ctrl_c() => {}
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                }
            }
            Err(e) => {
                warn!("Failed to register SIGTERM handler: {e}");
                ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for creating a `GorillaRuntime` from configuration and modules.
///
/// ```rust,ignore
/// let runtime = GorillaRuntime::builder()
///     .config_file("config/production.toml")
///     .profile("production")
///     .module(Admin)
///     .build()?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    modules: Vec<Box<dyn CommandModule>>,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            modules: Vec::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges programmatic defaults.
    pub fn merge(mut self, config: GorillaConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Adds a command module. Modules register in the order they are added.
    pub fn module<M: CommandModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Loads the configuration and builds the runtime.
    pub fn build(self) -> RuntimeResult<GorillaRuntime> {
        let config = self.config_loader.load()?;
        let modules: Vec<&dyn CommandModule> = self.modules.iter().map(|m| m.as_ref()).collect();
        GorillaRuntime::from_config(&config, &modules)
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;
    use gorilla_core::CommandInvocation;
    use gorilla_core::testing::{ConnectionCall, RecordingConnection};
    use gorilla_framework::{CollisionPolicy, CommandSet, RegistryError};
    use tokio::io::BufReader;

    struct Channels;

    impl CommandModule for Channels {
        fn name(&self) -> &str {
            "channels"
        }

        fn register(&self, commands: &mut CommandSet) {
            commands.command("part", |conn: &mut dyn Connection, inv: &CommandInvocation| {
                conn.part(inv.args.trim())?;
                Ok(())
            });
        }
    }

    struct MoreChannels;

    impl CommandModule for MoreChannels {
        fn name(&self) -> &str {
            "more_channels"
        }

        fn register(&self, commands: &mut CommandSet) {
            commands.command("part", |_: &mut dyn Connection, _: &CommandInvocation| Ok(()));
        }
    }

    struct Shutdown;

    impl CommandModule for Shutdown {
        fn name(&self) -> &str {
            "shutdown"
        }

        fn register(&self, commands: &mut CommandSet) {
            commands.command("quit", |conn: &mut dyn Connection, _: &CommandInvocation| {
                conn.quit()?;
                conn.shut_down()?;
                Ok(())
            });
        }
    }

    fn config() -> GorillaConfig {
        let mut config = GorillaConfig::default();
        config.bot.nick = "bot".to_string();
        config
    }

    fn runtime() -> GorillaRuntime {
        GorillaRuntime::from_config(&config(), &[&Channels]).unwrap()
    }

    #[tokio::test]
    async fn test_runs_to_end_of_input() {
        let reader = tokio_test::io::Builder::new()
            .read(b"PING :irc.example.net\r\n")
            .read(b":alice!a@host PRIVMSG #chan :!part #chan\r\n")
            .read(b":alice!a@host PRIVMSG #chan :just chatting\r\n")
            .build();
        let mut conn = RecordingConnection::new("bot");

        let summary = runtime()
            .run_until(&mut conn, BufReader::new(reader), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::EndOfInput);
        assert_eq!(summary.lines, 3);
        assert_eq!(
            &conn.calls()[1..],
            &[
                ConnectionCall::Pong("irc.example.net".into()),
                ConnectionCall::Part("#chan".into())
            ]
        );
    }

    #[tokio::test]
    async fn test_commands_installed_on_start() {
        let mut conn = RecordingConnection::new("bot");

        runtime()
            .run_until(&mut conn, &b""[..], std::future::pending())
            .await
            .unwrap();

        assert_eq!(
            conn.calls(),
            &[ConnectionCall::InstallCommands(vec!["part".into()])]
        );
    }

    #[tokio::test]
    async fn test_fatal_reply_stops_loop() {
        let reader = tokio_test::io::Builder::new()
            .read(
                b":irc.example.net 433 * bot :Nickname is already in use\r\n\
                  :alice!a@host PRIVMSG #chan :!part #chan\r\n",
            )
            .build();
        let mut conn = RecordingConnection::new("bot");

        let summary = runtime()
            .run_until(&mut conn, BufReader::new(reader), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::Fatal);
        assert_eq!(summary.lines, 1);
        assert_eq!(conn.count(&ConnectionCall::Quit), 1);
        assert_eq!(conn.count(&ConnectionCall::ShutDown), 1);
        assert_eq!(conn.count(&ConnectionCall::Part("#chan".into())), 0);
    }

    #[tokio::test]
    async fn test_shutdown_future_stops_loop() {
        let mut conn = RecordingConnection::new("bot");

        let summary = runtime()
            .run_until(
                &mut conn,
                &b":alice!a@host PRIVMSG #chan :!part #chan\r\n"[..],
                std::future::ready(()),
            )
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::Interrupted);
        assert_eq!(summary.lines, 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_loop() {
        let reader = tokio_test::io::Builder::new()
            .read(b":alice!a@host PRIVMSG #chan :caf\xe9\r\n")
            .read(b":alice!a@host PRIVMSG #chan :!part #chan\r\n")
            .build();
        let mut conn = RecordingConnection::new("bot");

        let summary = runtime()
            .run_until(&mut conn, BufReader::new(reader), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::EndOfInput);
        assert_eq!(summary.lines, 2);
        assert_eq!(conn.count(&ConnectionCall::Part("#chan".into())), 1);
    }

    #[tokio::test]
    async fn test_invalid_utf8_in_arguments_kept() {
        let reader = tokio_test::io::Builder::new()
            .read(b":alice!a@host PRIVMSG #chan :!part #caf\xe9\r\n")
            .build();
        let mut conn = RecordingConnection::new("bot");

        runtime()
            .run_until(&mut conn, BufReader::new(reader), std::future::pending())
            .await
            .unwrap();

        assert_eq!(conn.count(&ConnectionCall::Part("#caf\u{FFFD}".into())), 1);
    }

    #[tokio::test]
    async fn test_handler_shut_down_stops_loop() {
        let reader = tokio_test::io::Builder::new()
            .read(b":alice!a@host PRIVMSG #chan :!quit\r\n")
            .read(b"PING :x\r\n")
            .read(b"PING :y\r\n")
            .build();
        let mut conn = RecordingConnection::new("bot");

        let summary = GorillaRuntime::from_config(&config(), &[&Shutdown])
            .unwrap()
            .run_until(&mut conn, BufReader::new(reader), std::future::pending())
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::Closed);
        assert_eq!(summary.lines, 1);
        assert_eq!(
            &conn.calls()[1..],
            &[ConnectionCall::Quit, ConnectionCall::ShutDown]
        );
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let reader = tokio_test::io::Builder::new()
            .read_error(std::io::Error::other("connection reset"))
            .build();
        let mut conn = RecordingConnection::new("bot");

        let result = runtime()
            .run_until(&mut conn, BufReader::new(reader), std::future::pending())
            .await;

        assert!(matches!(result, Err(RuntimeError::Io(_))));
    }

    #[test]
    fn test_collision_policy_from_config() {
        let mut config = config();
        config.commands.collision_policy = CollisionPolicy::Reject;

        let result = GorillaRuntime::from_config(&config, &[&Channels, &MoreChannels]);
        assert!(matches!(
            result,
            Err(RuntimeError::Registry(RegistryError::DuplicateCommand { .. }))
        ));

        config.commands.collision_policy = CollisionPolicy::KeepFirst;
        let runtime = GorillaRuntime::from_config(&config, &[&Channels, &MoreChannels]).unwrap();
        let registry = runtime.router().dispatcher().registry();
        assert_eq!(registry.module_of("part"), Some("channels"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = config();
        config.bot.nick = "9lives".to_string();

        let result = GorillaRuntime::from_config(&config, &[]);
        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }
}
