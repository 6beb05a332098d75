//! Gorilla Runtime - line loop, configuration and logging for the Gorilla IRC bot.
//!
//! This crate provides:
//! - Per-line routing (`LineRouter`): parse, then hand the line to the
//!   numeric, NickServ or command path
//! - The async line loop (`GorillaRuntime`) with Ctrl+C handling
//! - figment-based configuration (`ConfigLoader`, `GorillaConfig`)
//! - Logging configuration
//!
//! ```ignore
//! use gorilla_runtime::GorillaRuntime;
//! use tokio::io::{BufReader, stdin};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = GorillaRuntime::builder().module(Admin).build()?;
//!     let mut conn = StdoutConnection::new(runtime.config().bot.nick.clone());
//!
//!     runtime.run(&mut conn, BufReader::new(stdin())).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod runtime;

// Re-exports
pub use config::{ConfigError, ConfigLoader, ConfigResult, GorillaConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use router::{LineRouter, RouteOutcome};
pub use runtime::{GorillaRuntime, RunSummary, RuntimeBuilder, StopReason};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
