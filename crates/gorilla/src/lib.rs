//! # Gorilla
//!
//! The command routing core of an IRC bot.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────┐
//!  raw line ─────▶│  LineRouter  │
//!                 └──────┬───────┘
//!        ┌───────────────┼──────────────────┬──────────────┐
//!        ▼               ▼                  ▼              ▼
//!      PING        NumericReplies     NickServHandler   classify ──▶ Dispatcher ──▶ handler
//!        │               │                  │                                         │
//!        └───────────────┴──────────────────┴──────────────▶ Connection ◀─────────────┘
//! ```
//!
//! - **Core**: wire types, the line parser and the [`Connection`](core::Connection) contract
//! - **Framework**: classifier, command registry, dispatcher and the fixed-protocol handlers
//! - **Runtime**: the async line loop, configuration and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gorilla::prelude::*;
//!
//! fn ping(conn: &mut dyn Connection, inv: &CommandInvocation) -> anyhow::Result<()> {
//!     tracing::info!(sender = ?inv.sender, "pong");
//!     Ok(())
//! }
//!
//! command_module! {
//!     pub struct Basics: "basics" {
//!         "ping" => ping,
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = GorillaRuntime::builder().module(Basics).build()?;
//!     let mut conn = MyConnection::connect(&runtime.config().bot).await?;
//!     runtime.run(&mut conn, conn.reader()).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output
//! - `testing`: a recording [`Connection`](core::Connection) for test suites

pub use gorilla_core as core;
pub use gorilla_framework as framework;
pub use gorilla_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use gorilla::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use gorilla_runtime::{GorillaConfig, GorillaRuntime, LineRouter, RouteOutcome};

    // Command modules
    pub use gorilla_framework::{
        CollisionPolicy, CommandModule, CommandRegistry, CommandSet, command_module,
    };

    // Handler inputs
    pub use gorilla_core::{
        AddressingMode, CommandInvocation, Connection, ConnectionError, ConnectionResult,
        ParsedMessage,
    };
}
