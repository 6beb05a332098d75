//! Gorilla Bot Demo
//!
//! Reads raw IRC lines from stdin, routes them through Gorilla, and writes the
//! resulting protocol commands to stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! printf ':alice!a@host PRIVMSG #chan :!part #chan\r\n' | cargo run --package gorilla-bot
//! cargo run --package gorilla-bot -- --nick banana --password hunter2 < session.log
//! ```

mod connection;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use gorilla::prelude::*;
use gorilla::runtime::config::{ConfigLoader, LogOutput};
use tokio::io::{BufReader, stdin};
use tracing::info;

use connection::LineConnection;

#[derive(Debug, Parser)]
#[command(version, about = "Route raw IRC lines from stdin through Gorilla")]
struct Args {
    /// Configuration file (defaults to searching for gorilla.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile
    #[arg(short, long)]
    profile: Option<String>,

    /// Override the bot nickname
    #[arg(short, long)]
    nick: Option<String>,

    /// NickServ password
    #[arg(long, env = "GORILLA_PASSWORD")]
    password: Option<String>,
}

// ============================================================================
// Command Handlers
// ============================================================================

/// `part [channel]`: leave the named channel, or the one the command came from.
fn part(conn: &mut dyn Connection, inv: &CommandInvocation) -> anyhow::Result<()> {
    let channel = inv
        .arg_list()
        .first()
        .copied()
        .or(inv.target.as_deref().filter(|t| t.starts_with('#')))
        .ok_or_else(|| anyhow::anyhow!("no channel to part from"))?;
    conn.part(channel)?;
    Ok(())
}

fn quit(conn: &mut dyn Connection, inv: &CommandInvocation) -> anyhow::Result<()> {
    info!(by = ?inv.sender, "Quit requested");
    conn.quit()?;
    conn.shut_down()?;
    Ok(())
}

fn whoami(_: &mut dyn Connection, inv: &CommandInvocation) -> anyhow::Result<()> {
    info!(
        sender = inv.sender.as_deref().unwrap_or("?"),
        prefix = inv.sender_prefix.as_deref().unwrap_or("?"),
        mode = %inv.addressing_mode,
        "whoami"
    );
    Ok(())
}

fn echo(_: &mut dyn Connection, inv: &CommandInvocation) -> anyhow::Result<()> {
    info!(reply_to = inv.reply_target().unwrap_or("?"), "{}", inv.args);
    Ok(())
}

command_module! {
    /// Channel membership and shutdown.
    pub struct Admin: "admin" {
        "part" => part,
        "quit" => quit,
    }
}

command_module! {
    pub struct Basics: "basics" {
        "whoami" => whoami,
        "echo" => echo,
        "_echo_raw" => echo,
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Protocol output owns stdout
    let mut defaults = GorillaConfig::default();
    defaults.logging.output = LogOutput::Stderr;

    let mut loader = ConfigLoader::new().merge(defaults);
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }
    let mut config = loader.load()?;
    if let Some(nick) = args.nick {
        config.bot.nick = nick;
    }

    let runtime = GorillaRuntime::from_config(&config, &[&Admin, &Basics])?;

    let mut conn =
        LineConnection::new(config.bot.nick.clone(), std::io::stdout()).with_password(args.password);

    let summary = runtime.run(&mut conn, BufReader::new(stdin())).await?;
    info!(
        lines = summary.lines,
        reason = ?summary.reason,
        commands = ?conn.command_names(),
        "Stopped"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gorilla::core::testing::{ConnectionCall, RecordingConnection};

    fn route(line: &str) -> (RouteOutcome, RecordingConnection) {
        let registry = CommandRegistry::build(&[&Admin, &Basics], CollisionPolicy::Reject).unwrap();
        let router = LineRouter::new(std::sync::Arc::new(registry));
        let mut conn = RecordingConnection::new("bot");
        let outcome = router.route(&mut conn, line);
        (outcome, conn)
    }

    #[test]
    fn test_part_defaults_to_current_channel() {
        let (_, conn) = route(":alice!a@host PRIVMSG #chan :!part");
        assert_eq!(conn.calls(), &[ConnectionCall::Part("#chan".into())]);
    }

    #[test]
    fn test_part_named_channel() {
        let (_, conn) = route(":alice!a@host PRIVMSG bot :part #other");
        assert_eq!(conn.calls(), &[ConnectionCall::Part("#other".into())]);
    }

    #[test]
    fn test_quit_shuts_down() {
        let (_, conn) = route(":alice!a@host PRIVMSG #chan :bot: quit");
        assert_eq!(conn.calls(), &[ConnectionCall::Quit, ConnectionCall::ShutDown]);
    }

    #[test]
    fn test_private_helper_not_exposed() {
        let (outcome, _) = route(":alice!a@host PRIVMSG #chan :!_echo_raw hi");
        assert_eq!(
            outcome,
            RouteOutcome::Command(gorilla::framework::DispatchOutcome::Unknown)
        );
    }
}
