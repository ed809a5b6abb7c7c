// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! agentd — agent chat daemon
//!
//! Per-participant background process: registers in the shared registry,
//! accepts control commands and peer messages on its endpoint, and
//! broadcasts join/leave to the rest of the fabric.

use std::path::PathBuf;
use std::sync::Arc;

use chat_core::AgentProfile;
use chat_daemon::lifecycle::{self, Config, StartupResult};
use chat_daemon::listener::Listener;
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;

/// Agent daemon for multi-agent communication
#[derive(Parser)]
#[command(name = "agentd", version)]
struct Args {
    /// Agent name (unique across the fabric)
    #[arg(long)]
    name: String,

    /// Agent context (e.g. project/repo)
    #[arg(long)]
    context: String,

    /// Agent self-presentation, broadcast as the content of the join
    #[arg(long)]
    presentation: String,

    /// Working directory for unread notifications (default: the daemon's own)
    #[arg(long)]
    cwd: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let profile = AgentProfile::new(args.name, args.context, args.presentation);
    let config = Config::load(profile, args.cwd)?;

    let _log_guard = setup_logging(&config)?;

    info!("starting agent '{}'", config.profile.name);

    // Signal handlers go in before the registry is touched, so a signal
    // during startup still runs the graceful teardown path
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let StartupResult { state, listener } = lifecycle::startup(&config).await?;

    info!("agent ready, listening on {}", config.endpoint.display());

    let listener_task = tokio::spawn(Listener::new(listener, Arc::clone(&state)).run());

    tokio::select! {
        _ = state.shutdown.cancelled() => {
            info!("shutdown requested via command");
        }
        _ = sigterm.recv() => {
            info!("received SIGTERM, shutting down...");
        }
        _ = sigint.recv() => {
            info!("received SIGINT, shutting down...");
        }
    }

    lifecycle::shutdown(&state).await;
    let _ = listener_task.await;

    info!("agent stopped");
    Ok(())
}

fn setup_logging(
    config: &Config,
) -> std::io::Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let dir = config.log_path.parent().unwrap_or(&config.chat_dir);
    std::fs::create_dir_all(dir)?;
    let file = config
        .log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("agent.log"));

    let file_appender = tracing_appender::rolling::never(dir, file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
