// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Chores Daemon (chored)
//!
//! Background process that owns the snapshot. It drives the scheduled
//! passes (a due-date tick on a fixed interval and a reset tick at every
//! local midnight) and applies operations sent by `chores` over its socket.

use std::path::PathBuf;

use chore_core::ScanTrigger;
use chore_daemon::{handle_connection, startup, DaemonConfig, DaemonError};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = args.get(1).map(PathBuf::from);

    // Load configuration
    let config = DaemonConfig::load(config_path.as_deref())?;

    // Write startup marker to log (before tracing setup, so it leads the attempt)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting chored with data at {}", config.data_path.display());

    // Start daemon
    let mut daemon = match startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    // Ticks and client requests run inside the select arms, so they never overlap
    let mut interval = tokio::time::interval(config.tick_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let midnight = tokio::time::sleep(daemon.until_midnight());
    tokio::pin!(midnight);

    info!(
        "Daemon ready on {}, ticking every {:?}",
        config.socket_path.display(),
        config.tick_interval
    );

    // Signal ready for parent process (e.g., systemd)
    println!("READY");

    // Main event loop
    loop {
        tokio::select! {
            _ = interval.tick() => {
                daemon.tick(ScanTrigger::DueDate).await;
            }

            () = &mut midnight => {
                daemon.tick(ScanTrigger::Midnight).await;
                midnight.as_mut().reset(Instant::now() + daemon.until_midnight());
            }

            accepted = daemon.listener.accept() => {
                match accepted {
                    Ok((stream, _)) => {
                        if let Err(e) = handle_connection(&mut daemon, stream).await {
                            warn!("Connection error: {}", e);
                        }
                        if daemon.shutdown_requested {
                            daemon.shutdown();
                            break;
                        }
                    }
                    Err(e) => error!("Accept error: {}", e),
                }
            }

            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                daemon.shutdown();
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                daemon.shutdown();
                break;
            }
        }
    }

    info!("Daemon stopped");
    Ok(())
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- chored: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- chored: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &DaemonConfig) -> Result<(), DaemonError> {
    use std::io::Write;

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Append marker to log file with PID
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{}) ---", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
fn write_startup_error(config: &DaemonConfig, error: &DaemonError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &DaemonConfig,
) -> Result<tracing_appender::non_blocking::WorkerGuard, DaemonError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(DaemonError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(DaemonError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
