// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration from `chored.toml`

use crate::lifecycle::DaemonError;
use chore_engine::EngineConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "chored.toml";
const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Resolved daemon settings; every path is absolute or state-dir relative
#[derive(Debug, Clone, PartialEq)]
pub struct DaemonConfig {
    /// Snapshot file holding the chore record set
    pub data_path: PathBuf,
    /// Daemon log file
    pub log_path: PathBuf,
    /// Lock/PID file
    pub pid_path: PathBuf,
    /// Unix socket `chores` connects to
    pub socket_path: PathBuf,
    /// Optional append-only journal of announced events
    pub journal_path: Option<PathBuf>,
    /// Period of the due-date tick
    pub tick_interval: Duration,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    pub engine: EngineConfig,
}

/// On-disk shape; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    data_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    pid_path: Option<PathBuf>,
    socket_path: Option<PathBuf>,
    journal_path: Option<PathBuf>,
    #[serde(with = "humantime_serde")]
    tick_interval: Option<Duration>,
    log_level: Option<String>,
    engine: EngineConfig,
}

impl DaemonConfig {
    /// Defaults with every file under `state_dir`
    pub fn rooted_at(state_dir: &Path) -> Self {
        let data_path = state_dir.join("chores.json");
        Self {
            socket_path: socket_path_for(&data_path),
            data_path,
            log_path: state_dir.join("chored.log"),
            pid_path: state_dir.join("chored.pid"),
            journal_path: None,
            tick_interval: DEFAULT_TICK_INTERVAL,
            log_level: "info".to_string(),
            engine: EngineConfig::default(),
        }
    }

    /// Parse a config file. Relative paths resolve against `base_dir`;
    /// anything unset falls back to `state_dir` defaults.
    pub fn from_toml(text: &str, base_dir: &Path, state_dir: &Path) -> Result<Self, DaemonError> {
        let file: ConfigFile = toml::from_str(text)?;
        let defaults = Self::rooted_at(state_dir);
        let resolve = |path: PathBuf| base_dir.join(path);

        let tick_interval = file.tick_interval.unwrap_or(defaults.tick_interval);
        if tick_interval.is_zero() {
            return Err(DaemonError::ZeroTickInterval);
        }

        let data_path = file.data_path.map_or(defaults.data_path, resolve);
        Ok(Self {
            socket_path: file
                .socket_path
                .map_or_else(|| socket_path_for(&data_path), resolve),
            data_path,
            log_path: file.log_path.map_or(defaults.log_path, resolve),
            pid_path: file.pid_path.map_or(defaults.pid_path, resolve),
            journal_path: file.journal_path.map(resolve),
            tick_interval,
            log_level: file.log_level.unwrap_or(defaults.log_level),
            engine: file.engine,
        })
    }

    /// Load from `path`, or `chored.toml` in the state dir.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn load(path: Option<&Path>) -> Result<Self, DaemonError> {
        let state_dir = state_dir()?;
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = state_dir.join(CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::rooted_at(&state_dir));
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)?;
        let base_dir = path.parent().unwrap_or(Path::new("."));
        Self::from_toml(&text, base_dir, &state_dir)
    }
}

/// Socket a daemon serving `data_path` listens on unless configured otherwise
pub fn socket_path_for(data_path: &Path) -> PathBuf {
    data_path.with_extension("sock")
}

/// State directory for chored
///
/// `CHORES_STATE_DIR` wins, then `XDG_STATE_HOME`, then `~/.local/state`.
pub fn state_dir() -> Result<PathBuf, DaemonError> {
    if let Ok(dir) = std::env::var("CHORES_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("chores"));
    }

    let home = std::env::var("HOME").map_err(|_| DaemonError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/chores"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
