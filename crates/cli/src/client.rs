// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chore_core::ChoreEvent;
use chore_daemon::protocol::{self, ProtocolError, PROTOCOL_VERSION};
use chore_daemon::{Operation, Outcome, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for one request and its response
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("CHORES_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// How long to wait for a starting daemon to bind its socket
pub fn timeout_connect() -> Duration {
    parse_duration_ms("CHORES_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("CHORES_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running")]
    DaemonNotRunning,

    #[error("Timed out waiting for chored on {0}")]
    ConnectTimeout(PathBuf),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The daemon refused the operation; carries its reason verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to a daemon listening on `socket_path`
    ///
    /// A socket file nobody answers on was left by a daemon that died.
    pub async fn connect(socket_path: &Path) -> Result<Self, ClientError> {
        match UnixStream::connect(socket_path).await {
            Ok(_) => Ok(Self {
                socket_path: socket_path.to_path_buf(),
            }),
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                Err(ClientError::DaemonNotRunning)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Keep trying until a daemon answers or `timeout` passes
    pub async fn connect_with_retry(
        socket_path: &Path,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match Self::connect(socket_path).await {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => tokio::time::sleep(poll_interval()).await,
                Err(e) => return Err(e),
            }
        }
        Err(ClientError::ConnectTimeout(socket_path.to_path_buf()))
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send a request and receive a response with specific timeouts
    async fn send_with_timeout(
        &self,
        request: &Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol::encode(request)?;
        tokio::time::timeout(write_timeout, protocol::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes =
            tokio::time::timeout(read_timeout, protocol::read_message(&mut reader))
                .await
                .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol::decode(&response_bytes)?)
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        self.send_with_timeout(request, timeout_ipc(), timeout_ipc())
            .await
    }

    /// Apply an operation on the daemon's snapshot
    pub async fn run(
        &self,
        operation: Operation,
    ) -> Result<(Outcome, Vec<ChoreEvent>), ClientError> {
        match self.send(&Request::Run { operation }).await? {
            Response::Applied { outcome, events } => Ok((outcome, events)),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Get daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let hello = Request::Hello {
            version: PROTOCOL_VERSION.to_string(),
        };
        match self.send(&hello).await? {
            Response::Hello { version } => Ok(version),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(&Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
