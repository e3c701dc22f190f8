// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use chore_core::Clock;
use thiserror::Error;
use tokio::net::UnixStream;
use tracing::{debug, error, info, warn};

use crate::lifecycle::Daemon;
use crate::operation::execute;
use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// Handle a single client connection
pub async fn handle_connection<C: Clock>(
    daemon: &mut Daemon<C>,
    stream: UnixStream,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    let response = handle_request(daemon, request).await;

    debug!("Sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT)
        .await
        .map_err(ServerError::Protocol)?;

    Ok(())
}

/// Answer one request against the daemon's orchestrator
pub async fn handle_request<C: Clock>(daemon: &mut Daemon<C>, request: Request) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version } => {
            if version != PROTOCOL_VERSION {
                warn!(client = %version, daemon = PROTOCOL_VERSION, "client version differs");
            }
            Response::Hello {
                version: PROTOCOL_VERSION.to_string(),
            }
        }

        Request::Run { operation } => {
            let read = operation.is_read();
            match execute(&daemon.orchestrator, operation).await {
                Ok((outcome, events)) => {
                    if !read {
                        info!(events = events.len(), "operation applied");
                    }
                    Response::Applied { outcome, events }
                }
                Err(e) => {
                    warn!("operation rejected: {}", e);
                    Response::Error {
                        message: e.to_string(),
                    }
                }
            }
        }

        Request::Shutdown => {
            info!("Shutdown requested by client");
            daemon.shutdown_requested = true;
            Response::ShuttingDown
        }
    }
}

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
