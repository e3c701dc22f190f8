// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Talking to a running chored

use crate::client::{ClientError, DaemonClient};
use crate::context::Target;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Report whether chored serves this data file
    Status,
    /// Ask chored to exit
    Stop,
}

pub async fn handle(target: &Target, args: DaemonArgs) -> anyhow::Result<()> {
    let socket = target.socket_path();
    let client = match DaemonClient::connect(&socket).await {
        Ok(client) => client,
        Err(ClientError::DaemonNotRunning) => {
            println!("chored is not running");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    match args.command {
        DaemonCommand::Status => {
            let version = client.hello().await?;
            println!("chored {} serving {}", version, socket.display());
        }
        DaemonCommand::Stop => {
            client.shutdown().await?;
            println!("Asked chored to stop");
        }
    }
    Ok(())
}
