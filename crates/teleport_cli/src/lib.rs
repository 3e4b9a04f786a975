//! Fire-and-forget client for the game's local teleport endpoint. A missing
//! listener is a normal condition (the game is simply not running with remote
//! control enabled), distinguished from transport faults so callers can log
//! it at low severity.

use std::time::Duration;

use atlas::{teleport_query, SideId};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_PORT: u16 = 32270;
pub const DEFAULT_TIMEOUT_MS: u64 = 1_000;

#[derive(Debug, Clone, PartialEq)]
pub struct TeleportCommand {
    pub port: u16,
    pub timeout_ms: u64,
    pub area_game_id: String,
    pub chapter_game_id: String,
    pub side: SideId,
    pub room_id: String,
    pub x: f32,
    pub y: f32,
}

impl TeleportCommand {
    pub fn query(&self) -> String {
        teleport_query(
            &self.area_game_id,
            &self.chapter_game_id,
            self.side,
            &self.room_id,
            self.x,
            self.y,
        )
    }

    pub fn url(&self) -> String {
        format!("http://localhost:{}/tp?{}", self.port, self.query())
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no teleport listener on localhost:{port}")]
    NoListener { port: u16 },
    #[error("teleport endpoint answered with status {status}")]
    BadStatus { status: u16 },
    #[error("teleport dispatch failed: {detail}")]
    Transport { detail: String },
}

/// Issue the teleport request. Blocks for at most the command's timeout; no
/// response body is read and nothing is retried.
pub fn dispatch(command: &TeleportCommand) -> Result<(), DispatchError> {
    let timeout = Duration::from_millis(command.timeout_ms.max(1));
    let client = reqwest::blocking::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|error| DispatchError::Transport {
            detail: error.to_string(),
        })?;

    let url = command.url();
    debug!(url = %url, "teleport_dispatch_request");
    let response = client.get(&url).send().map_err(|error| {
        if error.is_connect() {
            DispatchError::NoListener { port: command.port }
        } else {
            DispatchError::Transport {
                detail: error.to_string(),
            }
        }
    })?;

    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(DispatchError::BadStatus {
            status: status.as_u16(),
        })
    }
}
