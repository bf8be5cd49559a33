// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot daemon connection: connect, send, read the reply, done.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use warden_wire::{ProtocolError, Response};

/// A freshly restarted daemon may not be listening yet; retry briefly
/// before declaring it unreachable.
const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cannot reach the daemon at {path} (is it running?): {source}")]
    Unreachable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed request: {0}")]
    Encode(#[from] ProtocolError),

    #[error("connection to the daemon failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Send one request and collect the daemon's entire response.
pub async fn send(
    socket: &Path,
    action: &str,
    id: &str,
    args: &[String],
) -> Result<Response, ClientError> {
    let frame = warden_wire::encode_request(action, id, args)?;
    let mut stream = connect(socket).await?;
    stream.write_all(&frame).await?;

    // The daemon answers and closes; read until EOF.
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    Ok(Response::parse(&buf))
}

async fn connect(path: &Path) -> Result<UnixStream, ClientError> {
    let mut attempt = 0;
    loop {
        match UnixStream::connect(path).await {
            Ok(stream) => return Ok(stream),
            Err(source) => {
                attempt += 1;
                if attempt >= CONNECT_ATTEMPTS {
                    return Err(ClientError::Unreachable { path: path.to_path_buf(), source });
                }
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
