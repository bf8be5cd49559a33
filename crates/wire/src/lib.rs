// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol for daemon communication.
//!
//! Request wire format: one count byte `N`, then `N` NUL-terminated
//! string fields in order `action`, `id`, `arg0..argK-1` (so
//! `N = K + 2`). Responses are a single unframed buffer interpreted by
//! its first byte; see [`Response`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod decoder;
mod frame;
mod response;

pub use decoder::{Decoder, Frame};
pub use frame::{encode_request, MAX_FIELDS, MAX_FRAME_LEN};
pub use response::Response;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Errors from encoding, decoding, or socket I/O.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("field contains a NUL byte")]
    EmbeddedNul,

    #[error("frame declares {0} fields, at most {MAX_FIELDS} accepted")]
    TooManyFields(usize),

    #[error("frame declares {0} fields, at least 2 (action, id) required")]
    BadFieldCount(usize),

    #[error("frame exceeds {MAX_FRAME_LEN} bytes")]
    Oversize,

    #[error("field is not valid UTF-8")]
    InvalidUtf8,

    #[error("peer closed the connection mid-frame")]
    ConnectionClosed,

    #[error("timed out waiting for the peer")]
    Timeout,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read one complete request frame into `decoder`, tolerating arbitrary
/// read fragmentation. Returns once the decoder holds a full frame;
/// access it with [`Decoder::frame`].
pub async fn read_frame<R>(
    reader: &mut R,
    decoder: &mut Decoder,
    timeout: std::time::Duration,
) -> Result<(), ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 512];
    loop {
        let n = tokio::time::timeout(timeout, reader.read(&mut chunk))
            .await
            .map_err(|_| ProtocolError::Timeout)??;
        if n == 0 {
            return Err(ProtocolError::ConnectionClosed);
        }
        if decoder.feed(&chunk[..n])? {
            return Ok(());
        }
    }
}

/// Write a response buffer and flush it.
pub async fn write_response<W>(
    writer: &mut W,
    response: &Response,
    timeout: std::time::Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let bytes = response.to_bytes();
    tokio::time::timeout(timeout, async {
        writer.write_all(&bytes).await?;
        writer.flush().await
    })
    .await
    .map_err(|_| ProtocolError::Timeout)??;
    Ok(())
}
