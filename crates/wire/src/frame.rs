// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request frame encoding.

use crate::ProtocolError;

/// Maximum serialized frame size, count byte included. A frame that
/// would not fit the receiver's buffer is a protocol error, not a
/// silent truncation.
pub const MAX_FRAME_LEN: usize = 4096;

/// Maximum number of fields (action + id + args) a frame may declare.
/// Frames exceeding it are rejected, not silently trimmed.
pub const MAX_FIELDS: usize = 64;

/// Encode a request frame: count byte `args.len() + 2`, then `action`,
/// `id` and each argument, NUL-terminated. `id` may be empty (still
/// NUL-terminated). Fields must not contain NUL bytes — there is no
/// escaping on this wire.
pub fn encode_request(action: &str, id: &str, args: &[String]) -> Result<Vec<u8>, ProtocolError> {
    let fields = args.len() + 2;
    if fields > MAX_FIELDS {
        return Err(ProtocolError::TooManyFields(fields));
    }

    let mut out = Vec::with_capacity(
        1 + action.len() + id.len() + args.iter().map(|a| a.len() + 1).sum::<usize>() + 2,
    );
    out.push(fields as u8);
    for field in std::iter::once(action).chain(std::iter::once(id)).chain(args.iter().map(String::as_str)) {
        if field.as_bytes().contains(&0) {
            return Err(ProtocolError::EmbeddedNul);
        }
        out.extend_from_slice(field.as_bytes());
        out.push(0);
    }

    if out.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::Oversize);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
