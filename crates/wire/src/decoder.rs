// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resumable request-frame decoder.
//!
//! The decoder is a state machine fed by whatever byte chunks the
//! socket yields. The count byte, a field boundary, or a terminating
//! NUL may all fall on separate read boundaries; progress lives in the
//! struct, never on the call stack, so decoding resumes mid-field
//! across calls to [`Decoder::feed`].

use crate::frame::{MAX_FIELDS, MAX_FRAME_LEN};
use crate::ProtocolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Next byte is the field count
    AwaitingCount,
    /// Next byte starts a new field
    AwaitingFieldStart,
    /// Scanning for the field's terminating NUL
    InField,
    /// A full frame is buffered
    Complete,
}

/// One parsed request frame: string views into the decoder's receive
/// buffer, valid only while the decoder lives and is not reset.
#[derive(Debug, PartialEq, Eq)]
pub struct Frame<'a> {
    pub action: &'a str,
    pub id: &'a str,
    pub args: Vec<&'a str>,
}

/// Streaming decoder with a fixed receive budget of [`MAX_FRAME_LEN`]
/// bytes. One decoder serves one connection for one request.
#[derive(Debug)]
pub struct Decoder {
    buf: Vec<u8>,
    /// Next unexamined byte offset
    scan: usize,
    stage: Stage,
    /// Fields still to be terminated before the frame is complete
    remaining: usize,
    field_start: usize,
    /// Completed field spans (start..end, NUL excluded)
    fields: Vec<(usize, usize)>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(MAX_FRAME_LEN),
            scan: 0,
            stage: Stage::AwaitingCount,
            remaining: 0,
            field_start: 0,
            fields: Vec::new(),
        }
    }

    /// Consume one chunk of received bytes. Returns `Ok(true)` once a
    /// complete frame is buffered; further chunks are ignored. Errors
    /// are fatal for the connection — the caller closes it without a
    /// response.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<bool, ProtocolError> {
        if self.stage == Stage::Complete {
            return Ok(true);
        }
        self.buf.extend_from_slice(chunk);

        while self.scan < self.buf.len() {
            match self.stage {
                Stage::AwaitingCount => {
                    let count = self.buf[self.scan] as usize;
                    self.scan += 1;
                    if count < 2 {
                        return Err(ProtocolError::BadFieldCount(count));
                    }
                    if count > MAX_FIELDS {
                        return Err(ProtocolError::TooManyFields(count));
                    }
                    self.remaining = count;
                    self.stage = Stage::AwaitingFieldStart;
                }
                Stage::AwaitingFieldStart => {
                    self.field_start = self.scan;
                    self.stage = Stage::InField;
                }
                Stage::InField => {
                    if self.buf[self.scan] == 0 {
                        std::str::from_utf8(&self.buf[self.field_start..self.scan])
                            .map_err(|_| ProtocolError::InvalidUtf8)?;
                        self.fields.push((self.field_start, self.scan));
                        self.remaining -= 1;
                        self.stage = if self.remaining == 0 {
                            Stage::Complete
                        } else {
                            Stage::AwaitingFieldStart
                        };
                    }
                    self.scan += 1;
                    if self.stage == Stage::Complete {
                        return Ok(true);
                    }
                }
                Stage::Complete => return Ok(true),
            }
        }

        if self.buf.len() >= MAX_FRAME_LEN {
            // Receive budget exhausted before the frame completed
            return Err(ProtocolError::Oversize);
        }
        Ok(false)
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Complete
    }

    /// Borrow the completed frame, or `None` while mid-parse.
    pub fn frame(&self) -> Option<Frame<'_>> {
        if self.stage != Stage::Complete {
            return None;
        }
        let mut fields = self
            .fields
            .iter()
            .map(|&(start, end)| std::str::from_utf8(&self.buf[start..end]).ok());
        let action = fields.next()??;
        let id = fields.next()??;
        let args = fields.collect::<Option<Vec<_>>>()?;
        Some(Frame { action, id, args })
    }
}

#[cfg(test)]
#[path = "decoder_tests.rs"]
mod tests;
