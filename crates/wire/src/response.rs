// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response conventions.
//!
//! A response is a single unframed buffer whose first byte tells the
//! client what to do: `-` is an error message, `!` carries a decimal
//! exit code, exactly `ok` is silent success, and anything else is
//! printed verbatim.

/// A daemon response, interpreted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// `"ok"` — success, no output, exit 0
    Ok,
    /// `"-<message>"` — failure; printed (unless quiet), exit 1
    Error(String),
    /// `"!<code>"` — client exits with this code
    ExitCode(i32),
    /// Anything else — printed verbatim, exit 0
    Text(String),
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(message.into())
    }

    pub fn text(body: impl Into<String>) -> Self {
        Response::Text(body.into())
    }

    /// Serialize for the wire.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Response::Ok => b"ok".to_vec(),
            Response::Error(msg) => {
                let mut out = Vec::with_capacity(msg.len() + 1);
                out.push(b'-');
                out.extend_from_slice(msg.as_bytes());
                out
            }
            Response::ExitCode(code) => format!("!{code}").into_bytes(),
            Response::Text(body) => body.as_bytes().to_vec(),
        }
    }

    /// Client-side interpretation of a received buffer.
    ///
    /// Never fails: an unparseable `!` payload and an empty buffer both
    /// degrade to [`Response::Text`], which the client prints verbatim.
    pub fn parse(bytes: &[u8]) -> Response {
        let text = String::from_utf8_lossy(bytes);
        match bytes.first() {
            Some(b'-') => Response::Error(text[1..].to_string()),
            Some(b'!') => match text[1..].trim().parse::<i32>() {
                Ok(code) => Response::ExitCode(code),
                Err(_) => Response::Text(text.into_owned()),
            },
            _ if &*text == "ok" => Response::Ok,
            _ => Response::Text(text.into_owned()),
        }
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
