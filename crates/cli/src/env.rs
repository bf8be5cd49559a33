// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the client.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[error("Could not determine state directory (set WARDEN_STATE_DIR or HOME)")]
pub struct NoStateDir;

/// Control socket path, resolved the same way the daemon resolves it:
/// WARDEN_STATE_DIR > XDG_STATE_HOME/warden > ~/.local/state/warden
pub fn socket_path() -> Result<PathBuf, NoStateDir> {
    Ok(state_dir()?.join("daemon.sock"))
}

fn state_dir() -> Result<PathBuf, NoStateDir> {
    if let Ok(dir) = std::env::var("WARDEN_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("warden"));
    }
    let home = std::env::var("HOME").map_err(|_| NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/warden"))
}
