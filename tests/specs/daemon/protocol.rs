// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol robustness specs: a misbehaving client must never wedge
//! the daemon.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn disconnect_mid_frame_leaves_the_daemon_serving() {
    let sandbox = Sandbox::new();

    // Declare three fields, terminate only one, hang up.
    let mut stream = UnixStream::connect(sandbox.socket_path()).unwrap();
    stream.write_all(&[3, b'x', 0]).unwrap();
    drop(stream);

    assert_eq!(sandbox.list(), "no jobs\n");
}

#[test]
#[serial]
fn malformed_count_byte_gets_no_response() {
    let sandbox = Sandbox::new();

    // A count of zero fields is a protocol error; the daemon closes
    // the connection without answering.
    let mut stream = UnixStream::connect(sandbox.socket_path()).unwrap();
    stream.write_all(&[0]).unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    assert!(buf.is_empty(), "got unexpected response: {buf:?}");

    assert_eq!(sandbox.list(), "no jobs\n");
}

#[test]
#[serial]
fn garbage_after_a_complete_frame_is_ignored() {
    let sandbox = Sandbox::new();

    let mut frame = warden_wire::encode_request("list", "", &[]).unwrap();
    frame.extend_from_slice(b"\xff\xff trailing junk");
    let mut stream = UnixStream::connect(sandbox.socket_path()).unwrap();
    stream.write_all(&frame).unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    assert_eq!(buf, b"no jobs\n");
}
