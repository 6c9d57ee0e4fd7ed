// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use crate::util::{bytes_equal_ct, wipe_bytes};

#[test]
fn test_wipe_bytes_zeroes_the_slice() {
    let mut buf = *b"yellow submarine";

    wipe_bytes(&mut buf);

    assert_eq!(buf, [0u8; 16]);
}

#[test]
fn test_wipe_bytes_on_empty_slice() {
    let mut buf: [u8; 0] = [];

    wipe_bytes(&mut buf);
}

#[test]
fn test_bytes_equal_ct_on_equal_slices() {
    assert!(bytes_equal_ct(b"", b""));
    assert!(bytes_equal_ct(b"a", b"a"));
    assert!(bytes_equal_ct(b"yellow submarine", b"yellow submarine"));
}

#[test]
fn test_bytes_equal_ct_detects_any_mismatch_position() {
    let reference = *b"yellow submarine";

    for i in 0..reference.len() {
        let mut other = reference;
        other[i] ^= 0x01;
        assert!(!bytes_equal_ct(&reference, &other), "missed flip at {i}");
    }
}

#[test]
fn test_bytes_equal_ct_on_length_mismatch() {
    assert!(!bytes_equal_ct(b"test", b"toast"));
    assert!(!bytes_equal_ct(b"test", b"tes"));
    assert!(!bytes_equal_ct(b"", b"x"));
}
