// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Shared byte-slice helpers.

use zeroize::Zeroize;

/// Wipes a byte slice with zeroes.
///
/// Goes through `zeroize` so the writes survive optimisation even when the
/// slice is never read again.
pub fn wipe_bytes(buf: &mut [u8]) {
    buf.zeroize();
}

/// Compares two byte slices without short-circuiting on the first mismatch.
///
/// The fold always visits every byte of `a`, so for a fixed length the
/// running time does not depend on where the slices differ. A length
/// mismatch returns false without touching the contents.
pub(crate) fn bytes_equal_ct(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    diff == 0
}
