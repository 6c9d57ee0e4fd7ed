// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide canary value.
//!
//! The canary is 32 random bytes generated once per process and copied into
//! the slot directly below every data slot. It lives in its own guarded,
//! locked, read-only page set so nothing can rewrite the reference copy.

use std::sync::OnceLock;

use mempage::{alloc, lock, page_size, protect, round_to_page_size, Prot};

use crate::error::EntropyUnavailable;
use crate::shutdown::safe_panic;

/// Number of canary bytes placed directly below each data slot.
pub(crate) const CANARY_SIZE: usize = 32;

struct CanaryCell {
    ptr: *const u8,
}

// Safety: the cell only ever points at the immutable, process-lifetime
// canary page.
unsafe impl Send for CanaryCell {}
unsafe impl Sync for CanaryCell {}

static CANARY: OnceLock<CanaryCell> = OnceLock::new();

/// Returns the process canary, generating it on first use.
///
/// At most one initialisation runs even under concurrent first calls; every
/// failure during initialisation is fatal.
pub(crate) fn canary() -> &'static [u8; CANARY_SIZE] {
    let cell = CANARY.get_or_init(generate);

    unsafe { &*(cell.ptr as *const [u8; CANARY_SIZE]) }
}

fn generate() -> CanaryCell {
    let page = page_size();
    let inner = round_to_page_size(CANARY_SIZE);
    let total = 2 * page + inner;

    let base = match alloc(total) {
        Ok(base) => base,
        Err(e) => safe_panic(e),
    };

    unsafe {
        let inner_ptr = base.add(page);

        if let Err(e) = protect(base, page, Prot::NoAccess) {
            safe_panic(e);
        }
        if let Err(e) = protect(inner_ptr.add(inner), page, Prot::NoAccess) {
            safe_panic(e);
        }
        if let Err(e) = lock(inner_ptr, inner) {
            safe_panic(e);
        }

        // The canary occupies the last CANARY_SIZE bytes of the inner set,
        // flush against the rear guard.
        let slot =
            core::slice::from_raw_parts_mut(inner_ptr.add(inner - CANARY_SIZE), CANARY_SIZE);
        if getrandom::fill(slot).is_err() {
            safe_panic(EntropyUnavailable);
        }

        if let Err(e) = protect(inner_ptr, inner, Prot::ReadOnly) {
            safe_panic(e);
        }

        CanaryCell {
            ptr: slot.as_ptr(),
        }
    }
}
