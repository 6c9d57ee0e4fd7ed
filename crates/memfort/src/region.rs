// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The 3-region guarded layout backing one locked buffer.
//!
//! Address-ascending: one no-access front guard page, the locked inner page
//! set, one no-access rear guard page. Within the inner set the user data
//! occupies the final `len` bytes, preceded immediately by a copy of the
//! process canary; whatever the rounding leaves over sits as padding at the
//! front. An overflow therefore faults on the rear guard at once, and an
//! underflow rewrites the canary copy, which teardown verifies before the
//! pages are released.

use zeroize::Zeroize;

use mempage::{
    advise_no_dump, alloc, free, lock, page_size, protect, round_to_page_size, unlock, PageError,
    Prot,
};

use crate::canary::{canary, CANARY_SIZE};
use crate::error::CanaryViolation;
use crate::shutdown::safe_panic;
use crate::util::bytes_equal_ct;

pub(crate) struct GuardedRegion {
    base: *mut u8,
    total: usize,
    inner: usize,
    len: usize,
}

// Safety: the region exclusively owns its mapping; access is serialised by
// the owning buffer's mutex.
unsafe impl Send for GuardedRegion {}

impl GuardedRegion {
    /// Builds a guarded region for `len >= 1` bytes of user data. Any
    /// platform refusal along the way is fatal.
    pub(crate) fn new(len: usize) -> GuardedRegion {
        let page = page_size();
        let inner = round_to_page_size(len + CANARY_SIZE);
        let total = 2 * page + inner;

        let base = match alloc(total) {
            Ok(base) => base,
            Err(e) => safe_panic(e),
        };

        let mut region = GuardedRegion {
            base,
            total,
            inner,
            len,
        };

        unsafe {
            let inner_ptr = region.inner_ptr();

            if let Err(e) = lock(inner_ptr, inner) {
                safe_panic(e);
            }
            advise_no_dump(inner_ptr, inner);

            if let Err(e) = protect(base, page, Prot::NoAccess) {
                safe_panic(e);
            }
            if let Err(e) = protect(inner_ptr.add(inner), page, Prot::NoAccess) {
                safe_panic(e);
            }

            region.canary_slot_mut().copy_from_slice(canary());
        }

        region
    }

    fn inner_ptr(&self) -> *mut u8 {
        unsafe { self.base.add(page_size()) }
    }

    fn data_ptr(&self) -> *mut u8 {
        unsafe { self.inner_ptr().add(self.inner - self.len) }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Read view of the user data.
    ///
    /// # Safety
    /// The inner pages must currently be readable and the caller must hold
    /// the owning buffer's mutex for the lifetime of the slice.
    pub(crate) unsafe fn data(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.data_ptr(), self.len) }
    }

    /// Write view of the user data.
    ///
    /// # Safety
    /// The inner pages must currently be writable and the caller must hold
    /// the owning buffer's mutex for the lifetime of the slice.
    pub(crate) unsafe fn data_mut(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.data_ptr(), self.len) }
    }

    unsafe fn canary_slot(&self) -> &[u8] {
        unsafe { core::slice::from_raw_parts(self.data_ptr().sub(CANARY_SIZE), CANARY_SIZE) }
    }

    unsafe fn canary_slot_mut(&mut self) -> &mut [u8] {
        unsafe { core::slice::from_raw_parts_mut(self.data_ptr().sub(CANARY_SIZE), CANARY_SIZE) }
    }

    /// Sets the protection of the inner page set.
    ///
    /// A refusal is returned rather than escalated here: the caller holds
    /// the owning buffer's mutex, which must be released before the fatal
    /// path may run.
    pub(crate) fn set_protection(&self, prot: Prot) -> Result<(), PageError> {
        unsafe { protect(self.inner_ptr(), self.inner, prot) }
    }

    /// Verifies the canary, wipes the sensitive bytes and releases the
    /// mapping. Once teardown starts every refusal is fatal.
    pub(crate) fn destroy(mut self) {
        unsafe {
            // Writes must be re-enabled before the canary can be compared
            // and the pages wiped.
            if let Err(e) = protect(self.inner_ptr(), self.inner, Prot::ReadWrite) {
                safe_panic(e);
            }

            if !bytes_equal_ct(self.canary_slot(), canary()) {
                safe_panic(CanaryViolation);
            }

            self.canary_slot_mut().zeroize();
            self.data_mut().zeroize();

            if let Err(e) = unlock(self.inner_ptr(), self.inner) {
                eprintln!("memfort: {e}");
            }

            // Some platforms insist on writable pages at unmap time.
            if let Err(e) = protect(self.base, self.total, Prot::ReadWrite) {
                safe_panic(e);
            }
            if let Err(e) = free(self.base, self.total) {
                safe_panic(e);
            }
        }
    }

    /// Flips one byte of the canary copy, simulating an underflow write.
    #[cfg(test)]
    pub(crate) fn clobber_canary_slot(&mut self) {
        unsafe {
            self.canary_slot_mut()[0] ^= 0xFF;
        }
    }

    /// Distance in bytes from the start of the data slot to the rear guard.
    #[cfg(test)]
    pub(crate) fn data_slack(&self) -> usize {
        self.inner - (self.data_ptr() as usize - self.inner_ptr() as usize)
    }
}
