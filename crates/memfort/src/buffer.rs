// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! The user-facing locked buffer and its operation set.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mempage::Prot;

use crate::error::BufferError;
use crate::region::GuardedRegion;
use crate::registry;
use crate::shutdown::safe_panic;
use crate::util::{bytes_equal_ct, wipe_bytes};

/// A fixed-length byte buffer held in guarded, locked, non-dumpable memory.
///
/// Buffers start writable; [`mark_as_read_only`](LockedBuffer::mark_as_read_only)
/// flips the underlying pages to read-only OS protection until
/// [`mark_as_read_write`](LockedBuffer::mark_as_read_write) reverses it.
/// Destruction wipes the contents and releases the pages; it happens at most
/// once, triggered by whichever of [`destroy`](LockedBuffer::destroy), a
/// process-wide [`destroy_all`](crate::destroy_all) or the handle going out
/// of scope comes first. A destroyed buffer answers every operation except
/// `destroy` with [`BufferError::Destroyed`].
///
/// The handle is `Send + Sync`; every operation takes the buffer's own mutex,
/// so threads sharing one buffer serialise on it.
pub struct LockedBuffer {
    core: Arc<BufferCore>,
}

pub(crate) struct BufferCore {
    state: Mutex<BufferState>,
}

struct BufferState {
    region: Option<GuardedRegion>,
    read_only: bool,
}

impl BufferCore {
    fn lock_state(&self) -> MutexGuard<'_, BufferState> {
        // A panic mid-operation must not wedge shutdown teardown.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Destroys the buffer behind `core`: wipes and unmaps the region, then
    /// removes the registry entry. Idempotent.
    pub(crate) fn destroy(core: &Arc<BufferCore>) {
        let region = {
            let mut state = core.lock_state();
            state.read_only = false;
            state.region.take()
        };

        if let Some(region) = region {
            region.destroy();
        }

        // The buffer mutex is released by now; registry -> buffer is the
        // only permitted lock order.
        registry::unregister(core);
    }
}

impl LockedBuffer {
    /// Allocates a new writable buffer of `len` bytes, zero-filled.
    ///
    /// Returns [`BufferError::InvalidLength`] for `len == 0`. Platform
    /// refusals (mapping, locking, protection) are fatal rather than
    /// returned.
    pub fn new(len: usize) -> Result<LockedBuffer, BufferError> {
        if len == 0 {
            return Err(BufferError::InvalidLength);
        }

        let region = GuardedRegion::new(len);
        let core = Arc::new(BufferCore {
            state: Mutex::new(BufferState {
                region: Some(region),
                read_only: false,
            }),
        });

        registry::register(Arc::clone(&core));

        Ok(LockedBuffer { core })
    }

    /// Allocates a buffer of `src.len()` bytes and moves `src` into it,
    /// wiping `src`.
    pub fn new_from_bytes(src: &mut [u8]) -> Result<LockedBuffer, BufferError> {
        let buffer = LockedBuffer::new(src.len())?;
        buffer.move_from(src)?;

        Ok(buffer)
    }

    /// Length of the data slot; 0 once destroyed.
    pub fn len(&self) -> usize {
        match self.core.lock_state().region.as_ref() {
            Some(region) => region.len(),
            None => 0,
        }
    }

    /// True once the buffer has been destroyed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the underlying pages are currently read-only.
    pub fn is_read_only(&self) -> bool {
        self.core.lock_state().read_only
    }

    /// Whether the buffer has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.core.lock_state().region.is_none()
    }

    /// Runs `f` over a read view of the buffer contents.
    pub fn open<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Result<R, BufferError> {
        let state = self.core.lock_state();
        let region = state.region.as_ref().ok_or(BufferError::Destroyed)?;

        Ok(f(unsafe { region.data() }))
    }

    /// Runs `f` over a write view of the buffer contents.
    pub fn open_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> Result<R, BufferError> {
        let mut state = self.core.lock_state();
        let read_only = state.read_only;
        let region = state.region.as_mut().ok_or(BufferError::Destroyed)?;

        if read_only {
            return Err(BufferError::ReadOnly);
        }

        Ok(f(unsafe { region.data_mut() }))
    }

    /// Copies `min(self.len(), src.len())` bytes from `src` into the buffer.
    pub fn copy_from(&self, src: &[u8]) -> Result<(), BufferError> {
        self.open_mut(|data| {
            let n = data.len().min(src.len());
            data[..n].copy_from_slice(&src[..n]);
        })
    }

    /// Copies from `src` like [`copy_from`](LockedBuffer::copy_from), then
    /// wipes the whole of `src` — including any suffix that did not fit.
    pub fn move_from(&self, src: &mut [u8]) -> Result<(), BufferError> {
        self.copy_from(src)?;
        wipe_bytes(src);

        Ok(())
    }

    /// Compares the buffer contents against `other` without short-circuiting
    /// on the first mismatch.
    pub fn equal_to(&self, other: &[u8]) -> Result<bool, BufferError> {
        self.open(|data| bytes_equal_ct(data, other))
    }

    /// Marks the underlying pages read-only. No-op if already read-only.
    pub fn mark_as_read_only(&self) -> Result<(), BufferError> {
        let mut state = self.core.lock_state();
        let region = state.region.as_ref().ok_or(BufferError::Destroyed)?;

        if state.read_only {
            return Ok(());
        }

        let protected = region.set_protection(Prot::ReadOnly);
        if protected.is_ok() {
            state.read_only = true;
        }

        // The fatal path re-enters this buffer through destroy_all, so the
        // state guard must be released first.
        drop(state);

        if let Err(e) = protected {
            safe_panic(e);
        }

        Ok(())
    }

    /// Restores read-write page protection. No-op if already writable.
    pub fn mark_as_read_write(&self) -> Result<(), BufferError> {
        let mut state = self.core.lock_state();
        let region = state.region.as_ref().ok_or(BufferError::Destroyed)?;

        if !state.read_only {
            return Ok(());
        }

        let protected = region.set_protection(Prot::ReadWrite);
        if protected.is_ok() {
            state.read_only = false;
        }

        // The fatal path re-enters this buffer through destroy_all, so the
        // state guard must be released first.
        drop(state);

        if let Err(e) = protected {
            safe_panic(e);
        }

        Ok(())
    }

    /// Wipes the contents, verifies the canary, releases the pages and
    /// unregisters the buffer. Idempotent; never fails recoverably.
    pub fn destroy(&self) {
        BufferCore::destroy(&self.core);
    }

    #[cfg(test)]
    pub(crate) fn corrupt_canary_slot(&self) {
        let mut state = self.core.lock_state();
        if let Some(region) = state.region.as_mut() {
            region.clobber_canary_slot();
        }
    }

    #[cfg(test)]
    pub(crate) fn data_slack(&self) -> usize {
        let state = self.core.lock_state();
        state.region.as_ref().map_or(0, |region| region.data_slack())
    }
}

impl Drop for LockedBuffer {
    fn drop(&mut self) {
        BufferCore::destroy(&self.core);
    }
}

/// Creates a fresh buffer holding `buf[offset..offset + size]`.
///
/// The new buffer inherits the source's read-only flag; the source is left
/// untouched. Returns [`BufferError::InvalidLength`] when the bounds fall
/// outside the source or `size == 0`.
pub fn trim(buf: &LockedBuffer, offset: usize, size: usize) -> Result<LockedBuffer, BufferError> {
    if size == 0 {
        return Err(BufferError::InvalidLength);
    }
    let end = offset.checked_add(size).ok_or(BufferError::InvalidLength)?;

    let fresh = LockedBuffer::new(size)?;

    let read_only = {
        let state = buf.core.lock_state();
        let region = state.region.as_ref().ok_or(BufferError::Destroyed)?;
        let data = unsafe { region.data() };

        if end > data.len() {
            return Err(BufferError::InvalidLength);
        }

        fresh.copy_from(&data[offset..end])?;
        state.read_only
    };

    if read_only {
        fresh.mark_as_read_only()?;
    }

    Ok(fresh)
}
