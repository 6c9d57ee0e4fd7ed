// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Process-wide registry of live buffers.
//!
//! The registry mutex is held only for insert, remove and snapshot, never
//! across per-buffer work, so the lock order stays registry -> buffer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::buffer::BufferCore;

static REGISTRY: Mutex<Vec<Arc<BufferCore>>> = Mutex::new(Vec::new());

fn entries() -> MutexGuard<'static, Vec<Arc<BufferCore>>> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn register(core: Arc<BufferCore>) {
    entries().push(core);
}

/// Removes `core` from the registry; a no-op if it is absent.
pub(crate) fn unregister(core: &Arc<BufferCore>) {
    entries().retain(|entry| !Arc::ptr_eq(entry, core));
}

/// Destroys every live buffer.
///
/// Snapshots the registry under its lock, releases the lock, then destroys
/// each entry. Per-buffer teardown is idempotent, so calling this twice (or
/// racing it against explicit destroys) wipes nothing twice. Buffers whose
/// creation completes after the snapshot are untouched here and fall to
/// their handle's drop.
pub fn destroy_all() {
    let snapshot = entries().clone();

    for core in snapshot {
        BufferCore::destroy(&core);
    }
}

#[cfg(test)]
pub(crate) fn live_count() -> usize {
    entries().len()
}
