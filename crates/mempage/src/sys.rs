// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Syscall wrappers for page mapping, locking and protection.
//!
//! Each wrapper maps one OS primitive to one fallible function. The region
//! arguments must be page-aligned and page-sized; passing anything else is a
//! contract violation, not a recoverable error.

use core::ptr;

use crate::error::PageError;

/// Page protection for [`protect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prot {
    /// No access at all; any load or store faults.
    NoAccess,
    /// Loads allowed, stores fault.
    ReadOnly,
    /// Stores allowed, loads fault.
    WriteOnly,
    /// Loads and stores allowed.
    ReadWrite,
}

impl Prot {
    fn flags(self) -> libc::c_int {
        match self {
            Prot::NoAccess => libc::PROT_NONE,
            Prot::ReadOnly => libc::PROT_READ,
            Prot::WriteOnly => libc::PROT_WRITE,
            Prot::ReadWrite => libc::PROT_READ | libc::PROT_WRITE,
        }
    }
}

/// Allocates `len` bytes of anonymous, private, read-write pages.
///
/// On Linux the mapping is additionally advised `MADV_DONTFORK` so child
/// processes never inherit it; where the advice is unsupported the mapping is
/// still returned.
pub fn alloc(len: usize) -> Result<*mut u8, PageError> {
    let ptr = unsafe {
        libc::mmap(
            ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };

    if ptr == libc::MAP_FAILED {
        return Err(PageError::AllocFailed);
    }

    #[cfg(target_os = "linux")]
    unsafe {
        libc::madvise(ptr, len, libc::MADV_DONTFORK);
    }

    Ok(ptr as *mut u8)
}

/// Releases a mapping previously returned by [`alloc`], in full.
///
/// # Safety
/// `ptr` must be the exact pointer returned by [`alloc`] and `len` the exact
/// length passed to it. The region must not be used afterwards.
pub unsafe fn free(ptr: *mut u8, len: usize) -> Result<(), PageError> {
    let failed = unsafe { libc::munmap(ptr as *mut libc::c_void, len) } != 0;

    if failed {
        return Err(PageError::FreeFailed);
    }

    Ok(())
}

/// Pins the pages in physical memory so they are never swapped to disk.
///
/// # Safety
/// `ptr..ptr + len` must lie within a live mapping owned by the caller.
pub unsafe fn lock(ptr: *mut u8, len: usize) -> Result<(), PageError> {
    let failed = unsafe { libc::mlock(ptr as *const libc::c_void, len) } != 0;

    if failed {
        return Err(PageError::LockFailed);
    }

    Ok(())
}

/// Unpins pages previously pinned with [`lock`].
///
/// # Safety
/// `ptr..ptr + len` must lie within a live mapping owned by the caller.
pub unsafe fn unlock(ptr: *mut u8, len: usize) -> Result<(), PageError> {
    let failed = unsafe { libc::munlock(ptr as *const libc::c_void, len) } != 0;

    if failed {
        return Err(PageError::UnlockFailed);
    }

    Ok(())
}

/// Sets the page protection of the region to `prot`.
///
/// # Safety
/// `ptr..ptr + len` must lie within a live mapping owned by the caller. The
/// caller is responsible for never touching the region through outstanding
/// references while it is inaccessible.
pub unsafe fn protect(ptr: *mut u8, len: usize, prot: Prot) -> Result<(), PageError> {
    let failed = unsafe { libc::mprotect(ptr as *mut libc::c_void, len, prot.flags()) } != 0;

    if failed {
        return Err(PageError::ProtectFailed);
    }

    Ok(())
}

/// Hints that the region must not appear in a core dump. Best-effort: a
/// kernel without the advice bit leaves the region dumpable.
///
/// # Safety
/// `ptr..ptr + len` must lie within a live mapping owned by the caller.
pub unsafe fn advise_no_dump(ptr: *mut u8, len: usize) {
    #[cfg(target_os = "linux")]
    unsafe {
        libc::madvise(ptr as *mut libc::c_void, len, libc::MADV_DONTDUMP);
    }

    #[cfg(not(target_os = "linux"))]
    {
        let _ = (ptr, len);
    }
}

/// Sets the process core-dump resource limit to zero.
pub fn disable_core_dumps() -> Result<(), PageError> {
    let limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };

    let failed = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &limit) } != 0;

    if failed {
        return Err(PageError::RlimitFailed);
    }

    Ok(())
}
