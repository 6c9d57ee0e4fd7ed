// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for mempage.
use thiserror::Error;

/// Errors from page-level memory syscalls.
///
/// One variant per syscall wrapper so callers can report exactly which
/// primitive refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    /// `mmap` refused to create the anonymous mapping.
    #[error("failed to allocate pages")]
    AllocFailed,

    /// `munmap` refused to release the mapping.
    #[error("failed to free pages")]
    FreeFailed,

    /// `mlock` refused to pin the pages in RAM.
    #[error("failed to lock pages")]
    LockFailed,

    /// `munlock` refused to unpin the pages.
    #[error("failed to unlock pages")]
    UnlockFailed,

    /// `mprotect` refused to change page permissions.
    #[error("failed to set page protection")]
    ProtectFailed,

    /// `setrlimit` refused to zero the core-dump limit.
    #[error("failed to set core dump resource limit")]
    RlimitFailed,
}
