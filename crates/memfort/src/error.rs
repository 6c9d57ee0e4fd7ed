// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Error types for memfort.
use thiserror::Error;

/// Recoverable errors returned by locked-buffer operations.
///
/// Each variant leaves the buffer exactly as it was; unrecoverable
/// conditions (syscall refusals, canary corruption, entropy failure) never
/// surface here and go through [`safe_panic`](crate::safe_panic) instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Requested length was zero, or slice bounds fell outside the buffer.
    #[error("invalid buffer length or bounds")]
    InvalidLength,

    /// Mutation attempted on a buffer marked read-only.
    #[error("buffer is marked read-only")]
    ReadOnly,

    /// Operation other than destroy on a destroyed buffer.
    #[error("buffer has been destroyed")]
    Destroyed,
}

/// The canary copy below a data slot no longer matches the process canary.
#[derive(Debug, Error)]
#[error("canary mismatch: memory corruption detected below the data slot")]
pub(crate) struct CanaryViolation;

/// The system CSPRNG refused to produce canary bytes.
#[derive(Debug, Error)]
#[error("system CSPRNG refused to produce canary bytes")]
pub(crate) struct EntropyUnavailable;
