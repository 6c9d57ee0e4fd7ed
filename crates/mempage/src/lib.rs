// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # mempage
//!
//! Page-granular memory syscalls and arithmetic for the Parapet library.
//!
//! Wraps the handful of OS primitives a guarded allocator needs: anonymous
//! page mappings, locking pages into RAM, changing page protection, hinting
//! pages out of core dumps, and disabling core dumps process-wide. Each
//! syscall is exposed separately so callers can sequence them precisely and
//! tests can exercise each failure mode.
//!
//! All region arguments must be page-aligned and a multiple of the page size;
//! [`page_size`] and [`round_to_page_size`] provide the arithmetic.

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod arith;
mod error;
mod sys;

pub use arith::{page_size, round_to_page_size};
pub use error::PageError;
pub use sys::{advise_no_dump, alloc, disable_core_dumps, free, lock, protect, unlock, Prot};
