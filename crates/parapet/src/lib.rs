// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # Parapet
//!
//! Secure in-memory buffers for sensitive data in Rust.
//!
//! Parapet keeps keys, passwords and derived secrets in process memory with
//! defences against accidental disclosure:
//!
//! - **Guard pages** — every buffer is fenced by two inaccessible pages, and
//!   the data sits flush against the rear guard so an overflow faults
//!   immediately.
//! - **Canary** — 32 random bytes directly below the data detect underflow
//!   corruption when the buffer is torn down.
//! - **Locked memory** — the pages holding data are pinned in RAM, never
//!   swapped, and hinted out of core dumps.
//! - **Deterministic wiping** — destruction zeroises the data before the
//!   pages are released, on explicit destroy, on handle drop, on
//!   [`destroy_all`], on interrupt and on the fatal path alike.
//! - **Access control** — a buffer can be flipped to read-only OS page
//!   protection and back.
//!
//! # Quick Start
//!
//! ```rust
//! use parapet::{trim, LockedBuffer};
//!
//! fn main() -> Result<(), parapet::BufferError> {
//!     let mut seed = *b"correct horse battery staple....";
//!     let buffer = LockedBuffer::new_from_bytes(&mut seed)?;
//!     // `seed` has been wiped; the only copy now lives in guarded memory.
//!
//!     buffer.mark_as_read_only()?;
//!     assert!(buffer.equal_to(b"correct horse battery staple....")?);
//!
//!     // Carve out a sub-key; it inherits the read-only flag.
//!     let subkey = trim(&buffer, 0, 16)?;
//!     assert!(subkey.is_read_only());
//!
//!     subkey.destroy();
//!     buffer.destroy();
//!     Ok(())
//! }
//! ```
//!
//! Call [`catch_interrupt`] early in `main` if you want Ctrl-C to wipe every
//! live buffer before the process dies, and [`disable_core_dumps`] to stop
//! the kernel writing the process image to disk.

#![warn(missing_docs)]

pub use memfort::{
    catch_interrupt, destroy_all, disable_core_dumps, safe_panic, trim, wipe_bytes, BufferError,
    LockedBuffer,
};
