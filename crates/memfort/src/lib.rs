// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! # memfort
//!
//! Guarded allocations and locked buffers for sensitive data.
//!
//! A [`LockedBuffer`] lives in its own anonymous mapping, fenced by two
//! inaccessible guard pages, pinned in RAM, hinted out of core dumps, and
//! preceded by a 32-byte canary copied from a process-wide random value. The
//! user data is placed flush against the rear guard page, so an overflow
//! faults immediately; an underflow clobbers the canary and is caught when
//! the buffer is torn down.
//!
//! Every live buffer is tracked in a process-wide registry so that
//! [`destroy_all`] (called explicitly, from [`catch_interrupt`], or from the
//! fatal [`safe_panic`] path) can wipe and release everything before the
//! process goes away. Dropping the last handle to a buffer destroys it too;
//! explicit [`LockedBuffer::destroy`] and the drop path are mutually
//! idempotent.
//!
//! ## Example
//!
//! ```rust
//! use memfort::LockedBuffer;
//!
//! let mut key = *b"yellow submarine";
//! let buffer = LockedBuffer::new_from_bytes(&mut key)?;
//!
//! // The source was wiped as part of the move.
//! assert_eq!(key, [0u8; 16]);
//!
//! buffer.mark_as_read_only()?;
//! assert!(buffer.equal_to(b"yellow submarine")?);
//!
//! buffer.destroy();
//! assert!(buffer.is_destroyed());
//! # Ok::<(), memfort::BufferError>(())
//! ```

#![warn(missing_docs)]
#![warn(unsafe_op_in_unsafe_fn)]

#[cfg(test)]
mod tests;

mod buffer;
mod canary;
mod error;
mod region;
mod registry;
mod shutdown;
mod util;

pub use buffer::{trim, LockedBuffer};
pub use error::BufferError;
pub use registry::destroy_all;
pub use shutdown::{catch_interrupt, disable_core_dumps, safe_panic};
pub use util::wipe_bytes;
