// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

use serial_test::serial;

use crate::buffer::{trim, LockedBuffer};
use crate::error::BufferError;
use crate::registry;

#[serial(buffers)]
#[test]
fn test_new_allocates_requested_length() {
    let buffer = LockedBuffer::new(8).expect("Failed to create buffer");

    assert_eq!(buffer.len(), 8);
    assert!(!buffer.is_empty());
    assert!(!buffer.is_read_only());
    assert!(!buffer.is_destroyed());

    buffer
        .open(|data| assert_eq!(data, [0u8; 8]))
        .expect("Failed to open buffer");

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_new_rejects_zero_length() {
    assert_eq!(LockedBuffer::new(0).err(), Some(BufferError::InvalidLength));
}

#[serial(buffers)]
#[test]
fn test_new_from_bytes_copies_and_wipes_source() {
    let mut src = *b"test";
    let buffer = LockedBuffer::new_from_bytes(&mut src).expect("Failed to create buffer");

    assert_eq!(src, [0u8; 4]);
    buffer
        .open(|data| assert_eq!(data, b"test"))
        .expect("Failed to open buffer");

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_new_from_bytes_rejects_empty_source() {
    let mut src: [u8; 0] = [];

    assert_eq!(
        LockedBuffer::new_from_bytes(&mut src).err(),
        Some(BufferError::InvalidLength)
    );
}

#[serial(buffers)]
#[test]
fn test_equal_to() {
    let mut src = *b"test";
    let buffer = LockedBuffer::new_from_bytes(&mut src).expect("Failed to create buffer");

    assert!(buffer.equal_to(b"test").expect("Failed to compare"));
    assert!(!buffer.equal_to(b"toast").expect("Failed to compare"));

    buffer.destroy();

    assert_eq!(buffer.equal_to(b"test").err(), Some(BufferError::Destroyed));
}

#[serial(buffers)]
#[test]
fn test_read_only_round_trip() {
    let buffer = LockedBuffer::new(8).expect("Failed to create buffer");
    assert!(!buffer.is_read_only());

    buffer.mark_as_read_only().expect("Failed to mark read-only");
    assert!(buffer.is_read_only());

    // Reads must still work under read-only protection.
    buffer
        .open(|data| assert_eq!(data, [0u8; 8]))
        .expect("Failed to open buffer");

    buffer
        .mark_as_read_write()
        .expect("Failed to mark read-write");
    assert!(!buffer.is_read_only());

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_mark_as_read_only_is_idempotent() {
    let buffer = LockedBuffer::new(8).expect("Failed to create buffer");

    buffer.mark_as_read_only().expect("Failed to mark read-only");
    buffer.mark_as_read_only().expect("Failed to re-mark read-only");
    assert!(buffer.is_read_only());

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_read_only_blocks_mutation() {
    let buffer = LockedBuffer::new(4).expect("Failed to create buffer");
    buffer.mark_as_read_only().expect("Failed to mark read-only");

    let mut src = *b"test";
    assert_eq!(buffer.move_from(&mut src).err(), Some(BufferError::ReadOnly));

    // Neither side was touched.
    assert_eq!(src, *b"test");
    assert!(buffer.equal_to(&[0u8; 4]).expect("Failed to compare"));

    assert_eq!(buffer.copy_from(b"test").err(), Some(BufferError::ReadOnly));
    assert_eq!(
        buffer.open_mut(|_| ()).err(),
        Some(BufferError::ReadOnly)
    );

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_move_wipes_source() {
    let buffer = LockedBuffer::new(16).expect("Failed to create buffer");
    let mut src = *b"yellow submarine";

    buffer.move_from(&mut src).expect("Failed to move");

    assert_eq!(src, [0u8; 16]);
    assert!(
        buffer
            .equal_to(b"yellow submarine")
            .expect("Failed to compare")
    );

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_copy_with_longer_source_copies_prefix() {
    let buffer = LockedBuffer::new(4).expect("Failed to create buffer");

    buffer.copy_from(b"longer than four").expect("Failed to copy");

    assert!(buffer.equal_to(b"long").expect("Failed to compare"));

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_move_with_longer_source_wipes_the_whole_source() {
    let buffer = LockedBuffer::new(4).expect("Failed to create buffer");
    let mut src = *b"longer than four";

    buffer.move_from(&mut src).expect("Failed to move");

    assert!(buffer.equal_to(b"long").expect("Failed to compare"));
    assert_eq!(src, [0u8; 16]);

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_copy_with_shorter_source_leaves_the_tail() {
    let buffer = LockedBuffer::new(8).expect("Failed to create buffer");
    buffer.copy_from(b"\xFF\xFF\xFF\xFF\xFF\xFF\xFF\xFF").expect("Failed to copy");

    buffer.copy_from(b"ab").expect("Failed to copy");

    assert!(
        buffer
            .equal_to(b"ab\xFF\xFF\xFF\xFF\xFF\xFF")
            .expect("Failed to compare")
    );

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_trim_copies_window_and_inherits_read_only() {
    let mut src = *b"xxxxyyyy";
    let buffer = LockedBuffer::new_from_bytes(&mut src).expect("Failed to create buffer");
    buffer.mark_as_read_only().expect("Failed to mark read-only");

    let trimmed = trim(&buffer, 2, 4).expect("Failed to trim");

    assert_eq!(trimmed.len(), 4);
    assert!(trimmed.equal_to(b"xxyy").expect("Failed to compare"));
    assert!(trimmed.is_read_only());

    // The source stays live and untouched.
    assert!(buffer.equal_to(b"xxxxyyyy").expect("Failed to compare"));

    trimmed.destroy();
    buffer.destroy();

    assert_eq!(trim(&buffer, 2, 4).err(), Some(BufferError::Destroyed));
}

#[serial(buffers)]
#[test]
fn test_trim_rejects_bad_bounds() {
    let buffer = LockedBuffer::new(8).expect("Failed to create buffer");

    assert_eq!(trim(&buffer, 0, 0).err(), Some(BufferError::InvalidLength));
    assert_eq!(trim(&buffer, 4, 5).err(), Some(BufferError::InvalidLength));
    assert_eq!(trim(&buffer, 9, 1).err(), Some(BufferError::InvalidLength));
    assert_eq!(
        trim(&buffer, usize::MAX, 2).err(),
        Some(BufferError::InvalidLength)
    );

    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_trim_from_writable_source_is_writable() {
    let mut src = *b"xxxxyyyy";
    let buffer = LockedBuffer::new_from_bytes(&mut src).expect("Failed to create buffer");

    let trimmed = trim(&buffer, 0, 4).expect("Failed to trim");

    assert!(!trimmed.is_read_only());
    trimmed.copy_from(b"zzzz").expect("Failed to copy");

    trimmed.destroy();
    buffer.destroy();
}

#[serial(buffers)]
#[test]
fn test_destroy_is_idempotent_and_terminal() {
    let buffer = LockedBuffer::new(4).expect("Failed to create buffer");
    buffer.mark_as_read_only().expect("Failed to mark read-only");

    buffer.destroy();
    buffer.destroy();

    assert!(buffer.is_destroyed());
    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert!(!buffer.is_read_only());

    assert_eq!(buffer.copy_from(b"test").err(), Some(BufferError::Destroyed));
    let mut src = *b"test";
    assert_eq!(
        buffer.move_from(&mut src).err(),
        Some(BufferError::Destroyed)
    );
    assert_eq!(
        buffer.mark_as_read_only().err(),
        Some(BufferError::Destroyed)
    );
    assert_eq!(
        buffer.mark_as_read_write().err(),
        Some(BufferError::Destroyed)
    );
    assert_eq!(buffer.open(|_| ()).err(), Some(BufferError::Destroyed));
    assert_eq!(buffer.open_mut(|_| ()).err(), Some(BufferError::Destroyed));
}

#[serial(buffers)]
#[test]
fn test_dropping_the_handle_destroys_and_unregisters() {
    let before = registry::live_count();

    {
        let buffer = LockedBuffer::new(8).expect("Failed to create buffer");
        buffer.copy_from(b"sensitive").ok();
        assert_eq!(registry::live_count(), before + 1);
    }

    assert_eq!(registry::live_count(), before);
}

#[serial(buffers)]
#[test]
fn test_open_mut_writes_are_visible() {
    let buffer = LockedBuffer::new(5).expect("Failed to create buffer");

    buffer
        .open_mut(|data| data.copy_from_slice(b"vault"))
        .expect("Failed to open buffer mutably");

    assert!(buffer.equal_to(b"vault").expect("Failed to compare"));

    buffer.destroy();
}
