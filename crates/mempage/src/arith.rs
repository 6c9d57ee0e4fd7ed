// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Page-size acquisition and rounding.

use std::sync::OnceLock;

static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

/// Returns the system page size, read once and cached for the process
/// lifetime.
pub fn page_size() -> usize {
    *PAGE_SIZE.get_or_init(|| unsafe { libc::sysconf(libc::_SC_PAGESIZE) } as usize)
}

/// Rounds `len` up to the least multiple of the page size that is `>= len`.
///
/// `round_to_page_size(k * page) == k * page` and
/// `round_to_page_size(k * page + 1) == (k + 1) * page`.
pub fn round_to_page_size(len: usize) -> usize {
    let page = page_size();

    if page.is_power_of_two() {
        (len + page - 1) & !(page - 1)
    } else {
        ((len + page - 1) / page) * page
    }
}
