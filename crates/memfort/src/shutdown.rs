// Copyright (c) 2025-2026 Federico Hoerth <memparanoid@gmail.com>
// SPDX-License-Identifier: GPL-3.0-only
// See LICENSE in the repository root for full license text.

//! Fatal-path and shutdown plumbing.
//!
//! [`safe_panic`] is the single funnel for unrecoverable conditions: it
//! reports the cause, wipes every live buffer and terminates. An interrupt
//! handler installed by [`catch_interrupt`] reaches the same teardown from
//! SIGINT.

use core::fmt::Display;
use core::ptr;
use core::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use crate::registry::destroy_all;

/// Reports `cause` on stderr, destroys every live buffer and terminates the
/// process with exit code 1.
///
/// The cause is written before teardown so that a second fatal condition
/// surfacing mid-teardown cannot swallow the first report.
pub fn safe_panic(cause: impl Display) -> ! {
    eprintln!("memfort: fatal: {cause}");
    destroy_all();
    std::process::exit(1);
}

type InterruptHook = Box<dyn Fn() + Send + Sync + 'static>;

static INTERRUPT_INSTALLED: AtomicBool = AtomicBool::new(false);
static INTERRUPT_HOOK: AtomicPtr<InterruptHook> = AtomicPtr::new(ptr::null_mut());

/// Installs a SIGINT handler that runs `hook`, destroys every live buffer
/// and terminates with exit code 130.
///
/// Only the first call per process installs anything; later calls are no-ops
/// regardless of the hook supplied.
pub fn catch_interrupt<F>(hook: F)
where
    F: Fn() + Send + Sync + 'static,
{
    if INTERRUPT_INSTALLED
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        return;
    }

    // The hook is published before the handler is installed, so the signal
    // path can only ever observe the fully-written closure.
    let boxed: Box<InterruptHook> = Box::new(Box::new(hook));
    INTERRUPT_HOOK.store(Box::into_raw(boxed), Ordering::Release);

    unsafe {
        let mut action: libc::sigaction = core::mem::zeroed();
        action.sa_sigaction = on_interrupt as extern "C" fn(libc::c_int) as usize;
        libc::sigemptyset(&mut action.sa_mask);
        libc::sigaction(libc::SIGINT, &action, ptr::null_mut());
    }
}

extern "C" fn on_interrupt(_signal: libc::c_int) {
    let hook = INTERRUPT_HOOK.load(Ordering::Acquire);
    if !hook.is_null() {
        unsafe { (*hook)() };
    }

    destroy_all();

    unsafe { libc::_exit(130) }
}

/// Disables core dumps for the whole process. Best-effort: a refusal is
/// reported on stderr but does not abort.
pub fn disable_core_dumps() {
    if let Err(e) = mempage::disable_core_dumps() {
        eprintln!("memfort: {e}");
    }
}
