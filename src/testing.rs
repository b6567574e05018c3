//! Test support: a fake handle and a per-thread native call counter that stub
//! entry points bump.

use crate::types::NativeHandle;
use std::cell::Cell;
use std::ffi::c_void;
use std::sync::{Mutex, MutexGuard};

thread_local! {
    static NATIVE_CALLS: Cell<usize> = const { Cell::new(0) };
}

/// Non-null handle that no stub ever dereferences.
pub(crate) fn fake_handle() -> NativeHandle {
    NativeHandle::from_raw(0x5f3e_0000 as *mut c_void)
}

/// Count one native call on the current test thread.
pub(crate) fn record_call() {
    NATIVE_CALLS.with(|c| c.set(c.get() + 1));
}

pub(crate) fn native_calls() -> usize {
    NATIVE_CALLS.with(|c| c.get())
}

static RUNTIME_LOCK: Mutex<()> = Mutex::new(());

/// Serialises tests that start a `Runtime`; the session claim is process-wide.
pub(crate) fn runtime_lock() -> MutexGuard<'static, ()> {
    RUNTIME_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
