//! Shim module to abstract over std and loom primitives.
//!
//! Both the monitor and the oneshot channel are built on a blocking lock plus a
//! condition variable. This module re-exports the `std` versions in normal builds and
//! the `loom` versions when the `loom` feature is enabled, so the same code can be
//! model-checked.
//!
//! 抽象 std 与 loom 原语的垫片模块。正常构建使用 `std`，启用 `loom` 特性时使用 `loom`。

#[cfg(not(feature = "loom"))]
pub mod sync {
    pub use std::sync::{Arc, Condvar, Mutex, MutexGuard};
}

#[cfg(feature = "loom")]
pub mod sync {
    pub use loom::sync::{Arc, Condvar, Mutex, MutexGuard};
}

/// Lock `mutex`, ignoring poison.
///
/// A poisoned lock only means some closure panicked while holding it. The guarded
/// data is still structurally valid, so callers decide whether that matters.
#[inline]
pub(crate) fn lock<T>(mutex: &sync::Mutex<T>) -> (sync::MutexGuard<'_, T>, bool) {
    match mutex.lock() {
        Ok(guard) => (guard, false),
        Err(poisoned) => (poisoned.into_inner(), true),
    }
}

/// Block on `condvar`, ignoring poison.
#[inline]
pub(crate) fn wait<'a, T>(
    condvar: &sync::Condvar,
    guard: sync::MutexGuard<'a, T>,
) -> sync::MutexGuard<'a, T> {
    condvar
        .wait(guard)
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Block on `condvar` for at most `timeout`, ignoring poison.
///
/// Whether the wait timed out is not reported: callers re-check their own state and
/// deadline, which also covers spurious wakeups.
#[inline]
pub(crate) fn wait_timeout<'a, T>(
    condvar: &sync::Condvar,
    guard: sync::MutexGuard<'a, T>,
    timeout: std::time::Duration,
) -> sync::MutexGuard<'a, T> {
    match condvar.wait_timeout(guard, timeout) {
        Ok((guard, _)) => guard,
        Err(poisoned) => poisoned.into_inner().0,
    }
}
