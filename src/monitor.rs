//! Monitor wrapper giving any value call-level mutual exclusion.
//!
//! 为任意值提供调用级互斥的监视器包装器。
//!
//! [`Monitor`] owns a value that was never designed for threaded code and only hands
//! it out inside [`Monitor::invoke`], while its lock is held. The wrapped type needs no
//! changes: every operation on it goes through a closure.
//!
//! [`Monitor`] 拥有一个并非为多线程设计的值，只在 [`Monitor::invoke`] 中持锁时才交出。
//! 被包装的类型无需任何修改：所有操作都通过闭包完成。
//!
//! # Transactions | 事务
//!
//! Each `invoke` is atomic on its own. A sequence of `invoke` calls is **not**: another
//! thread may run its own `invoke` between two of yours. A multi-step operation (for
//! example "debit one account, then credit another") must be written as one closure.
//!
//! 每次 `invoke` 本身是原子的，但多次 `invoke` 组成的序列**不是**：其他线程可能在两次调用
//! 之间插入自己的 `invoke`。多步操作必须写在同一个闭包中。
//!
//! ```
//! use lite_promise::Monitor;
//!
//! #[derive(Default)]
//! struct Ledger {
//!     balance: i64,
//! }
//!
//! let ledger = Monitor::new(Ledger::default());
//!
//! // Debit and credit inside a single call: no other thread can observe the middle.
//! ledger.invoke(|l| {
//!     l.balance -= 1000;
//!     l.balance += 1000;
//! });
//!
//! assert_eq!(ledger.invoke(|l| l.balance), 0);
//! ```

use std::fmt;

use crate::shim::{self, sync::Mutex};

/// Synchronizing wrapper that serializes every access to a value of type `T`.
///
/// The guarded value is reachable only through [`invoke`](Self::invoke). The closure
/// receives a `&mut T` whose lifetime ends with the call, so a reference to the guarded
/// value cannot be smuggled out:
///
/// 被保护的值只能通过 [`invoke`](Self::invoke) 访问。闭包收到的 `&mut T` 生命周期随调用结束，
/// 因此无法把引用带出锁外：
///
/// ```compile_fail
/// use lite_promise::Monitor;
///
/// let monitor = Monitor::new(vec![1, 2, 3]);
/// let escaped: &mut Vec<i32> = monitor.invoke(|v| v);
/// escaped.push(4);
/// ```
///
/// The lock is not reentrant. Calling `invoke` on the same monitor from inside one of
/// its own operations deadlocks.
pub struct Monitor<T> {
    guarded: Mutex<T>,
}

impl<T> Monitor<T> {
    /// Wrap `value`, taking ownership of it.
    ///
    /// 包装 `value` 并取得其所有权。
    #[inline]
    pub fn new(value: T) -> Self {
        Self {
            guarded: Mutex::new(value),
        }
    }

    /// Run `operation` on the guarded value while holding the lock.
    ///
    /// The lock is released on every exit path, including unwinding, before control
    /// returns to the caller. Whatever `operation` returns is handed back unchanged, so
    /// an operation returning `Result` propagates its error as-is.
    ///
    /// If an earlier operation panicked, the lock is still acquired: the value keeps
    /// whatever state that operation left it in.
    ///
    /// 持锁执行 `operation`。锁在所有退出路径（包括 unwind）上都会在返回调用者前释放。
    /// `operation` 的返回值原样交回，返回 `Result` 的操作其错误也原样传播。
    #[inline]
    pub fn invoke<R, F>(&self, operation: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        let (mut guard, poisoned) = shim::lock(&self.guarded);
        if poisoned {
            tracing::warn!("monitor lock was poisoned by a panicking operation; continuing");
        }
        operation(&mut *guard)
    }

    /// Consume the monitor and return the guarded value.
    ///
    /// Owning the monitor means no other thread can be inside `invoke`.
    ///
    /// 消耗监视器并返回被保护的值。
    pub fn into_inner(self) -> T {
        self.guarded
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<T: Default> Default for Monitor<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Monitor<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> fmt::Debug for Monitor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor").finish_non_exhaustive()
    }
}
