//! Single-consumer reader half of the oneshot channel.
//!
//! oneshot 通道的单消费者读端。

use std::fmt;
use std::time::{Duration, Instant};

use super::common::{ErrorPayload, Inner, RecvError, WaitStatus};
use super::shared::SharedReceiver;
use crate::shim::sync::Arc;

/// Single-consumer reader handle ("future side") of a oneshot channel
///
/// Not clonable. The outcome can be retrieved once with [`get`](Self::get) or
/// [`try_get`](Self::try_get); every later retrieval fails with
/// [`RecvError::AlreadyConsumed`]. Waiting never consumes and can be repeated.
///
/// Convert into a [`SharedReceiver`] with [`share`](Self::share) to let several
/// threads read the same outcome.
///
/// oneshot 通道的单消费者读端（"future"）。不可克隆，结果只能取走一次，之后的读取返回
/// [`RecvError::AlreadyConsumed`]。等待不会取走结果，可以重复。
pub struct Receiver<T, E = ErrorPayload> {
    inner: Arc<Inner<T, E>>,
    consumed: bool,
}

impl<T, E> fmt::Debug for Receiver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Receiver")
            .field("consumed", &self.consumed)
            .finish_non_exhaustive()
    }
}

impl<T, E> Receiver<T, E> {
    #[inline]
    pub(crate) fn from_inner(inner: Arc<Inner<T, E>>) -> Self {
        Self {
            inner,
            consumed: false,
        }
    }

    /// Block until the channel is settled and take the outcome
    ///
    /// Returns the stored value, [`RecvError::Failed`] with the stored error, or
    /// [`RecvError::Broken`] if the sender was dropped first. The second call fails with
    /// [`RecvError::AlreadyConsumed`], whatever the first one returned.
    ///
    /// 阻塞直到通道完成并取走结果。第二次调用无论第一次结果如何都返回
    /// [`RecvError::AlreadyConsumed`]。
    pub fn get(&mut self) -> Result<T, RecvError<E>> {
        if self.consumed {
            return Err(RecvError::AlreadyConsumed);
        }
        self.consumed = true;
        self.inner.take()
    }

    /// Take the outcome if the channel is already settled, without blocking
    ///
    /// Returns `None` while the channel is empty; that does not count as a retrieval.
    pub fn try_get(&mut self) -> Option<Result<T, RecvError<E>>> {
        if self.consumed {
            return Some(Err(RecvError::AlreadyConsumed));
        }
        let outcome = self.inner.try_take()?;
        self.consumed = true;
        Some(outcome)
    }

    /// Block until the channel is settled, without taking the outcome
    ///
    /// 阻塞直到通道完成，不取走结果
    #[inline]
    pub fn wait(&self) -> WaitStatus {
        self.inner.wait()
    }

    /// Block for at most `timeout`
    ///
    /// `Duration::ZERO` polls without blocking.
    ///
    /// 最多阻塞 `timeout`。`Duration::ZERO` 只检查不阻塞。
    #[inline]
    pub fn wait_for(&self, timeout: Duration) -> WaitStatus {
        self.inner.wait_for(timeout)
    }

    /// Block until `deadline` at the latest
    #[inline]
    pub fn wait_until(&self, deadline: Instant) -> WaitStatus {
        self.inner.wait_until(deadline)
    }

    /// Whether the channel is settled, so `get` would not block
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.inner.is_settled()
    }

    /// Whether the outcome is still available to this receiver
    #[inline]
    pub fn is_valid(&self) -> bool {
        !self.consumed
    }

    /// Turn this receiver into a clonable [`SharedReceiver`] over the same channel
    ///
    /// If the outcome was already retrieved, every shared reader gets
    /// [`RecvError::AlreadyConsumed`].
    ///
    /// 转换为可克隆的 [`SharedReceiver`]。若结果已被取走，所有共享读端得到
    /// [`RecvError::AlreadyConsumed`]。
    #[inline]
    pub fn share(self) -> SharedReceiver<T, E> {
        SharedReceiver::from_inner(self.inner)
    }
}
