//! Writer half of the oneshot channel.
//!
//! oneshot 通道的写端。

use std::fmt;

use super::common::{AlreadySettled, ErrorPayload, Inner, State};
use crate::shim::sync::Arc;

/// Writer handle ("promise side") of a oneshot channel
///
/// There is exactly one sender per channel and it cannot be cloned. It stores either a
/// value or an error, once. Dropping it without doing so breaks the channel, which wakes
/// every blocked reader with [`RecvError::Broken`](super::RecvError::Broken).
///
/// oneshot 通道的写端（"promise"）。每个通道恰好一个，不可克隆，只能存入一次值或错误。
/// 未完成即被丢弃时通道断开，所有阻塞的读端以 `Broken` 被唤醒。
pub struct Sender<T, E = ErrorPayload> {
    inner: Arc<Inner<T, E>>,
    settled: bool,
}

impl<T, E> fmt::Debug for Sender<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}

impl<T, E> Sender<T, E> {
    #[inline]
    pub(crate) fn from_inner(inner: Arc<Inner<T, E>>) -> Self {
        Self {
            inner,
            settled: false,
        }
    }

    /// Store `value` and wake every waiting reader
    ///
    /// Fails with [`AlreadySettled`] carrying `value` back if the channel already holds
    /// a value or an error. The stored outcome is left untouched in that case.
    ///
    /// 存入 `value` 并唤醒所有等待的读端。若通道已有结果则返回携带 `value` 的 [`AlreadySettled`]，
    /// 已存结果保持不变。
    pub fn set_value(&mut self, value: T) -> Result<(), AlreadySettled<T>> {
        self.inner
            .try_settle(value, State::Ready)
            .map_err(AlreadySettled)?;
        self.settled = true;
        tracing::trace!("oneshot settled with a value");
        Ok(())
    }

    /// Store `error` and wake every waiting reader
    ///
    /// Readers receive it as [`RecvError::Failed`](super::RecvError::Failed).
    ///
    /// 存入 `error` 并唤醒所有等待的读端。
    pub fn set_error(&mut self, error: E) -> Result<(), AlreadySettled<E>> {
        self.inner
            .try_settle(error, State::Failed)
            .map_err(AlreadySettled)?;
        self.settled = true;
        tracing::trace!("oneshot settled with an error");
        Ok(())
    }

    /// Store the outcome of a fallible computation
    ///
    /// `Ok` goes through [`set_value`](Self::set_value), `Err` through
    /// [`set_error`](Self::set_error).
    ///
    /// ```
    /// use lite_promise::oneshot;
    ///
    /// let (mut tx, mut rx) = oneshot::channel::<u32, String>();
    ///
    /// std::thread::spawn(move || {
    ///     let parsed = "42".parse::<u32>().map_err(|e| e.to_string());
    ///     tx.settle(parsed).unwrap();
    /// });
    ///
    /// assert_eq!(rx.get(), Ok(42));
    /// ```
    pub fn settle(&mut self, outcome: Result<T, E>) -> Result<(), AlreadySettled<Result<T, E>>> {
        let failed = outcome.is_err();
        self.inner
            .try_settle(outcome, |outcome| match outcome {
                Ok(value) => State::Ready(value),
                Err(error) => State::Failed(error),
            })
            .map_err(AlreadySettled)?;
        self.settled = true;
        tracing::trace!(failed, "oneshot settled");
        Ok(())
    }

    /// Whether this sender already stored a value or an error
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Check if every receiver has been dropped
    ///
    /// Settling is still allowed, but nobody will observe the outcome.
    ///
    /// 检查是否所有接收端都已被丢弃
    #[inline]
    pub fn is_closed(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }
}

impl<T, E> Drop for Sender<T, E> {
    fn drop(&mut self) {
        if self.settled {
            // Readers already have their outcome
            return;
        }
        if self.inner.abandon() {
            tracing::debug!("oneshot sender dropped without settling; channel broken");
        }
    }
}
